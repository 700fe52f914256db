use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::core::{DEFAULT_HORIZONTAL_FOV_DEG, MAX_HORIZONTAL_FOV_DEG, MIN_HORIZONTAL_FOV_DEG};

/// Overlay session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkyConfig {
    /// Horizontal field of view of the camera (degrees)
    pub horizontal_fov_deg: f64,
    /// Bodies drawn when the session starts
    pub tracked_bodies: Vec<String>,
    /// Marker and label appearance
    pub overlay: OverlayStyle,
    /// Target redraw rate (Hz)
    pub target_frame_rate_hz: f64,
    /// Exponential smoothing factor for the heading, `None` for raw sensor values
    pub heading_smoothing: Option<f64>,
    /// Consecutive failed frames before a body is reported as unresolvable (0 = never)
    pub unresolvable_after_failures: u32,
    /// Number of random twinkling dots drawn behind the markers (0 = off)
    pub backdrop_stars: u32,
}

/// Appearance of the body markers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayStyle {
    /// Ring radius (pixels)
    pub marker_radius_px: f64,
    /// Ring stroke width (pixels)
    pub marker_line_width_px: f64,
    /// Gap between the top of the ring and the label baseline (pixels)
    pub label_offset_px: f64,
    pub font_px: f64,
    pub marker_color: String,
    pub label_color: String,
    /// Largest radius of a backdrop dot (pixels)
    pub backdrop_max_radius_px: f64,
}

impl Default for SkyConfig {
    fn default() -> Self {
        Self {
            horizontal_fov_deg: DEFAULT_HORIZONTAL_FOV_DEG,
            tracked_bodies: vec!["Moon".to_string()],
            overlay: OverlayStyle::default(),
            target_frame_rate_hz: 60.0,
            heading_smoothing: None,
            unresolvable_after_failures: 30,
            backdrop_stars: 0,
        }
    }
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            marker_radius_px: 20.0,
            marker_line_width_px: 2.0,
            label_offset_px: 8.0,
            font_px: 14.0,
            marker_color: "rgba(255, 255, 200, 0.9)".to_string(),
            label_color: "#ffffff".to_string(),
            backdrop_max_radius_px: 1.5,
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Invalid {parameter} = {value}: {reason}")]
    InvalidParameter { parameter: String, value: String, reason: String },

    #[error("{message}")]
    IoError { message: String },

    #[error("{message}")]
    SerializationError { message: String },
}

/// Configuration validation result
#[derive(Debug)]
pub struct ValidationResult {
    /// Whether configuration is valid
    pub is_valid: bool,
    pub errors: Vec<ConfigError>,
    pub warnings: Vec<String>,
    /// Suggested corrections
    pub suggestions: Vec<String>,
}

/// Holds the active [`SkyConfig`] and its backing file
#[derive(Debug, Default)]
pub struct ConfigurationManager {
    config: SkyConfig,
    config_file_path: Option<String>,
    is_modified: bool,
}

impl ConfigurationManager {
    /// Create a new configuration manager with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create configuration manager and load from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut manager = Self::new();
        manager.load_from_file(path)?;
        Ok(manager)
    }

    pub fn config(&self) -> &SkyConfig {
        &self.config
    }

    /// Replace the whole configuration after validating it
    pub fn update_config(&mut self, config: SkyConfig) -> Result<(), ConfigError> {
        let validation = validate_config(&config);
        if let Some(err) = validation.errors.into_iter().next() {
            return Err(err);
        }
        self.config = config;
        self.is_modified = true;
        Ok(())
    }

    /// Load configuration from JSON file
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
            message: format!("Failed to read config file '{}': {}", path_str, e),
        })?;

        let config: SkyConfig = serde_json::from_str(&content).map_err(|e| ConfigError::SerializationError {
            message: format!("Failed to parse config file '{}': {}", path_str, e),
        })?;

        let validation = validate_config(&config);
        if let Some(err) = validation.errors.into_iter().next() {
            return Err(err);
        }
        for warning in &validation.warnings {
            log::warn!("{}: {}", path_str, warning);
        }

        self.config = config;
        self.config_file_path = Some(path_str);
        self.is_modified = false;
        Ok(())
    }

    /// Save configuration to JSON file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = serde_json::to_string_pretty(&self.config).map_err(|e| ConfigError::SerializationError {
            message: format!("Failed to serialize config: {}", e),
        })?;

        fs::write(&path, content).map_err(|e| ConfigError::IoError {
            message: format!("Failed to write config file '{}': {}", path_str, e),
        })?;

        self.config_file_path = Some(path_str);
        self.is_modified = false;
        Ok(())
    }

    /// Save to the currently loaded file path
    pub fn save(&mut self) -> Result<(), ConfigError> {
        match self.config_file_path.clone() {
            Some(path) => self.save_to_file(path),
            None => Err(ConfigError::IoError {
                message: "No file path set for saving configuration".to_string(),
            }),
        }
    }

    /// Check if configuration has been modified since last save
    pub fn is_modified(&self) -> bool {
        self.is_modified
    }

    // Runtime adjustments; each returns the previous value

    pub fn set_horizontal_fov(&mut self, fov_deg: f64) -> Result<f64, ConfigError> {
        validate_fov(fov_deg)?;
        let old_value = self.config.horizontal_fov_deg;
        self.config.horizontal_fov_deg = fov_deg;
        self.is_modified = true;
        Ok(old_value)
    }

    /// Track or untrack a body; returns whether it was tracked before
    pub fn set_body_tracked(&mut self, body: &str, tracked: bool) -> Result<bool, ConfigError> {
        let body = body.trim();
        if body.is_empty() {
            return Err(ConfigError::InvalidParameter {
                parameter: "tracked_bodies".to_string(),
                value: String::new(),
                reason: "Body name must not be empty".to_string(),
            });
        }

        let was_tracked = self.config.tracked_bodies.iter().any(|b| b == body);
        if tracked && !was_tracked {
            self.config.tracked_bodies.push(body.to_string());
            self.is_modified = true;
        } else if !tracked && was_tracked {
            self.config.tracked_bodies.retain(|b| b != body);
            self.is_modified = true;
        }
        Ok(was_tracked)
    }

    pub fn set_frame_rate(&mut self, rate_hz: f64) -> Result<f64, ConfigError> {
        if !rate_hz.is_finite() || rate_hz <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "target_frame_rate_hz".to_string(),
                value: rate_hz.to_string(),
                reason: "Frame rate must be positive".to_string(),
            });
        }
        let old_value = self.config.target_frame_rate_hz;
        self.config.target_frame_rate_hz = rate_hz;
        self.is_modified = true;
        Ok(old_value)
    }

    pub fn set_heading_smoothing(&mut self, smoothing: Option<f64>) -> Result<Option<f64>, ConfigError> {
        check_smoothing(smoothing)?;
        let old_value = self.config.heading_smoothing;
        self.config.heading_smoothing = smoothing;
        self.is_modified = true;
        Ok(old_value)
    }

    pub fn set_backdrop_stars(&mut self, count: u32) -> u32 {
        let old_value = self.config.backdrop_stars;
        self.config.backdrop_stars = count;
        self.is_modified = true;
        old_value
    }
}

/// Check a horizontal field of view against the usable range
pub fn validate_fov(fov_deg: f64) -> Result<(), ConfigError> {
    if !fov_deg.is_finite() || fov_deg <= MIN_HORIZONTAL_FOV_DEG || fov_deg >= MAX_HORIZONTAL_FOV_DEG {
        return Err(ConfigError::InvalidParameter {
            parameter: "horizontal_fov_deg".to_string(),
            value: fov_deg.to_string(),
            reason: format!(
                "Field of view must be between {} and {} degrees (exclusive)",
                MIN_HORIZONTAL_FOV_DEG, MAX_HORIZONTAL_FOV_DEG
            ),
        });
    }
    Ok(())
}

fn check_smoothing(smoothing: Option<f64>) -> Result<(), ConfigError> {
    match smoothing {
        Some(alpha) if !(alpha > 0.0 && alpha <= 1.0) => Err(ConfigError::InvalidParameter {
            parameter: "heading_smoothing".to_string(),
            value: alpha.to_string(),
            reason: "Smoothing factor must be in (0, 1]".to_string(),
        }),
        _ => Ok(()),
    }
}

/// Check a configuration, collecting every problem rather than stopping at the first
pub fn validate_config(config: &SkyConfig) -> ValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut suggestions = Vec::new();

    if let Err(err) = validate_fov(config.horizontal_fov_deg) {
        errors.push(err);
    } else if config.horizontal_fov_deg > 120.0 {
        warnings.push("Wide field of view: markers near the edges will be noticeably misplaced".to_string());
    }

    if let Err(err) = check_smoothing(config.heading_smoothing) {
        errors.push(err);
    } else if matches!(config.heading_smoothing, Some(alpha) if alpha < 0.05) {
        warnings.push("Very low heading smoothing makes markers lag behind the camera".to_string());
    }

    if !config.target_frame_rate_hz.is_finite() || config.target_frame_rate_hz <= 0.0 {
        errors.push(ConfigError::InvalidParameter {
            parameter: "target_frame_rate_hz".to_string(),
            value: config.target_frame_rate_hz.to_string(),
            reason: "Frame rate must be positive".to_string(),
        });
    } else if config.target_frame_rate_hz > 120.0 {
        warnings.push("Frame rate above 120 Hz exceeds typical display refresh".to_string());
    }

    let style = &config.overlay;
    for (parameter, value) in [
        ("overlay.marker_radius_px", style.marker_radius_px),
        ("overlay.font_px", style.font_px),
    ] {
        if !value.is_finite() || value <= 0.0 {
            errors.push(ConfigError::InvalidParameter {
                parameter: parameter.to_string(),
                value: value.to_string(),
                reason: "Must be positive".to_string(),
            });
        }
    }

    if config.tracked_bodies.is_empty() {
        warnings.push("No bodies tracked; the overlay will be empty".to_string());
        suggestions.push("Track at least the Moon".to_string());
    }
    if config.tracked_bodies.iter().any(|b| b.trim().is_empty()) {
        errors.push(ConfigError::InvalidParameter {
            parameter: "tracked_bodies".to_string(),
            value: format!("{:?}", config.tracked_bodies),
            reason: "Body names must not be empty".to_string(),
        });
    }

    if config.unresolvable_after_failures == 0 {
        suggestions.push("Set unresolvable_after_failures to get notified about bodies that never resolve".to_string());
    }

    if config.backdrop_stars > 2000 {
        warnings.push("Large backdrop star counts slow down every frame".to_string());
    }

    ValidationResult {
        is_valid: errors.is_empty(),
        errors,
        warnings,
        suggestions,
    }
}
