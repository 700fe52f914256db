//! Core data types for the sky overlay

use crate::core::angles::normalize_azimuth;
use crate::core::constants::DEFAULT_HORIZONTAL_FOV_DEG;
use serde::{Deserialize, Serialize};

/// Sky position in horizontal coordinates (degrees)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HorizontalPosition {
    /// Compass bearing, clockwise from north, `[0, 360)`
    pub azimuth: f64,
    /// Angle above the horizon, `[-90, 90]`
    pub altitude: f64,
}

impl HorizontalPosition {
    /// Build a position, folding the azimuth into `[0, 360)`
    pub fn new(azimuth: f64, altitude: f64) -> Self {
        Self {
            azimuth: normalize_azimuth(azimuth),
            altitude,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.azimuth.is_finite() && self.altitude.is_finite()
    }

    pub fn is_above_horizon(&self) -> bool {
        self.altitude > 0.0
    }
}

/// Geographic position of the viewer
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Observer {
    /// Latitude in decimal degrees, `[-90, 90]`
    pub latitude: f64,
    /// Longitude in decimal degrees, `[-180, 180]`
    pub longitude: f64,
    /// Height above the ellipsoid in meters
    pub elevation_m: f64,
}

impl Observer {
    pub fn new(latitude: f64, longitude: f64, elevation_m: f64) -> Self {
        Self {
            latitude,
            longitude,
            elevation_m,
        }
    }

    /// Whether latitude and longitude lie inside their geographic ranges
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.elevation_m.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Direction the device camera is currently pointed at
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Heading {
    /// Compass heading, clockwise from north, `[0, 360)`
    pub azimuth: f64,
    /// Tilt above the horizon, `[-90, 90]`
    pub altitude: f64,
}

impl Heading {
    pub fn new(azimuth: f64, altitude: f64) -> Self {
        Self {
            azimuth: normalize_azimuth(azimuth),
            altitude: altitude.clamp(-90.0, 90.0),
        }
    }
}

/// Angular size of the visible frustum
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldOfView {
    pub horizontal_deg: f64,
}

impl FieldOfView {
    pub fn new(horizontal_deg: f64) -> Self {
        Self { horizontal_deg }
    }

    /// Vertical FOV derived from the viewport aspect ratio
    pub fn vertical_deg(&self, viewport: Viewport) -> f64 {
        self.horizontal_deg * (viewport.height as f64 / viewport.width as f64)
    }
}

impl Default for FieldOfView {
    fn default() -> Self {
        Self::new(DEFAULT_HORIZONTAL_FOV_DEG)
    }
}

/// Pixel dimensions of the video frame or drawing canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn center(&self) -> ScreenPoint {
        ScreenPoint::new(self.width as f64 / 2.0, self.height as f64 / 2.0)
    }
}

impl std::fmt::Display for Viewport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Pixel coordinate on the overlay, origin top-left
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertical_fov_follows_aspect() {
        let fov = FieldOfView::new(60.0);
        let vertical = fov.vertical_deg(Viewport::new(800, 600));
        assert!((vertical - 45.0).abs() < 1e-12);
    }

    #[test]
    fn test_observer_defaults_to_origin() {
        let observer = Observer::default();
        assert_eq!(observer, Observer::new(0.0, 0.0, 0.0));
        assert!(observer.is_valid());
        assert!(!Observer::new(91.0, 0.0, 0.0).is_valid());
        assert!(!Observer::new(0.0, -180.5, 0.0).is_valid());
        assert!(!Observer::new(f64::NAN, 0.0, 0.0).is_valid());
    }

    #[test]
    fn test_heading_normalizes() {
        let heading = Heading::new(-10.0, 120.0);
        assert!((heading.azimuth - 350.0).abs() < 1e-12);
        assert_eq!(heading.altitude, 90.0);
    }

    #[test]
    fn test_viewport_center() {
        let viewport = Viewport::new(640, 480);
        assert_eq!(viewport.center(), ScreenPoint::new(320.0, 240.0));
        assert!(Viewport::new(0, 480).is_empty());
        assert_eq!(viewport.to_string(), "640x480");
    }
}
