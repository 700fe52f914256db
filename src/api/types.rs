//! Common API types and data structures

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::Viewport;
use crate::hardware::{SensorError, SensorKind};
use crate::utils::ConfigError;

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;

/// Session error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    /// The camera could not be opened, so there is nothing to overlay
    #[error("{0}")]
    CameraUnavailable(SensorError),

    /// Frame stepping was requested before `start`
    #[error("Session not started")]
    NotStarted,

    /// The session was stopped and cannot be stepped again
    #[error("Session stopped")]
    Stopped,

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Invalid callback handle")]
    InvalidCallback,
}

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    /// Created, `start` not called yet
    Idle,
    /// Camera open, frames are being drawn
    Running,
    /// Camera refused; the overlay cannot run
    Blocked,
    /// Stopped by the host or because the video stream ended
    Stopped,
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            SessionStatus::Idle => "idle",
            SessionStatus::Running => "running",
            SessionStatus::Blocked => "blocked",
            SessionStatus::Stopped => "stopped",
        };
        f.write_str(text)
    }
}

/// Why the frame loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    Requested,
    StreamEnded,
    SchedulerFinished,
}

/// Events that can trigger callbacks
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    StatusChanged {
        old_status: SessionStatus,
        new_status: SessionStatus,
    },
    /// Human-readable status line for the user, e.g. "Camera access denied"
    StatusMessage { message: String },
    PermissionDenied { sensor: SensorKind },
    CanvasResized { from: Viewport, to: Viewport },
    /// A body has failed to resolve for the configured number of frames in a row
    BodyUnresolvable { body: String, consecutive_failures: u32 },
    Stopped { reason: StopReason },
}

/// Snapshot of session counters
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionState {
    pub frames_rendered: u64,
    pub orientation_events: u64,
    pub position_fixes: u32,
    pub has_position_fix: bool,
    pub tracked_bodies: Vec<String>,
    pub status_message: Option<String>,
}

/// Output format for frame reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(format!("unknown output format '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_error_message_passes_through() {
        let err = SessionError::CameraUnavailable(SensorError::PermissionDenied {
            sensor: SensorKind::Camera,
        });
        assert_eq!(err.to_string(), "Camera access denied");
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("txt".parse::<OutputFormat>(), Ok(OutputFormat::Text));
        assert!("xml".parse::<OutputFormat>().is_err());
    }
}
