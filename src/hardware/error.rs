//! Sensor error types and handling

use thiserror::Error;

/// Which device capability an error concerns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum SensorKind {
    Camera,
    Geolocation,
    Orientation,
}

impl std::fmt::Display for SensorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SensorKind::Camera => "Camera",
            SensorKind::Geolocation => "Location",
            SensorKind::Orientation => "Orientation",
        };
        f.write_str(name)
    }
}

/// Errors reported by the device sensors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SensorError {
    /// The user or platform refused access
    #[error("{sensor} access denied")]
    PermissionDenied { sensor: SensorKind },

    /// The device has no such sensor or it cannot be opened
    #[error("{sensor} unavailable: {details}")]
    Unavailable { sensor: SensorKind, details: String },

    /// No reading arrived within the allotted time
    #[error("{sensor} timed out after {timeout_ms}ms")]
    Timeout { sensor: SensorKind, timeout_ms: u32 },

    /// A reading arrived but its values are unusable
    #[error("Invalid {sensor} reading: {details}")]
    InvalidReading { sensor: SensorKind, details: String },

    /// The sensor stream was closed
    #[error("{sensor} stream ended")]
    StreamEnded { sensor: SensorKind },
}

/// Result type for sensor operations
pub type SensorResult<T> = Result<T, SensorError>;

/// Error recovery strategy for sensor failures
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RecoveryStrategy {
    /// Keep polling on the next frame
    Retry,
    /// Wait and then retry
    RetryWithDelay { delay_ms: u32 },
    /// Drop the reading and continue with the previous state
    Skip,
    /// Continue without this sensor
    Fail,
}

impl SensorError {
    pub fn sensor(&self) -> SensorKind {
        match self {
            SensorError::PermissionDenied { sensor }
            | SensorError::Unavailable { sensor, .. }
            | SensorError::Timeout { sensor, .. }
            | SensorError::InvalidReading { sensor, .. }
            | SensorError::StreamEnded { sensor } => *sensor,
        }
    }

    /// Get the recommended recovery strategy for this error
    pub fn recovery_strategy(&self) -> RecoveryStrategy {
        match self {
            SensorError::PermissionDenied { .. } => RecoveryStrategy::Fail,
            SensorError::Unavailable { .. } => RecoveryStrategy::Fail,
            SensorError::Timeout { .. } => RecoveryStrategy::RetryWithDelay { delay_ms: 1000 },
            SensorError::InvalidReading { .. } => RecoveryStrategy::Skip,
            SensorError::StreamEnded { .. } => RecoveryStrategy::Fail,
        }
    }

    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        !matches!(self.recovery_strategy(), RecoveryStrategy::Fail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_message() {
        let err = SensorError::PermissionDenied { sensor: SensorKind::Camera };
        assert_eq!(err.to_string(), "Camera access denied");
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_recovery_classification() {
        let timeout = SensorError::Timeout { sensor: SensorKind::Geolocation, timeout_ms: 5000 };
        assert!(timeout.is_recoverable());
        assert_eq!(timeout.sensor(), SensorKind::Geolocation);

        let bad = SensorError::InvalidReading {
            sensor: SensorKind::Orientation,
            details: "NaN beta".to_string(),
        };
        assert_eq!(bad.recovery_strategy(), RecoveryStrategy::Skip);
        assert!(!SensorError::StreamEnded { sensor: SensorKind::Camera }.is_recoverable());
    }
}
