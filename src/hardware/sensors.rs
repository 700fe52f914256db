//! Device sensor interface traits

use serde::{Deserialize, Serialize};

use crate::core::Viewport;
use crate::hardware::SensorResult;
use crate::processing::heading::OrientationEvent;

/// Live video source whose frame geometry sizes the overlay
pub trait CameraSource {
    /// Open the rear-facing camera stream.
    /// Returns Err(PermissionDenied) if the user refuses access
    fn start(&mut self) -> SensorResult<()>;

    /// Current pixel dimensions of the video frame
    fn frame_dimensions(&self) -> Viewport;

    /// Whether the stream is still delivering frames
    fn is_active(&self) -> bool;

    /// Close the stream
    fn stop(&mut self);
}

/// A single position fix
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoFix {
    pub latitude: f64,
    pub longitude: f64,
    /// Altitude above the ellipsoid in meters, when the platform reports one
    pub altitude_m: Option<f64>,
    /// Horizontal accuracy radius in meters
    pub accuracy_m: Option<f64>,
    pub timestamp_ms: u64,
}

impl GeoFix {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude_m: None,
            accuracy_m: None,
            timestamp_ms: 0,
        }
    }

    pub fn with_altitude(mut self, altitude_m: f64) -> Self {
        self.altitude_m = Some(altitude_m);
        self
    }

    pub fn with_accuracy(mut self, accuracy_m: f64) -> Self {
        self.accuracy_m = Some(accuracy_m);
        self
    }
}

/// Position provider.
///
/// `request_fix` starts a one-shot position request; its outcome is later
/// returned once by `poll_fix` as `Some(Ok(fix))` or `Some(Err(error))`.
pub trait GeolocationSource {
    fn request_fix(&mut self) -> SensorResult<()>;

    /// Returns None while no outcome is pending
    fn poll_fix(&mut self) -> Option<SensorResult<GeoFix>>;
}

/// Device orientation sensor
pub trait OrientationSource {
    /// Whether the platform requires an explicit user grant before events flow
    fn requires_permission(&self) -> bool;

    fn request_permission(&mut self) -> SensorResult<()>;

    /// Read the next pending event.
    /// Returns Ok(None) when no event is queued (non-blocking)
    fn read_event(&mut self) -> SensorResult<Option<OrientationEvent>>;
}
