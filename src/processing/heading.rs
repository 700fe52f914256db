//! Device heading from orientation sensor events

use log::trace;
use serde::{Deserialize, Serialize};

use crate::core::{normalize_azimuth, wrap_delta, Heading, FULL_TURN_DEG, HORIZON_BETA_DEG};

/// One reading from the device orientation sensor.
///
/// `alpha` is the rotation about the screen normal (counter-clockwise),
/// `beta` the front-to-back tilt with 90 meaning the camera faces the
/// horizon. Platforms with a magnetometer report `compass_heading`
/// directly, already clockwise from north.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OrientationEvent {
    pub alpha: Option<f64>,
    pub beta: Option<f64>,
    pub gamma: Option<f64>,
    pub compass_heading: Option<f64>,
    pub timestamp_ms: u64,
}

impl OrientationEvent {
    /// Event carrying the Euler angles only
    pub fn from_euler(alpha: f64, beta: f64, gamma: f64) -> Self {
        Self {
            alpha: Some(alpha),
            beta: Some(beta),
            gamma: Some(gamma),
            ..Self::default()
        }
    }

    pub fn with_compass_heading(mut self, heading: f64) -> Self {
        self.compass_heading = Some(heading);
        self
    }

    pub fn with_timestamp(mut self, timestamp_ms: u64) -> Self {
        self.timestamp_ms = timestamp_ms;
        self
    }

    /// Azimuth implied by this event, if it carries one
    pub fn azimuth(&self) -> Option<f64> {
        let raw = match (self.compass_heading, self.alpha) {
            (Some(compass), _) if compass.is_finite() => compass,
            (_, Some(alpha)) if alpha.is_finite() => FULL_TURN_DEG - alpha,
            _ => return None,
        };
        Some(normalize_azimuth(raw))
    }

    /// Altitude implied by this event, if it carries one
    pub fn altitude(&self) -> Option<f64> {
        self.beta
            .filter(|beta| beta.is_finite())
            .map(|beta| (beta - HORIZON_BETA_DEG).clamp(-90.0, 90.0))
    }
}

/// Current pointing direction of the device
#[derive(Debug, Clone, Default)]
pub struct HeadingState {
    heading: Heading,
    smoothing: Option<f64>,
    events_applied: u64,
    last_event_ms: Option<u64>,
}

impl HeadingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blend each event into the previous heading with factor `alpha` in `(0, 1]`
    pub fn with_smoothing(alpha: f64) -> Self {
        let mut state = Self::new();
        state.set_smoothing(Some(alpha));
        state
    }

    /// Change the smoothing factor; `None` or out-of-range values disable it
    pub fn set_smoothing(&mut self, alpha: Option<f64>) {
        self.smoothing = alpha.filter(|a| *a > 0.0 && *a <= 1.0);
    }

    pub fn smoothing(&self) -> Option<f64> {
        self.smoothing
    }

    pub fn current(&self) -> Heading {
        self.heading
    }

    pub fn events_applied(&self) -> u64 {
        self.events_applied
    }

    pub fn last_event_ms(&self) -> Option<u64> {
        self.last_event_ms
    }

    /// Update the heading from a sensor event.
    ///
    /// Components the event does not carry keep their previous value.
    pub fn apply(&mut self, event: &OrientationEvent) -> Heading {
        let previous = self.heading;

        if let Some(azimuth) = event.azimuth() {
            self.heading.azimuth = match self.smoothing {
                // Blend along the short arc so 359 -> 1 does not swing through 180
                Some(alpha) => normalize_azimuth(previous.azimuth + alpha * wrap_delta(azimuth - previous.azimuth)),
                None => azimuth,
            };
        }

        if let Some(altitude) = event.altitude() {
            self.heading.altitude = match self.smoothing {
                Some(alpha) => previous.altitude + alpha * (altitude - previous.altitude),
                None => altitude,
            };
        }

        self.events_applied += 1;
        self.last_event_ms = Some(event.timestamp_ms);
        trace!(
            "heading az {:.2} alt {:.2} (event #{})",
            self.heading.azimuth,
            self.heading.altitude,
            self.events_applied
        );
        self.heading
    }

    /// Overwrite the heading, bypassing smoothing
    pub fn reset(&mut self, heading: Heading) {
        self.heading = heading;
    }
}
