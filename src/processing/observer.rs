//! Geographic position of the viewer

use log::{debug, info, warn};

use crate::core::Observer;
use crate::hardware::{GeoFix, SensorError};

/// Latest accepted observer position.
///
/// Starts at `(0, 0, 0)` so bodies can be resolved before the first fix
/// arrives; they will be misplaced until then.
#[derive(Debug, Clone, Default)]
pub struct ObserverState {
    observer: Observer,
    has_fix: bool,
    accuracy_m: Option<f64>,
    fixes_applied: u32,
    last_status: Option<String>,
}

impl ObserverState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Observer {
        self.observer
    }

    /// Whether a real fix has replaced the default position
    pub fn has_fix(&self) -> bool {
        self.has_fix
    }

    pub fn accuracy_m(&self) -> Option<f64> {
        self.accuracy_m
    }

    pub fn fixes_applied(&self) -> u32 {
        self.fixes_applied
    }

    pub fn last_status(&self) -> Option<&str> {
        self.last_status.as_deref()
    }

    /// Replace the observer with a new fix.
    ///
    /// Returns false and keeps the previous position if the fix is out of
    /// range. Elevation defaults to 0 when the fix has no altitude.
    pub fn apply_fix(&mut self, fix: &GeoFix) -> bool {
        let candidate = Observer::new(fix.latitude, fix.longitude, fix.altitude_m.unwrap_or(0.0));
        if !candidate.is_valid() {
            warn!(
                "Rejected position fix lat {} lon {} alt {:?}",
                fix.latitude, fix.longitude, fix.altitude_m
            );
            return false;
        }

        if !self.has_fix {
            info!(
                "First position fix: lat {:.4} lon {:.4} elevation {:.0}m",
                candidate.latitude, candidate.longitude, candidate.elevation_m
            );
        } else {
            debug!("Position fix: lat {:.4} lon {:.4}", candidate.latitude, candidate.longitude);
        }

        self.observer = candidate;
        self.has_fix = true;
        self.accuracy_m = fix.accuracy_m;
        self.fixes_applied += 1;
        self.last_status = None;
        true
    }

    /// Record a failed position request; the observer is left unchanged.
    /// Returns the status text to show the user.
    pub fn apply_failure(&mut self, error: &SensorError) -> String {
        let status = format!("Location unavailable: {}", error);
        warn!("{}", status);
        self.last_status = Some(status.clone());
        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::SensorKind;

    #[test]
    fn test_defaults_before_first_fix() {
        let state = ObserverState::new();
        assert_eq!(state.current(), Observer::new(0.0, 0.0, 0.0));
        assert!(!state.has_fix());
    }

    #[test]
    fn test_fix_replaces_observer() {
        let mut state = ObserverState::new();
        assert!(state.apply_fix(&GeoFix::new(51.5, -0.12).with_altitude(35.0).with_accuracy(12.0)));
        assert_eq!(state.current(), Observer::new(51.5, -0.12, 35.0));
        assert_eq!(state.accuracy_m(), Some(12.0));

        assert!(state.apply_fix(&GeoFix::new(-33.9, 151.2)));
        assert_eq!(state.current(), Observer::new(-33.9, 151.2, 0.0));
        assert_eq!(state.fixes_applied(), 2);
    }

    #[test]
    fn test_invalid_fix_is_rejected() {
        let mut state = ObserverState::new();
        state.apply_fix(&GeoFix::new(10.0, 20.0));
        assert!(!state.apply_fix(&GeoFix::new(95.0, 20.0)));
        assert!(!state.apply_fix(&GeoFix::new(f64::NAN, 20.0)));
        assert_eq!(state.current(), Observer::new(10.0, 20.0, 0.0));
    }

    #[test]
    fn test_failure_keeps_position() {
        let mut state = ObserverState::new();
        state.apply_fix(&GeoFix::new(10.0, 20.0));
        let status = state.apply_failure(&SensorError::PermissionDenied {
            sensor: SensorKind::Geolocation,
        });
        assert_eq!(status, "Location unavailable: Location access denied");
        assert_eq!(state.current(), Observer::new(10.0, 20.0, 0.0));
        assert_eq!(state.last_status(), Some(status.as_str()));
    }
}
