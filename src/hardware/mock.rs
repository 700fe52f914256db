//! Mock sensors and a fixed-position sky for testing and headless runs

use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::core::{HorizontalPosition, Observer, Viewport};
use crate::ephemeris::{AstronomyEngine, EphemerisError, EphemerisResult};
use crate::hardware::{
    CameraSource, GeoFix, GeolocationSource, OrientationSource, SensorError, SensorKind, SensorResult,
};
use crate::processing::heading::OrientationEvent;

/// Mock camera with adjustable frame geometry
#[derive(Debug, Clone)]
pub struct MockCamera {
    dimensions: Viewport,
    deny_permission: bool,
    active: bool,
    start_count: u32,
}

impl MockCamera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            dimensions: Viewport::new(width, height),
            deny_permission: false,
            active: false,
            start_count: 0,
        }
    }

    /// Camera whose `start` fails with a permission error
    pub fn denied() -> Self {
        let mut camera = Self::new(0, 0);
        camera.deny_permission = true;
        camera
    }

    /// Simulate a device rotation or a stream renegotiating its resolution
    pub fn set_frame_dimensions(&mut self, width: u32, height: u32) {
        self.dimensions = Viewport::new(width, height);
    }

    /// Simulate the stream being closed by the platform
    pub fn end_stream(&mut self) {
        self.active = false;
    }

    pub fn start_count(&self) -> u32 {
        self.start_count
    }
}

impl CameraSource for MockCamera {
    fn start(&mut self) -> SensorResult<()> {
        self.start_count += 1;
        if self.deny_permission {
            return Err(SensorError::PermissionDenied {
                sensor: SensorKind::Camera,
            });
        }
        self.active = true;
        Ok(())
    }

    fn frame_dimensions(&self) -> Viewport {
        if self.active {
            self.dimensions
        } else {
            Viewport::default()
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn stop(&mut self) {
        self.active = false;
    }
}

/// Mock position provider with scripted outcomes
#[derive(Debug, Clone, Default)]
pub struct MockGeolocation {
    outcomes: VecDeque<SensorResult<GeoFix>>,
    requested: bool,
}

impl MockGeolocation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider that answers the first request with `fix`
    pub fn with_fix(fix: GeoFix) -> Self {
        let mut geo = Self::new();
        geo.push_fix(fix);
        geo
    }

    pub fn push_fix(&mut self, fix: GeoFix) {
        self.outcomes.push_back(Ok(fix));
    }

    pub fn push_failure(&mut self, error: SensorError) {
        self.outcomes.push_back(Err(error));
    }

    pub fn pending_outcomes(&self) -> usize {
        self.outcomes.len()
    }
}

impl GeolocationSource for MockGeolocation {
    fn request_fix(&mut self) -> SensorResult<()> {
        self.requested = true;
        Ok(())
    }

    fn poll_fix(&mut self) -> Option<SensorResult<GeoFix>> {
        if !self.requested {
            return None;
        }
        self.outcomes.pop_front()
    }
}

/// Mock orientation sensor fed from a queue
#[derive(Debug, Clone, Default)]
pub struct MockOrientation {
    events: VecDeque<OrientationEvent>,
    requires_permission: bool,
    deny_permission: bool,
    granted: bool,
    jitter_deg: f64,
}

impl MockOrientation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sensor that needs a grant before it delivers events
    pub fn requiring_permission(grant: bool) -> Self {
        Self {
            requires_permission: true,
            deny_permission: !grant,
            ..Self::default()
        }
    }

    pub fn push_event(&mut self, event: OrientationEvent) {
        self.events.push_back(event);
    }

    /// Queue an event pointing the camera at `azimuth`/`altitude`
    pub fn push_pointing(&mut self, azimuth: f64, altitude: f64) {
        let event = OrientationEvent {
            beta: Some(altitude + 90.0),
            ..OrientationEvent::default()
        };
        self.push_event(
            event
                .with_compass_heading(azimuth)
                .with_timestamp(Utc::now().timestamp_millis().max(0) as u64),
        );
    }

    /// Add uniform noise of +/- `amplitude_deg` to every delivered angle
    pub fn simulate_jitter(&mut self, amplitude_deg: f64) {
        self.jitter_deg = amplitude_deg.abs();
    }

    pub fn queued_event_count(&self) -> usize {
        self.events.len()
    }

    fn jittered(&self, value: Option<f64>) -> Option<f64> {
        if self.jitter_deg == 0.0 {
            return value;
        }
        let mut rng = rand::thread_rng();
        value.map(|v| v + rng.gen_range(-self.jitter_deg..=self.jitter_deg))
    }
}

impl OrientationSource for MockOrientation {
    fn requires_permission(&self) -> bool {
        self.requires_permission
    }

    fn request_permission(&mut self) -> SensorResult<()> {
        if self.deny_permission {
            return Err(SensorError::PermissionDenied {
                sensor: SensorKind::Orientation,
            });
        }
        self.granted = true;
        Ok(())
    }

    fn read_event(&mut self) -> SensorResult<Option<OrientationEvent>> {
        if self.requires_permission && !self.granted {
            return Ok(None);
        }

        let Some(mut event) = self.events.pop_front() else {
            return Ok(None);
        };
        event.alpha = self.jittered(event.alpha);
        event.beta = self.jittered(event.beta);
        event.compass_heading = self.jittered(event.compass_heading);
        Ok(Some(event))
    }
}

/// Engine returning fixed positions, or fixed errors, per body
#[derive(Debug, Clone, Default)]
pub struct StaticSkyEngine {
    positions: HashMap<String, EphemerisResult<HorizontalPosition>>,
}

impl StaticSkyEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, name: &str, azimuth: f64, altitude: f64) -> Self {
        self.set_body(name, azimuth, altitude);
        self
    }

    pub fn with_failure(mut self, name: &str, error: EphemerisError) -> Self {
        self.positions.insert(name.to_string(), Err(error));
        self
    }

    pub fn set_body(&mut self, name: &str, azimuth: f64, altitude: f64) {
        self.positions
            .insert(name.to_string(), Ok(HorizontalPosition::new(azimuth, altitude)));
    }
}

impl AstronomyEngine for StaticSkyEngine {
    fn horizontal_position(
        &self,
        body: &str,
        _time: DateTime<Utc>,
        _observer: &Observer,
    ) -> EphemerisResult<HorizontalPosition> {
        self.positions
            .get(body)
            .cloned()
            .unwrap_or_else(|| Err(EphemerisError::UnknownBody(body.to_string())))
    }

    fn supported_bodies(&self) -> Vec<String> {
        let mut names: Vec<String> = self.positions.keys().cloned().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_camera_lifecycle() {
        let mut camera = MockCamera::new(640, 480);
        assert!(!camera.is_active());
        assert!(camera.frame_dimensions().is_empty());

        camera.start().unwrap();
        assert_eq!(camera.frame_dimensions(), Viewport::new(640, 480));

        camera.set_frame_dimensions(1280, 720);
        assert_eq!(camera.frame_dimensions(), Viewport::new(1280, 720));

        camera.end_stream();
        assert!(!camera.is_active());
    }

    #[test]
    fn test_denied_camera() {
        let mut camera = MockCamera::denied();
        let err = camera.start().unwrap_err();
        assert_eq!(err.to_string(), "Camera access denied");
        assert!(!camera.is_active());
    }

    #[test]
    fn test_geolocation_requires_request() {
        let mut geo = MockGeolocation::with_fix(GeoFix::new(48.1, 11.6));
        assert!(geo.poll_fix().is_none());

        geo.request_fix().unwrap();
        let fix = geo.poll_fix().unwrap().unwrap();
        assert_eq!(fix.latitude, 48.1);
        assert!(geo.poll_fix().is_none());
    }

    #[test]
    fn test_orientation_permission_gate() {
        let mut sensor = MockOrientation::requiring_permission(true);
        sensor.push_event(OrientationEvent::from_euler(10.0, 90.0, 0.0));
        assert!(sensor.read_event().unwrap().is_none());

        sensor.request_permission().unwrap();
        assert!(sensor.read_event().unwrap().is_some());

        let mut refused = MockOrientation::requiring_permission(false);
        assert!(refused.request_permission().is_err());
    }

    #[test]
    fn test_jitter_stays_within_amplitude() {
        let mut sensor = MockOrientation::new();
        sensor.simulate_jitter(2.0);
        for _ in 0..50 {
            sensor.push_event(OrientationEvent::from_euler(100.0, 90.0, 0.0));
        }
        while let Some(event) = sensor.read_event().unwrap() {
            let alpha = event.alpha.unwrap();
            assert!((98.0..=102.0).contains(&alpha));
            assert!(event.compass_heading.is_none());
        }
    }

    #[test]
    fn test_static_engine() {
        let engine = StaticSkyEngine::new()
            .with_body("Moon", 120.0, 30.0)
            .with_failure("Mars", EphemerisError::CalculationError("boom".to_string()));
        let now = Utc::now();
        let observer = Observer::default();

        assert_eq!(
            engine.horizontal_position("Moon", now, &observer).unwrap(),
            HorizontalPosition::new(120.0, 30.0)
        );
        assert!(engine.horizontal_position("Mars", now, &observer).is_err());
        assert!(matches!(
            engine.horizontal_position("Venus", now, &observer),
            Err(EphemerisError::UnknownBody(_))
        ));
        assert_eq!(engine.supported_bodies(), vec!["Mars".to_string(), "Moon".to_string()]);
    }
}
