//! Callback-driven overlay session
//!
//! [`SkySession`] owns every piece of live state (heading, observer,
//! selection) together with the device collaborators, and runs the frame
//! loop. Sensor readings are drained at the top of each frame, so state
//! updates never interleave with a frame in progress.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};

use crate::api::scheduler::FrameScheduler;
use crate::api::types::{SessionError, SessionEvent, SessionResult, SessionState, SessionStatus, StopReason};
use crate::core::{FieldOfView, Heading, Observer};
use crate::ephemeris::AstronomyEngine;
use crate::hardware::{CameraSource, GeolocationSource, OrientationSource, RenderSurface, SensorError};
use crate::processing::{
    BodySelection, CelestialResolver, FrameInputs, FrameReport, HeadingState, ObserverState, RenderLoop,
};
use crate::utils::{validate_fov, SkyConfig};

/// Callback function type for rendered frames
pub type FrameCallback = Box<dyn Fn(&FrameReport) + Send>;

/// Callback function type for session events
pub type EventCallback = Box<dyn Fn(&SessionEvent) + Send>;

/// Callback registration handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackHandle(u32);

impl CallbackHandle {
    pub fn id(&self) -> u32 {
        self.0
    }
}

/// Cancels a running frame loop from another thread or a callback
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// A live sky overlay
pub struct SkySession<C, G, O, S> {
    camera: C,
    geolocation: G,
    orientation: O,
    surface: S,
    resolver: CelestialResolver,
    heading: HeadingState,
    observer: ObserverState,
    selection: BodySelection,
    fov: FieldOfView,
    render: RenderLoop,
    status: SessionStatus,
    status_message: Option<String>,
    stop_handle: StopHandle,
    callback_counter: u32,
    frame_callbacks: HashMap<CallbackHandle, FrameCallback>,
    event_callbacks: HashMap<CallbackHandle, EventCallback>,
    last_report: Option<FrameReport>,
}

impl<C, G, O, S> SkySession<C, G, O, S>
where
    C: CameraSource,
    G: GeolocationSource,
    O: OrientationSource,
    S: RenderSurface,
{
    pub fn new(
        config: &SkyConfig,
        camera: C,
        geolocation: G,
        orientation: O,
        surface: S,
        engine: Box<dyn AstronomyEngine>,
    ) -> Self {
        let mut heading = HeadingState::new();
        heading.set_smoothing(config.heading_smoothing);

        let mut render = RenderLoop::new(config.overlay.clone());
        render.set_backdrop_stars(config.backdrop_stars);

        Self {
            camera,
            geolocation,
            orientation,
            surface,
            resolver: CelestialResolver::with_threshold(engine, config.unresolvable_after_failures),
            heading,
            observer: ObserverState::new(),
            selection: BodySelection::from_names(config.tracked_bodies.iter().cloned()),
            fov: FieldOfView::new(config.horizontal_fov_deg),
            render,
            status: SessionStatus::Idle,
            status_message: None,
            stop_handle: StopHandle::default(),
            callback_counter: 0,
            frame_callbacks: HashMap::new(),
            event_callbacks: HashMap::new(),
            last_report: None,
        }
    }

    /// Open the camera, request sensor permissions and a first position fix.
    ///
    /// A refused camera blocks the session. Refused orientation or location
    /// only set a status message; the overlay then runs on default state.
    pub fn start(&mut self) -> SessionResult<()> {
        match self.status {
            SessionStatus::Running => return Ok(()),
            SessionStatus::Stopped => return Err(SessionError::Stopped),
            SessionStatus::Idle | SessionStatus::Blocked => {}
        }

        if let Err(err) = self.camera.start() {
            warn!("Camera failed to start: {}", err);
            self.report_sensor_error(&err, err.to_string());
            self.set_status(SessionStatus::Blocked);
            return Err(SessionError::CameraUnavailable(err));
        }
        info!("Camera started at {}", self.camera.frame_dimensions());

        if self.orientation.requires_permission() {
            if let Err(err) = self.orientation.request_permission() {
                warn!("Orientation permission refused: {}", err);
                self.report_sensor_error(&err, err.to_string());
            }
        }

        if let Err(err) = self.geolocation.request_fix() {
            let message = self.observer.apply_failure(&err);
            self.report_sensor_error(&err, message);
        }

        self.set_status(SessionStatus::Running);
        Ok(())
    }

    /// Render one frame at the current time
    pub fn step_frame(&mut self) -> SessionResult<FrameReport> {
        self.step_frame_at(Utc::now())
    }

    /// Render one frame as of `time`
    pub fn step_frame_at(&mut self, time: DateTime<Utc>) -> SessionResult<FrameReport> {
        match self.status {
            SessionStatus::Idle => return Err(SessionError::NotStarted),
            SessionStatus::Blocked | SessionStatus::Stopped => return Err(SessionError::Stopped),
            SessionStatus::Running => {}
        }
        if let Some(reason) = self.pending_stop() {
            self.finish(reason);
            return Err(SessionError::Stopped);
        }

        self.drain_orientation();
        self.drain_geolocation();

        let inputs = FrameInputs {
            time,
            heading: self.heading.current(),
            observer: self.observer.current(),
            fov: self.fov,
            video: self.camera.frame_dimensions(),
        };
        let report = self
            .render
            .render_frame(&mut self.surface, &mut self.resolver, &self.selection, &inputs);

        if let Some(from) = report.resized_from {
            self.trigger_event(SessionEvent::CanvasResized {
                from,
                to: report.viewport,
            });
        }
        for body in self.resolver.take_newly_unresolvable() {
            let consecutive_failures = self.resolver.failure_count(&body);
            self.trigger_event(SessionEvent::BodyUnresolvable {
                body,
                consecutive_failures,
            });
        }

        for callback in self.frame_callbacks.values() {
            callback(&report);
        }
        self.last_report = Some(report.clone());
        Ok(report)
    }

    /// Drive frames until stopped, the camera stream ends or the scheduler finishes
    pub fn run(&mut self, scheduler: &mut dyn FrameScheduler) -> SessionResult<StopReason> {
        match self.status {
            SessionStatus::Idle => self.start()?,
            SessionStatus::Blocked | SessionStatus::Stopped => return Err(SessionError::Stopped),
            SessionStatus::Running => {}
        }

        loop {
            if !scheduler.wait_for_next_frame() {
                self.finish(StopReason::SchedulerFinished);
                return Ok(StopReason::SchedulerFinished);
            }
            if let Some(reason) = self.pending_stop() {
                self.finish(reason);
                return Ok(reason);
            }
            self.step_frame()?;
        }
    }

    /// Stop the loop and release the camera
    pub fn stop(&mut self) {
        self.stop_handle.stop();
        self.finish(StopReason::Requested);
    }

    /// Handle that stops the loop before its next frame
    pub fn stop_handle(&self) -> StopHandle {
        self.stop_handle.clone()
    }

    fn pending_stop(&self) -> Option<StopReason> {
        if self.stop_handle.is_stopped() {
            Some(StopReason::Requested)
        } else if !self.camera.is_active() {
            Some(StopReason::StreamEnded)
        } else {
            None
        }
    }

    fn finish(&mut self, reason: StopReason) {
        if self.status == SessionStatus::Stopped {
            return;
        }
        info!("Session stopping: {:?}", reason);
        self.camera.stop();
        self.set_status(SessionStatus::Stopped);
        self.trigger_event(SessionEvent::Stopped { reason });
    }

    fn drain_orientation(&mut self) {
        loop {
            match self.orientation.read_event() {
                Ok(Some(event)) => {
                    self.heading.apply(&event);
                }
                Ok(None) => break,
                Err(err) => {
                    debug!("Orientation read failed: {}", err);
                    if !err.is_recoverable() {
                        self.report_sensor_error(&err, err.to_string());
                    }
                    break;
                }
            }
        }
    }

    fn drain_geolocation(&mut self) {
        while let Some(outcome) = self.geolocation.poll_fix() {
            match outcome {
                Ok(fix) => {
                    self.observer.apply_fix(&fix);
                }
                Err(err) => {
                    let message = self.observer.apply_failure(&err);
                    self.report_sensor_error(&err, message);
                }
            }
        }
    }

    fn report_sensor_error(&mut self, err: &SensorError, message: String) {
        if let SensorError::PermissionDenied { sensor } = err {
            self.trigger_event(SessionEvent::PermissionDenied { sensor: *sensor });
        }
        self.status_message = Some(message.clone());
        self.trigger_event(SessionEvent::StatusMessage { message });
    }

    fn set_status(&mut self, new_status: SessionStatus) {
        let old_status = self.status;
        if old_status == new_status {
            return;
        }
        self.status = new_status;
        self.trigger_event(SessionEvent::StatusChanged { old_status, new_status });
    }

    fn trigger_event(&self, event: SessionEvent) {
        for callback in self.event_callbacks.values() {
            callback(&event);
        }
    }

    // Live configuration

    /// Change the horizontal field of view; returns the previous value
    pub fn set_field_of_view(&mut self, horizontal_deg: f64) -> SessionResult<f64> {
        validate_fov(horizontal_deg)?;
        let old_value = self.fov.horizontal_deg;
        self.fov = FieldOfView::new(horizontal_deg);
        Ok(old_value)
    }

    /// Track or untrack a body; returns whether the selection changed
    pub fn set_body_tracked(&mut self, body: &str, tracked: bool) -> bool {
        let changed = self.selection.set_tracked(body, tracked);
        if changed && !tracked {
            self.resolver.forget(body.trim());
        }
        changed
    }

    pub fn set_heading_smoothing(&mut self, smoothing: Option<f64>) {
        self.heading.set_smoothing(smoothing);
    }

    pub fn set_backdrop_stars(&mut self, count: u32) {
        self.render.set_backdrop_stars(count);
    }

    // Callbacks

    pub fn register_frame_callback(&mut self, callback: FrameCallback) -> CallbackHandle {
        self.callback_counter += 1;
        let handle = CallbackHandle(self.callback_counter);
        self.frame_callbacks.insert(handle, callback);
        handle
    }

    pub fn register_event_callback(&mut self, callback: EventCallback) -> CallbackHandle {
        self.callback_counter += 1;
        let handle = CallbackHandle(self.callback_counter);
        self.event_callbacks.insert(handle, callback);
        handle
    }

    pub fn unregister_callback(&mut self, handle: CallbackHandle) -> SessionResult<()> {
        let removed =
            self.frame_callbacks.remove(&handle).is_some() || self.event_callbacks.remove(&handle).is_some();
        if removed {
            Ok(())
        } else {
            Err(SessionError::InvalidCallback)
        }
    }

    // Accessors

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Latest human-readable status line, if any
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn heading(&self) -> Heading {
        self.heading.current()
    }

    pub fn observer(&self) -> Observer {
        self.observer.current()
    }

    pub fn field_of_view(&self) -> FieldOfView {
        self.fov
    }

    pub fn selection(&self) -> &BodySelection {
        &self.selection
    }

    pub fn supported_bodies(&self) -> Vec<String> {
        self.resolver.supported_bodies()
    }

    pub fn last_report(&self) -> Option<&FrameReport> {
        self.last_report.as_ref()
    }

    pub fn state(&self) -> SessionState {
        SessionState {
            frames_rendered: self.render.frames_rendered(),
            orientation_events: self.heading.events_applied(),
            position_fixes: self.observer.fixes_applied(),
            has_position_fix: self.observer.has_fix(),
            tracked_bodies: self.selection.iter().map(str::to_string).collect(),
            status_message: self.status_message.clone(),
        }
    }

    pub fn camera(&self) -> &C {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut C {
        &mut self.camera
    }

    pub fn geolocation_mut(&mut self) -> &mut G {
        &mut self.geolocation
    }

    pub fn orientation_mut(&mut self) -> &mut O {
        &mut self.orientation
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::scheduler::LimitedScheduler;
    use crate::core::{ScreenPoint, Viewport};
    use crate::ephemeris::EphemerisError;
    use crate::hardware::{
        GeoFix, MockCamera, MockGeolocation, MockOrientation, RecordingSurface, SensorKind, StaticSkyEngine,
    };
    use std::sync::Mutex;

    type MockSession = SkySession<MockCamera, MockGeolocation, MockOrientation, RecordingSurface>;

    fn engine() -> StaticSkyEngine {
        StaticSkyEngine::new()
            .with_body("Moon", 10.0, 0.0)
            .with_body("Venus", 250.0, 15.0)
            .with_failure("Mars", EphemerisError::CalculationError("no data".to_string()))
    }

    fn session_with(config: &SkyConfig, camera: MockCamera, orientation: MockOrientation) -> MockSession {
        SkySession::new(
            config,
            camera,
            MockGeolocation::with_fix(GeoFix::new(52.5, 13.4).with_altitude(34.0)),
            orientation,
            RecordingSurface::new(Viewport::new(640, 480)),
            Box::new(engine()),
        )
    }

    fn session() -> MockSession {
        session_with(&SkyConfig::default(), MockCamera::new(800, 600), MockOrientation::new())
    }

    fn collect_events(session: &mut MockSession) -> Arc<Mutex<Vec<SessionEvent>>> {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        session.register_event_callback(Box::new(move |event| sink.lock().unwrap().push(event.clone())));
        events
    }

    #[test]
    fn test_step_requires_start() {
        let mut session = session();
        assert_eq!(session.step_frame().unwrap_err(), SessionError::NotStarted);
    }

    #[test]
    fn test_frame_uses_fresh_sensor_state() {
        let mut session = session();
        session.start().unwrap();
        session.orientation_mut().push_pointing(10.0, 0.0);

        let report = session.step_frame().unwrap();
        assert_eq!(session.observer(), Observer::new(52.5, 13.4, 34.0));
        assert_eq!(report.heading, Heading::new(10.0, 0.0));
        assert_eq!(report.marker("Moon").unwrap().point, ScreenPoint::new(400.0, 300.0));
        assert_eq!(session.state().orientation_events, 1);
    }

    #[test]
    fn test_failing_body_is_isolated() {
        let mut session = session();
        session.set_body_tracked("Mars", true);
        session.start().unwrap();

        let report = session.step_frame().unwrap();
        assert!(report.is_visible("Moon"));
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].body, "Mars");
        assert_eq!(session.surface().frame_labels(), vec!["Moon"]);
    }

    #[test]
    fn test_canvas_follows_video_before_projection() {
        let mut session = session_with(&SkyConfig::default(), MockCamera::new(640, 480), MockOrientation::new());
        let events = collect_events(&mut session);
        session.start().unwrap();
        session.orientation_mut().push_pointing(10.0, 0.0);

        let first = session.step_frame().unwrap();
        assert!(first.resized_from.is_none());
        assert_eq!(first.marker("Moon").unwrap().point, ScreenPoint::new(320.0, 240.0));

        session.camera_mut().set_frame_dimensions(1280, 720);
        let second = session.step_frame().unwrap();
        assert_eq!(second.viewport, Viewport::new(1280, 720));
        assert_eq!(second.marker("Moon").unwrap().point, ScreenPoint::new(640.0, 360.0));
        assert!(events.lock().unwrap().contains(&SessionEvent::CanvasResized {
            from: Viewport::new(640, 480),
            to: Viewport::new(1280, 720),
        }));
    }

    #[test]
    fn test_camera_denied_blocks_session() {
        let mut session = session_with(&SkyConfig::default(), MockCamera::denied(), MockOrientation::new());
        let events = collect_events(&mut session);

        let err = session.start().unwrap_err();
        assert_eq!(err.to_string(), "Camera access denied");
        assert_eq!(session.status(), SessionStatus::Blocked);
        assert_eq!(session.status_message(), Some("Camera access denied"));
        assert!(events.lock().unwrap().contains(&SessionEvent::PermissionDenied {
            sensor: SensorKind::Camera
        }));
        assert_eq!(session.step_frame().unwrap_err(), SessionError::Stopped);
        assert_eq!(
            session.run(&mut LimitedScheduler::immediate(5)).unwrap_err(),
            SessionError::Stopped
        );
        assert_eq!(session.state().frames_rendered, 0);
    }

    #[test]
    fn test_run_after_stop_is_refused() {
        let mut session = session();
        session.run(&mut LimitedScheduler::immediate(2)).unwrap();
        assert_eq!(
            session.run(&mut LimitedScheduler::immediate(2)).unwrap_err(),
            SessionError::Stopped
        );
    }

    #[test]
    fn test_long_run_keeps_surface_bounded() {
        let config = SkyConfig {
            backdrop_stars: 200,
            ..SkyConfig::default()
        };
        let mut session = session_with(&config, MockCamera::new(800, 600), MockOrientation::new());
        session.orientation_mut().push_pointing(10.0, 0.0);

        session.run(&mut LimitedScheduler::immediate(10)).unwrap();
        let after_ten = session.surface().commands().len();
        assert!(after_ten <= 203);

        let mut session = session_with(&config, MockCamera::new(800, 600), MockOrientation::new());
        session.orientation_mut().push_pointing(10.0, 0.0);
        session.run(&mut LimitedScheduler::immediate(1000)).unwrap();
        assert_eq!(session.state().frames_rendered, 1000);
        assert_eq!(session.surface().commands().len(), after_ten);
        assert_eq!(session.surface().frames_cleared(), 1000);
        assert_eq!(session.surface().resize_count(), 1);
    }

    #[test]
    fn test_orientation_denied_keeps_running() {
        let mut session = session_with(
            &SkyConfig::default(),
            MockCamera::new(800, 600),
            MockOrientation::requiring_permission(false),
        );
        session.start().unwrap();
        session.orientation_mut().push_pointing(90.0, 45.0);

        let report = session.step_frame().unwrap();
        assert_eq!(session.status(), SessionStatus::Running);
        assert_eq!(session.status_message(), Some("Orientation access denied"));
        assert_eq!(report.heading, Heading::default());
    }

    #[test]
    fn test_location_failure_keeps_default_observer() {
        let mut session = SkySession::new(
            &SkyConfig::default(),
            MockCamera::new(800, 600),
            MockGeolocation::new(),
            MockOrientation::new(),
            RecordingSurface::default(),
            Box::new(engine()),
        );
        session.geolocation_mut().push_failure(SensorError::PermissionDenied {
            sensor: SensorKind::Geolocation,
        });
        session.start().unwrap();
        session.step_frame().unwrap();

        assert_eq!(session.observer(), Observer::default());
        assert_eq!(session.status_message(), Some("Location unavailable: Location access denied"));
    }

    #[test]
    fn test_stop_handle_halts_loop() {
        let mut session = session();
        let handle = session.stop_handle();
        let frames = Arc::new(Mutex::new(0u32));
        let counter = Arc::clone(&frames);
        session.register_frame_callback(Box::new(move |report| {
            *counter.lock().unwrap() += 1;
            if report.frame == 3 {
                handle.stop();
            }
        }));

        let reason = session.run(&mut LimitedScheduler::immediate(100)).unwrap();
        assert_eq!(reason, StopReason::Requested);
        assert_eq!(*frames.lock().unwrap(), 3);
        assert_eq!(session.status(), SessionStatus::Stopped);
        assert!(!session.camera().is_active());
    }

    #[test]
    fn test_stream_end_halts_loop() {
        let mut session = session();
        session.start().unwrap();
        session.step_frame().unwrap();
        session.camera_mut().end_stream();

        let reason = session.run(&mut LimitedScheduler::immediate(10)).unwrap();
        assert_eq!(reason, StopReason::StreamEnded);
        assert_eq!(session.state().frames_rendered, 1);
    }

    #[test]
    fn test_scheduler_limit() {
        let mut session = session();
        let reason = session.run(&mut LimitedScheduler::immediate(5)).unwrap();
        assert_eq!(reason, StopReason::SchedulerFinished);
        assert_eq!(session.state().frames_rendered, 5);
        assert!(session.last_report().is_some());
    }

    #[test]
    fn test_unresolvable_body_reported_once() {
        let config = SkyConfig {
            tracked_bodies: vec!["Moon".to_string(), "Mars".to_string()],
            unresolvable_after_failures: 3,
            ..SkyConfig::default()
        };
        let mut session = session_with(&config, MockCamera::new(800, 600), MockOrientation::new());
        let events = collect_events(&mut session);
        session.run(&mut LimitedScheduler::immediate(6)).unwrap();

        let unresolvable: Vec<_> = events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| matches!(e, SessionEvent::BodyUnresolvable { .. }))
            .cloned()
            .collect();
        assert_eq!(
            unresolvable,
            vec![SessionEvent::BodyUnresolvable {
                body: "Mars".to_string(),
                consecutive_failures: 3
            }]
        );
    }

    #[test]
    fn test_live_fov_change() {
        let mut session = session();
        session.start().unwrap();
        session.orientation_mut().push_pointing(0.0, 0.0);

        assert!(session.step_frame().unwrap().is_visible("Moon"));
        assert_eq!(session.set_field_of_view(10.0).unwrap(), 60.0);
        assert!(!session.step_frame().unwrap().is_visible("Moon"));
        assert!(session.set_field_of_view(-1.0).is_err());
        assert_eq!(session.field_of_view().horizontal_deg, 10.0);
    }

    #[test]
    fn test_unregister_callback() {
        let mut session = session();
        let handle = session.register_frame_callback(Box::new(|_| {}));
        assert!(session.unregister_callback(handle).is_ok());
        assert_eq!(session.unregister_callback(handle), Err(SessionError::InvalidCallback));
    }
}
