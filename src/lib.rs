//! Augmented-reality sky overlay
//!
//! Places markers for the Sun, Moon, planets and bright stars on top of a
//! live camera feed. Each frame the tracked bodies are resolved to
//! azimuth/altitude for the observer's position, compared with the
//! direction the device is pointing, and projected onto the overlay canvas
//! when they fall inside the camera's field of view.

pub mod core;
pub mod algorithms;
pub mod ephemeris;
pub mod processing;
pub mod utils;
pub mod hardware;
pub mod api;

// Re-export commonly used types
pub use core::{FieldOfView, Heading, HorizontalPosition, Observer, ScreenPoint, Viewport};
pub use algorithms::{project, Frustum};
pub use ephemeris::{AstronomyEngine, BuiltinEngine, EphemerisError, EphemerisResult};
pub use processing::{BodySelection, CelestialResolver, FrameReport, HeadingState, ObserverState, OrientationEvent, ResolveError};
pub use hardware::{CameraSource, GeolocationSource, OrientationSource, RenderSurface, SensorError, SensorResult};
pub use api::{SessionError, SessionEvent, SessionResult, SkySession, StopHandle};
pub use utils::{ConfigurationManager, SkyConfig};
