//! Hardware abstraction layer for the device sensors and the drawing surface
//!
//! The overlay never talks to a camera, GPS or gyroscope directly. Each
//! capability sits behind a small trait so a browser shell, a native app or
//! the mocks in [`mock`] can drive the same session.

pub mod error;
pub mod sensors;
pub mod surface;
pub mod mock;

pub use error::{RecoveryStrategy, SensorError, SensorKind, SensorResult};
pub use sensors::{CameraSource, GeoFix, GeolocationSource, OrientationSource};
pub use surface::{DrawCommand, RecordingSurface, RenderSurface};
pub use mock::{MockCamera, MockGeolocation, MockOrientation, StaticSkyEngine};
