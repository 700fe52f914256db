//! Live state holders and the per-frame pipeline

pub mod heading;
pub mod observer;
pub mod selection;
pub mod resolver;
pub mod render;

pub use heading::{HeadingState, OrientationEvent};
pub use observer::ObserverState;
pub use selection::BodySelection;
pub use resolver::{CelestialResolver, ResolveError};
pub use render::{BodyFailure, FrameInputs, FrameReport, Marker, RenderLoop};
