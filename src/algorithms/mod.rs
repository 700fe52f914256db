//! Geometric algorithms for placing bodies on the overlay

pub mod projection;

pub use projection::{project, AngularOffset, Frustum};
