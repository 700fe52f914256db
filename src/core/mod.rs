//! Core types and constants for the sky overlay

pub mod types;
pub mod constants;
pub mod angles;

pub use types::*;
pub use constants::*;
pub use angles::{normalize_azimuth, wrap_delta};
