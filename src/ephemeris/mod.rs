//! Celestial position calculations
//!
//! The overlay treats the astronomy engine as a collaborator behind the
//! [`AstronomyEngine`] trait. [`BuiltinEngine`] is a low-precision engine
//! good to a fraction of a degree for the Sun, Moon, the planets and a
//! handful of bright named stars, which is well below what a phone
//! orientation sensor can resolve.

use crate::core::{HorizontalPosition, Observer};
use chrono::{DateTime, Utc};
use thiserror::Error;

pub mod time;
pub mod coordinates;
pub mod planets;
pub mod lunar;
pub mod stars;
pub mod engine;

pub use coordinates::Equatorial;
pub use engine::BuiltinEngine;
pub use stars::BrightStar;

/// Error types for ephemeris calculations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EphemerisError {
    #[error("Unknown body: {0}")]
    UnknownBody(String),

    #[error("Invalid time: {0}")]
    InvalidTime(String),

    #[error("Invalid observer: {0}")]
    InvalidObserver(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

pub type EphemerisResult<T> = Result<T, EphemerisError>;

/// Source of sky positions for named bodies
pub trait AstronomyEngine {
    /// Apparent azimuth/altitude of `body` for `observer` at `time`
    fn horizontal_position(
        &self,
        body: &str,
        time: DateTime<Utc>,
        observer: &Observer,
    ) -> EphemerisResult<HorizontalPosition>;

    /// Names of the bodies this engine can resolve
    fn supported_bodies(&self) -> Vec<String>;
}

/// Solar system bodies the built-in engine models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolarSystemBody {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
}

impl SolarSystemBody {
    pub const ALL: [SolarSystemBody; 9] = [
        SolarSystemBody::Sun,
        SolarSystemBody::Moon,
        SolarSystemBody::Mercury,
        SolarSystemBody::Venus,
        SolarSystemBody::Mars,
        SolarSystemBody::Jupiter,
        SolarSystemBody::Saturn,
        SolarSystemBody::Uranus,
        SolarSystemBody::Neptune,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SolarSystemBody::Sun => "Sun",
            SolarSystemBody::Moon => "Moon",
            SolarSystemBody::Mercury => "Mercury",
            SolarSystemBody::Venus => "Venus",
            SolarSystemBody::Mars => "Mars",
            SolarSystemBody::Jupiter => "Jupiter",
            SolarSystemBody::Saturn => "Saturn",
            SolarSystemBody::Uranus => "Uranus",
            SolarSystemBody::Neptune => "Neptune",
        }
    }

    /// Case-insensitive lookup by name
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|body| body.name().eq_ignore_ascii_case(name))
    }

    /// Planets visible without optical aid
    pub fn is_naked_eye(&self) -> bool {
        !matches!(self, SolarSystemBody::Uranus | SolarSystemBody::Neptune)
    }
}

impl std::fmt::Display for SolarSystemBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_lookup_is_case_insensitive() {
        assert_eq!(SolarSystemBody::from_name("moon"), Some(SolarSystemBody::Moon));
        assert_eq!(SolarSystemBody::from_name(" JUPITER "), Some(SolarSystemBody::Jupiter));
        assert_eq!(SolarSystemBody::from_name("Pluto"), None);
    }

    #[test]
    fn test_naked_eye_planets() {
        let naked: Vec<_> = SolarSystemBody::ALL.iter().filter(|b| b.is_naked_eye()).collect();
        assert_eq!(naked.len(), 7);
        assert!(!SolarSystemBody::Neptune.is_naked_eye());
    }
}
