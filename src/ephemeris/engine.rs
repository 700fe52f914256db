//! Built-in astronomy engine

use chrono::{DateTime, Utc};
use log::trace;

use crate::core::{HorizontalPosition, Observer};
use crate::ephemeris::coordinates::{ecliptic_to_equatorial, equatorial_to_horizontal, Equatorial};
use crate::ephemeris::stars::{BrightStar, BRIGHT_STARS};
use crate::ephemeris::time::{centuries_since_j2000, check_supported};
use crate::ephemeris::{lunar, planets};
use crate::ephemeris::{AstronomyEngine, EphemerisError, EphemerisResult, SolarSystemBody};

/// Engine covering the Sun, Moon, planets and a few bright stars
#[derive(Debug, Clone)]
pub struct BuiltinEngine {
    include_stars: bool,
}

impl Default for BuiltinEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl BuiltinEngine {
    pub fn new() -> Self {
        Self { include_stars: true }
    }

    /// Engine restricted to solar system bodies
    pub fn solar_system_only() -> Self {
        Self { include_stars: false }
    }

    /// Apparent right ascension and declination of a body
    pub fn equatorial_position(
        &self,
        body: &str,
        time: DateTime<Utc>,
        observer: &Observer,
    ) -> EphemerisResult<Equatorial> {
        if let Some(solar_body) = SolarSystemBody::from_name(body) {
            return solar_system_position(solar_body, time, observer);
        }

        if self.include_stars {
            if let Some(star) = BrightStar::find(body) {
                return Ok(star.equatorial());
            }
        }

        Err(EphemerisError::UnknownBody(body.to_string()))
    }
}

fn solar_system_position(
    body: SolarSystemBody,
    time: DateTime<Utc>,
    observer: &Observer,
) -> EphemerisResult<Equatorial> {
    let position = match body {
        SolarSystemBody::Moon => lunar::topocentric_equatorial(time, observer),
        _ => planets::geocentric_position(body, centuries_since_j2000(time))
            .and_then(|ecliptic| Equatorial::from_vector(&ecliptic_to_equatorial(&ecliptic))),
    };

    position.ok_or_else(|| {
        EphemerisError::CalculationError(format!("no position for {} at {}", body, time.to_rfc3339()))
    })
}

impl AstronomyEngine for BuiltinEngine {
    fn horizontal_position(
        &self,
        body: &str,
        time: DateTime<Utc>,
        observer: &Observer,
    ) -> EphemerisResult<HorizontalPosition> {
        if !observer.is_valid() {
            return Err(EphemerisError::InvalidObserver(format!(
                "lat {} lon {} elevation {}",
                observer.latitude, observer.longitude, observer.elevation_m
            )));
        }
        check_supported(time)?;

        let equatorial = self.equatorial_position(body, time, observer)?;
        let horizontal = equatorial_to_horizontal(&equatorial, observer, time);
        trace!(
            "{}: ra {:.3} dec {:.3} -> az {:.3} alt {:.3}",
            body,
            equatorial.ra_deg,
            equatorial.dec_deg,
            horizontal.azimuth,
            horizontal.altitude
        );
        Ok(horizontal)
    }

    fn supported_bodies(&self) -> Vec<String> {
        let mut names: Vec<String> = SolarSystemBody::ALL.iter().map(|b| b.name().to_string()).collect();
        if self.include_stars {
            names.extend(BRIGHT_STARS.iter().map(|s| s.name.to_string()));
        }
        names
    }
}
