//! Time scales and sidereal time.
//!
//! UTC is used directly as the dynamical time; the ~70 s difference to TT
//! moves the Moon by well under a tenth of a degree.

use chrono::{DateTime, Datelike, Utc};

use crate::core::normalize_azimuth;
use crate::ephemeris::{EphemerisError, EphemerisResult};

pub const J2000_JD: f64 = 2451545.0;
pub const UNIX_EPOCH_JD: f64 = 2440587.5;
pub const SECONDS_PER_DAY: f64 = 86400.0;
pub const DAYS_PER_JULIAN_CENTURY: f64 = 36525.0;

pub const GMST_BASE_DEG: f64 = 280.46061837;
pub const GMST_ROTATION_PER_DAY: f64 = 360.98564736629;
pub const GMST_CORRECTION: f64 = 0.000387933;

/// Years covered by the mean orbital elements
pub const VALID_YEARS: std::ops::RangeInclusive<i32> = 1800..=2050;

/// Julian date of a UTC instant
pub fn julian_date(time: DateTime<Utc>) -> f64 {
    time.timestamp_millis() as f64 / (1000.0 * SECONDS_PER_DAY) + UNIX_EPOCH_JD
}

/// Days elapsed since J2000.0 (2000-01-01 12:00 UTC)
pub fn days_since_j2000(time: DateTime<Utc>) -> f64 {
    julian_date(time) - J2000_JD
}

/// Julian centuries elapsed since J2000.0
pub fn centuries_since_j2000(time: DateTime<Utc>) -> f64 {
    days_since_j2000(time) / DAYS_PER_JULIAN_CENTURY
}

/// Greenwich mean sidereal time in degrees, `[0, 360)`
pub fn greenwich_mean_sidereal_time(time: DateTime<Utc>) -> f64 {
    let days = days_since_j2000(time);
    let centuries = days / DAYS_PER_JULIAN_CENTURY;
    let gmst = GMST_BASE_DEG
        + GMST_ROTATION_PER_DAY * days
        + GMST_CORRECTION * centuries * centuries
        - centuries * centuries * centuries / 38710000.0;
    normalize_azimuth(gmst)
}

/// Local mean sidereal time in degrees for an east-positive longitude
pub fn local_sidereal_time(time: DateTime<Utc>, longitude_deg: f64) -> f64 {
    normalize_azimuth(greenwich_mean_sidereal_time(time) + longitude_deg)
}

/// Reject instants outside the span the orbital elements are fitted for
pub fn check_supported(time: DateTime<Utc>) -> EphemerisResult<()> {
    if VALID_YEARS.contains(&time.year()) {
        Ok(())
    } else {
        Err(EphemerisError::InvalidTime(format!(
            "{} is outside the supported years {}-{}",
            time.to_rfc3339(),
            VALID_YEARS.start(),
            VALID_YEARS.end()
        )))
    }
}
