//! Low-precision lunar position
//!
//! Truncated series for the Moon's ecliptic longitude, latitude and
//! horizontal parallax, good to roughly 0.3 degrees. The Moon is close
//! enough that the observer's offset from the Earth's center shifts it by up
//! to a degree, so positions are corrected to the topocentric frame.

use chrono::{DateTime, Utc};
use nalgebra::Vector3;

use crate::core::{normalize_azimuth, Observer};
use crate::ephemeris::coordinates::{ecliptic_to_equatorial, ecliptic_vector, Equatorial};
use crate::ephemeris::time::{centuries_since_j2000, local_sidereal_time};

/// Equatorial radius of the Earth (meters)
pub const EARTH_RADIUS_M: f64 = 6378137.0;

/// Geocentric ecliptic coordinates of the Moon
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LunarPosition {
    /// Ecliptic longitude (degrees)
    pub longitude_deg: f64,
    /// Ecliptic latitude (degrees)
    pub latitude_deg: f64,
    /// Distance in Earth radii
    pub distance_earth_radii: f64,
}

fn sin_deg(x: f64) -> f64 {
    x.to_radians().sin()
}

fn cos_deg(x: f64) -> f64 {
    x.to_radians().cos()
}

/// Geocentric ecliptic position of the Moon at `centuries` past J2000
pub fn geocentric_position(centuries: f64) -> LunarPosition {
    let t = centuries;

    let longitude = 218.32 + 481267.881 * t
        + 6.29 * sin_deg(135.0 + 477198.87 * t)
        - 1.27 * sin_deg(259.3 - 413335.36 * t)
        + 0.66 * sin_deg(235.7 + 890534.22 * t)
        + 0.21 * sin_deg(269.9 + 954397.74 * t)
        - 0.19 * sin_deg(357.5 + 35999.05 * t)
        - 0.11 * sin_deg(186.5 + 966404.03 * t);

    let latitude = 5.13 * sin_deg(93.3 + 483202.02 * t)
        + 0.28 * sin_deg(228.2 + 960400.89 * t)
        - 0.28 * sin_deg(318.3 + 6003.15 * t)
        - 0.17 * sin_deg(217.6 - 407332.21 * t);

    let parallax = 0.9508
        + 0.0518 * cos_deg(135.0 + 477198.87 * t)
        + 0.0095 * cos_deg(259.3 - 413335.36 * t)
        + 0.0078 * cos_deg(235.7 + 890534.22 * t)
        + 0.0028 * cos_deg(269.9 + 954397.74 * t);

    LunarPosition {
        longitude_deg: normalize_azimuth(longitude),
        latitude_deg: latitude,
        distance_earth_radii: 1.0 / sin_deg(parallax),
    }
}

/// Observer position in the equatorial frame, in Earth radii
fn observer_vector(observer: &Observer, time: DateTime<Utc>) -> Vector3<f64> {
    let lst = local_sidereal_time(time, observer.longitude).to_radians();
    let lat = observer.latitude.to_radians();
    let rho = 1.0 + observer.elevation_m / EARTH_RADIUS_M;
    Vector3::new(
        rho * lat.cos() * lst.cos(),
        rho * lat.cos() * lst.sin(),
        rho * lat.sin(),
    )
}

/// Geocentric equatorial direction of the Moon
pub fn geocentric_equatorial(time: DateTime<Utc>) -> Option<Equatorial> {
    let moon = geocentric_position(centuries_since_j2000(time));
    let ecliptic = ecliptic_vector(moon.longitude_deg, moon.latitude_deg, moon.distance_earth_radii);
    Equatorial::from_vector(&ecliptic_to_equatorial(&ecliptic))
}

/// Topocentric equatorial direction of the Moon for an observer
pub fn topocentric_equatorial(time: DateTime<Utc>, observer: &Observer) -> Option<Equatorial> {
    let moon = geocentric_position(centuries_since_j2000(time));
    let ecliptic = ecliptic_vector(moon.longitude_deg, moon.latitude_deg, moon.distance_earth_radii);
    let geocentric = ecliptic_to_equatorial(&ecliptic);
    Equatorial::from_vector(&(geocentric - observer_vector(observer, time)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::TimeZone;

    #[test]
    fn test_lunar_bounds() {
        for days in (0..60).map(|d| d as f64 * 1.3) {
            let moon = geocentric_position(0.24 + days / 36525.0);
            assert!(moon.latitude_deg.abs() <= 5.4, "latitude {}", moon.latitude_deg);
            assert!(
                (55.0..=64.5).contains(&moon.distance_earth_radii),
                "distance {}",
                moon.distance_earth_radii
            );
            assert!((0.0..360.0).contains(&moon.longitude_deg));
        }
    }

    #[test]
    fn test_moon_near_sun_at_total_eclipse() {
        // Total solar eclipse of 2024-04-08, greatest eclipse 18:17 UTC
        let time = Utc.with_ymd_and_hms(2024, 4, 8, 18, 17, 0).unwrap();
        let moon = geocentric_position(centuries_since_j2000(time));
        assert_abs_diff_eq!(moon.longitude_deg, 19.1, epsilon = 1.0);
        assert!(moon.latitude_deg.abs() < 1.0);
    }

    #[test]
    fn test_parallax_shift_is_bounded() {
        let time = Utc.with_ymd_and_hms(2024, 9, 1, 3, 0, 0).unwrap();
        let geocentric = geocentric_equatorial(time).unwrap();
        let topocentric = topocentric_equatorial(time, &Observer::new(52.0, 13.0, 40.0)).unwrap();
        let shift = geocentric.separation(&topocentric);
        assert!(shift > 0.0 && shift < 1.1, "parallax shift {}", shift);
    }
}
