//! Frame conversions between ecliptic, equatorial and horizontal coordinates

use chrono::{DateTime, Utc};
use nalgebra::{Rotation3, Vector3};

use crate::core::{normalize_azimuth, HorizontalPosition, Observer};
use crate::ephemeris::time::local_sidereal_time;

/// Mean obliquity of the ecliptic at J2000 (degrees)
pub const MEAN_OBLIQUITY_DEG: f64 = 23.43928;

/// Point on the celestial sphere (degrees)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Equatorial {
    /// Right ascension, `[0, 360)`
    pub ra_deg: f64,
    /// Declination, `[-90, 90]`
    pub dec_deg: f64,
}

impl Equatorial {
    pub fn new(ra_deg: f64, dec_deg: f64) -> Self {
        Self {
            ra_deg: normalize_azimuth(ra_deg),
            dec_deg,
        }
    }

    /// Direction of a cartesian equatorial vector; `None` for the zero vector
    pub fn from_vector(v: &Vector3<f64>) -> Option<Self> {
        let r = v.norm();
        if r <= f64::EPSILON || !r.is_finite() {
            return None;
        }
        let ra = v.y.atan2(v.x).to_degrees();
        let dec = (v.z / r).clamp(-1.0, 1.0).asin().to_degrees();
        Some(Self::new(ra, dec))
    }

    /// Unit vector pointing at this position
    pub fn to_unit_vector(&self) -> Vector3<f64> {
        let (ra, dec) = (self.ra_deg.to_radians(), self.dec_deg.to_radians());
        Vector3::new(dec.cos() * ra.cos(), dec.cos() * ra.sin(), dec.sin())
    }

    /// Great-circle separation in degrees
    pub fn separation(&self, other: &Equatorial) -> f64 {
        let dot = self.to_unit_vector().dot(&other.to_unit_vector());
        dot.clamp(-1.0, 1.0).acos().to_degrees()
    }
}

/// Rotate an ecliptic vector into the equatorial frame
pub fn ecliptic_to_equatorial(ecliptic: &Vector3<f64>) -> Vector3<f64> {
    let tilt = Rotation3::from_axis_angle(&Vector3::x_axis(), MEAN_OBLIQUITY_DEG.to_radians());
    tilt * ecliptic
}

/// Ecliptic vector from spherical longitude/latitude (degrees) and distance
pub fn ecliptic_vector(longitude_deg: f64, latitude_deg: f64, distance: f64) -> Vector3<f64> {
    let (lon, lat) = (longitude_deg.to_radians(), latitude_deg.to_radians());
    Vector3::new(
        distance * lat.cos() * lon.cos(),
        distance * lat.cos() * lon.sin(),
        distance * lat.sin(),
    )
}

/// Azimuth/altitude of an equatorial position for an observer
pub fn equatorial_to_horizontal(
    position: &Equatorial,
    observer: &Observer,
    time: DateTime<Utc>,
) -> HorizontalPosition {
    let lst = local_sidereal_time(time, observer.longitude);
    let hour_angle = (lst - position.ra_deg).to_radians();
    let lat = observer.latitude.to_radians();
    let dec = position.dec_deg.to_radians();

    let sin_alt = lat.sin() * dec.sin() + lat.cos() * dec.cos() * hour_angle.cos();
    let altitude = sin_alt.clamp(-1.0, 1.0).asin();

    // Measured from north through east
    let azimuth = (-dec.cos() * hour_angle.sin())
        .atan2(dec.sin() * lat.cos() - dec.cos() * lat.sin() * hour_angle.cos());

    HorizontalPosition::new(azimuth.to_degrees(), altitude.to_degrees())
}
