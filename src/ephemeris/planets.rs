//! Heliocentric planet positions from mean Keplerian elements
//!
//! Elements are the J2000 mean elements with linear rates per Julian
//! century, fitted for 1800-2050. Accuracy is a few arcminutes for the
//! inner planets, which is plenty for an overlay marker.

use nalgebra::{Rotation3, Vector3};

use crate::core::wrap_delta;
use crate::ephemeris::SolarSystemBody;

/// Mean orbital elements at J2000 plus their rates per century
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalElements {
    /// Semi-major axis (AU)
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    /// Inclination to the ecliptic (degrees)
    pub inclination: f64,
    /// Mean longitude (degrees)
    pub mean_longitude: f64,
    /// Longitude of perihelion (degrees)
    pub perihelion_longitude: f64,
    /// Longitude of the ascending node (degrees)
    pub node_longitude: f64,
}

/// Element set with secular rates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SecularElements {
    pub epoch: OrbitalElements,
    pub rate_per_century: OrbitalElements,
}

const fn elements(a: f64, e: f64, i: f64, l: f64, peri: f64, node: f64) -> OrbitalElements {
    OrbitalElements {
        semi_major_axis: a,
        eccentricity: e,
        inclination: i,
        mean_longitude: l,
        perihelion_longitude: peri,
        node_longitude: node,
    }
}

pub const MERCURY: SecularElements = SecularElements {
    epoch: elements(0.38709927, 0.20563593, 7.00497902, 252.25032350, 77.45779628, 48.33076593),
    rate_per_century: elements(0.00000037, 0.00001906, -0.00594749, 149472.67411175, 0.16047689, -0.12534081),
};

pub const VENUS: SecularElements = SecularElements {
    epoch: elements(0.72333566, 0.00677672, 3.39467605, 181.97909950, 131.60246718, 76.67984255),
    rate_per_century: elements(0.00000390, -0.00004107, -0.00078890, 58517.81538729, 0.00268329, -0.27769418),
};

/// Earth-Moon barycenter
pub const EARTH: SecularElements = SecularElements {
    epoch: elements(1.00000261, 0.01671123, -0.00001531, 100.46457166, 102.93768193, 0.0),
    rate_per_century: elements(0.00000562, -0.00004392, -0.01294668, 35999.37244981, 0.32327364, 0.0),
};

pub const MARS: SecularElements = SecularElements {
    epoch: elements(1.52371034, 0.09339410, 1.84969142, -4.55343205, -23.94362959, 49.55953891),
    rate_per_century: elements(0.00001847, 0.00007882, -0.00813131, 19140.30268499, 0.44441088, -0.29257343),
};

pub const JUPITER: SecularElements = SecularElements {
    epoch: elements(5.20288700, 0.04838624, 1.30439695, 34.39644051, 14.72847983, 100.47390909),
    rate_per_century: elements(-0.00011607, -0.00013253, -0.00183714, 3034.74612775, 0.21252668, 0.20469106),
};

pub const SATURN: SecularElements = SecularElements {
    epoch: elements(9.53667594, 0.05386179, 2.48599187, 49.95424423, 92.59887831, 113.66242448),
    rate_per_century: elements(-0.00125060, -0.00050991, 0.00193609, 1222.49362201, -0.41897216, -0.28867794),
};

pub const URANUS: SecularElements = SecularElements {
    epoch: elements(19.18916464, 0.04725744, 0.77263783, 313.23810451, 170.95427630, 74.01692503),
    rate_per_century: elements(-0.00196176, -0.00004397, -0.00242939, 428.48202785, 0.40805281, 0.04240589),
};

pub const NEPTUNE: SecularElements = SecularElements {
    epoch: elements(30.06992276, 0.00859048, 1.77004347, -55.12002969, 44.96476227, 131.78422574),
    rate_per_century: elements(0.00026291, 0.00005105, 0.00035372, 218.45945325, -0.32241464, -0.00508664),
};

const KEPLER_TOLERANCE: f64 = 1e-12;
const KEPLER_MAX_ITERATIONS: usize = 30;

impl SecularElements {
    /// Elements for a planet; `None` for the Sun and Moon
    pub fn for_body(body: SolarSystemBody) -> Option<Self> {
        match body {
            SolarSystemBody::Mercury => Some(MERCURY),
            SolarSystemBody::Venus => Some(VENUS),
            SolarSystemBody::Mars => Some(MARS),
            SolarSystemBody::Jupiter => Some(JUPITER),
            SolarSystemBody::Saturn => Some(SATURN),
            SolarSystemBody::Uranus => Some(URANUS),
            SolarSystemBody::Neptune => Some(NEPTUNE),
            SolarSystemBody::Sun | SolarSystemBody::Moon => None,
        }
    }

    /// Osculating-mean elements at `centuries` past J2000
    pub fn at(&self, centuries: f64) -> OrbitalElements {
        let e = &self.epoch;
        let r = &self.rate_per_century;
        OrbitalElements {
            semi_major_axis: e.semi_major_axis + r.semi_major_axis * centuries,
            eccentricity: e.eccentricity + r.eccentricity * centuries,
            inclination: e.inclination + r.inclination * centuries,
            mean_longitude: e.mean_longitude + r.mean_longitude * centuries,
            perihelion_longitude: e.perihelion_longitude + r.perihelion_longitude * centuries,
            node_longitude: e.node_longitude + r.node_longitude * centuries,
        }
    }

    /// Heliocentric ecliptic position (AU) at `centuries` past J2000
    pub fn heliocentric_position(&self, centuries: f64) -> Vector3<f64> {
        self.at(centuries).heliocentric_position()
    }
}

impl OrbitalElements {
    /// Heliocentric ecliptic position (AU)
    pub fn heliocentric_position(&self) -> Vector3<f64> {
        let e = self.eccentricity;
        let argument_of_perihelion = (self.perihelion_longitude - self.node_longitude).to_radians();
        let mean_anomaly = wrap_delta(self.mean_longitude - self.perihelion_longitude).to_radians();
        let eccentric_anomaly = solve_kepler(mean_anomaly, e);

        // Position in the orbital plane, x toward perihelion
        let in_plane = Vector3::new(
            self.semi_major_axis * (eccentric_anomaly.cos() - e),
            self.semi_major_axis * (1.0 - e * e).sqrt() * eccentric_anomaly.sin(),
            0.0,
        );

        let orientation = Rotation3::from_axis_angle(&Vector3::z_axis(), self.node_longitude.to_radians())
            * Rotation3::from_axis_angle(&Vector3::x_axis(), self.inclination.to_radians())
            * Rotation3::from_axis_angle(&Vector3::z_axis(), argument_of_perihelion);

        orientation * in_plane
    }
}

/// Solve `E - e sin E = M` for the eccentric anomaly (radians)
pub fn solve_kepler(mean_anomaly: f64, eccentricity: f64) -> f64 {
    let mut eccentric = mean_anomaly + eccentricity * mean_anomaly.sin();
    for _ in 0..KEPLER_MAX_ITERATIONS {
        let step = (eccentric - eccentricity * eccentric.sin() - mean_anomaly)
            / (1.0 - eccentricity * eccentric.cos());
        eccentric -= step;
        if step.abs() < KEPLER_TOLERANCE {
            break;
        }
    }
    eccentric
}

/// Geocentric ecliptic position (AU) of a planet or the Sun
pub fn geocentric_position(body: SolarSystemBody, centuries: f64) -> Option<Vector3<f64>> {
    let earth = EARTH.heliocentric_position(centuries);
    match body {
        SolarSystemBody::Sun => Some(-earth),
        SolarSystemBody::Moon => None,
        planet => SecularElements::for_body(planet).map(|el| el.heliocentric_position(centuries) - earth),
    }
}
