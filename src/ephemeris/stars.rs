//! Fixed positions of a few bright, easily recognised stars (J2000)

use crate::ephemeris::coordinates::Equatorial;

/// A named star with its J2000 position and visual magnitude
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrightStar {
    pub name: &'static str,
    pub ra_deg: f64,
    pub dec_deg: f64,
    pub magnitude: f32,
}

impl BrightStar {
    pub fn equatorial(&self) -> Equatorial {
        Equatorial::new(self.ra_deg, self.dec_deg)
    }

    /// Case-insensitive lookup in [`BRIGHT_STARS`]
    pub fn find(name: &str) -> Option<&'static BrightStar> {
        let name = name.trim();
        BRIGHT_STARS.iter().find(|star| star.name.eq_ignore_ascii_case(name))
    }
}

const fn star(name: &'static str, ra_deg: f64, dec_deg: f64, magnitude: f32) -> BrightStar {
    BrightStar {
        name,
        ra_deg,
        dec_deg,
        magnitude,
    }
}

pub const BRIGHT_STARS: [BrightStar; 16] = [
    star("Sirius", 101.2872, -16.7161, -1.46),
    star("Canopus", 95.9880, -52.6957, -0.74),
    star("Arcturus", 213.9153, 19.1825, -0.05),
    star("Vega", 279.2347, 38.7837, 0.03),
    star("Capella", 79.1723, 45.9980, 0.08),
    star("Rigel", 78.6345, -8.2016, 0.13),
    star("Procyon", 114.8255, 5.2250, 0.34),
    star("Betelgeuse", 88.7929, 7.4071, 0.42),
    star("Altair", 297.6958, 8.8683, 0.76),
    star("Aldebaran", 68.9802, 16.5093, 0.86),
    star("Antares", 247.3519, -26.4320, 0.96),
    star("Spica", 201.2983, -11.1613, 0.97),
    star("Pollux", 116.3290, 28.0262, 1.14),
    star("Deneb", 310.3580, 45.2803, 1.25),
    star("Regulus", 152.0930, 11.9672, 1.35),
    star("Polaris", 37.9546, 89.2641, 1.98),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_star() {
        let vega = BrightStar::find("vega").unwrap();
        assert_eq!(vega.name, "Vega");
        assert!(BrightStar::find("Alpha Centauri B").is_none());
    }

    #[test]
    fn test_catalog_sorted_by_brightness_except_polaris() {
        // Polaris is kept for orientation even though it is fainter
        let magnitudes: Vec<f32> = BRIGHT_STARS.iter().map(|s| s.magnitude).collect();
        assert!(magnitudes.windows(2).all(|w| w[0] <= w[1]));
        assert!(BRIGHT_STARS.iter().all(|s| (-90.0..=90.0).contains(&s.dec_deg)));
    }
}
