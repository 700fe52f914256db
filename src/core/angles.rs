//! Angle folding helpers shared by the sensors and the projector

use crate::core::constants::FULL_TURN_DEG;

/// Fold an azimuth into `[0, 360)`.
pub fn normalize_azimuth(degrees: f64) -> f64 {
    let folded = degrees.rem_euclid(FULL_TURN_DEG);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if folded >= FULL_TURN_DEG {
        0.0
    } else {
        folded
    }
}

/// Smallest signed azimuth difference, folded into `(-180, 180]`.
///
/// Computes `((delta + 540) mod 360) - 180`. The formula lands on -180 for
/// deltas that are odd multiples of 180; those are reported as +180 so the
/// result stays in the half-open range.
pub fn wrap_delta(delta: f64) -> f64 {
    let wrapped = (delta + 540.0).rem_euclid(FULL_TURN_DEG) - 180.0;
    if wrapped <= -180.0 {
        180.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_delta_range() {
        for a in [-400.0, -180.0, -1.0, 0.0, 1.0, 180.0, 359.0, 720.0] {
            let d = wrap_delta(a);
            assert!(d > -180.0 && d <= 180.0, "delta {} folded to {}", a, d);
        }
    }

    #[test]
    fn test_wrap_delta_values() {
        assert!((wrap_delta(-400.0) - (-40.0)).abs() < 1e-12);
        assert!((wrap_delta(-1.0) - (-1.0)).abs() < 1e-12);
        assert!((wrap_delta(1.0) - 1.0).abs() < 1e-12);
        assert!((wrap_delta(359.0) - (-1.0)).abs() < 1e-12);
        assert_eq!(wrap_delta(720.0), 0.0);
        assert_eq!(wrap_delta(180.0), 180.0);
        assert_eq!(wrap_delta(-180.0), 180.0);
        // beyond the +540 offset
        assert!((wrap_delta(-600.0) - 120.0).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_azimuth() {
        assert_eq!(normalize_azimuth(0.0), 0.0);
        assert_eq!(normalize_azimuth(360.0), 0.0);
        assert!((normalize_azimuth(-90.0) - 270.0).abs() < 1e-12);
        assert!((normalize_azimuth(725.0) - 5.0).abs() < 1e-12);
        assert!(normalize_azimuth(-1e-17) < 360.0);
    }
}
