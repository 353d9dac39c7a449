//! Scalar geometry primitives shared by E1's float-based placement and E3's
//! exact reconstruction (which re-derives its own high-precision versions of
//! these from scratch; see `exact::magnitude`).

use std::f64::consts::PI;

/// Positive slack used only by E1's approximate emission gate (`spec.md` §3, §4.1).
/// Tunable as a performance/completeness dial; must stay positive and never
/// feeds into E3's exact decision.
pub const BUFFER: f64 = 1e-2;

/// Coordinates below this magnitude are treated as exactly zero during E1's
/// float placement, to suppress trig noise (`spec.md` §4.1).
pub const SNAP_EPS: f64 = 1e-10;

/// `1 / (2 tan(pi/n))` for a unit-edge regular n-gon.
#[inline]
pub fn inradius(n: usize) -> f64 {
    1.0 / (2.0 * (PI / n as f64).tan())
}

/// `1 / (2 sin(pi/n))` for a unit-edge regular n-gon.
#[inline]
pub fn circumradius(n: usize) -> f64 {
    1.0 / (2.0 * (PI / n as f64).sin())
}

/// Normalise an angle in degrees into `(-180, 180]`.
#[inline]
pub fn normalize_deg(mut deg: f64) -> f64 {
    deg %= 360.0;
    if deg <= -180.0 {
        deg += 360.0;
    } else if deg > 180.0 {
        deg -= 360.0;
    }
    deg
}

/// Snap a coordinate to zero if it is within `SNAP_EPS` of it.
#[inline]
pub fn snap(v: f64) -> f64 {
    if v.abs() < SNAP_EPS {
        0.0
    } else {
        v
    }
}

/// Round to 6 decimal places, half-away-from-zero (`spec.md` §3, §5).
#[inline]
pub fn round6(v: f64) -> f64 {
    let scaled = v * 1_000_000.0;
    let rounded = if scaled >= 0.0 {
        (scaled + 0.5).floor()
    } else {
        (scaled - 0.5).ceil()
    };
    rounded / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangle_identities() {
        assert!(inradius(3) > 0.0);
        assert!(circumradius(3) > 0.0);
        assert!(circumradius(3) > inradius(3));
    }

    #[test]
    fn normalize_wraps_into_range() {
        assert!((normalize_deg(180.0) - 180.0).abs() < 1e-9);
        assert!((normalize_deg(-180.0) - 180.0).abs() < 1e-9);
        assert!((normalize_deg(540.0) - 180.0).abs() < 1e-9);
        assert!((normalize_deg(-540.0) - 180.0).abs() < 1e-9);
        let a = normalize_deg(200.0);
        assert!((-180.0..=180.0).contains(&a));
    }

    #[test]
    fn round6_half_away_from_zero() {
        assert_eq!(round6(0.123_456_5), 0.123_457);
        assert_eq!(round6(-0.123_456_5), -0.123_457);
        assert_eq!(round6(1.0), 1.0);
    }

    proptest::proptest! {
        /// `normalize_deg` must always land in `(-180, 180]` (`spec.md` §8 round-trip laws).
        #[test]
        fn normalize_deg_always_in_range(deg in -1_000_000.0f64..1_000_000.0) {
            let n = normalize_deg(deg);
            proptest::prop_assert!(n > -180.0 && n <= 180.0);
        }

        /// `round6` never moves a value by more than half a unit in the last place.
        #[test]
        fn round6_stays_within_half_a_unit(v in -1_000.0f64..1_000.0) {
            let rounded = round6(v);
            proptest::prop_assert!((rounded - v).abs() <= 5e-7 + 1e-12);
        }
    }
}
