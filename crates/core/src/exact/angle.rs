//! Exact direction angles (`SPEC_FULL.md` §5): every direction that appears
//! in this system's reconstructed geometry is a rational multiple of pi, even
//! though the point positions built from it are transcendental. Keeping
//! angles as exact fractions lets parallel/collinear decisions be made with
//! no numeric evaluation at all.

use rug::{Float, Rational};

/// An angle of `frac * pi` radians, held as an exact fraction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExactAngle {
    frac: Rational,
}

impl ExactAngle {
    pub fn zero() -> Self {
        ExactAngle {
            frac: Rational::from(0),
        }
    }

    /// `(num, den) * pi` radians.
    pub fn from_ratio(num: i64, den: i64) -> Self {
        ExactAngle {
            frac: Rational::from((num, den)),
        }
    }

    pub fn add(&self, other: &Self) -> Self {
        ExactAngle {
            frac: (&self.frac + &other.frac).into(),
        }
    }

    pub fn sub(&self, other: &Self) -> Self {
        ExactAngle {
            frac: (&self.frac - &other.frac).into(),
        }
    }

    /// Whether `self` and `other` describe the same infinite line through the
    /// origin, i.e. differ by an exact integer multiple of pi.
    pub fn same_line(&self, other: &Self) -> bool {
        let diff = self.sub(other);
        diff.frac.denom() == &rug::Integer::from(1)
    }

    pub fn to_radians(&self, prec: u32) -> Float {
        let pi = Float::with_val(prec, rug::float::Constant::Pi);
        Float::with_val(prec, &self.frac) * pi
    }

    pub fn cos(&self, prec: u32) -> Float {
        self.to_radians(prec).cos()
    }

    pub fn sin(&self, prec: u32) -> Float {
        self.to_radians(prec).sin()
    }
}
