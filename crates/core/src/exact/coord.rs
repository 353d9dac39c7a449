//! Exact planar coordinates: sums of `magnitude * trig(angle)` terms, the
//! shape every x/y built by the placement recursion actually takes. A
//! [`Coord`] stays opaque until [`Coord::eval`] collapses it to a
//! [`rug::Float`] at a chosen precision; nothing here rounds early.

use rug::Float;

use super::angle::ExactAngle;
use super::magnitude::Magnitude;

#[derive(Clone, Copy, Debug)]
pub enum Trig {
    Cos,
    Sin,
}

#[derive(Clone, Debug)]
struct Term {
    magnitude: Magnitude,
    trig: Trig,
    angle: ExactAngle,
}

#[derive(Clone, Debug, Default)]
pub struct Coord {
    terms: Vec<Term>,
}

impl Coord {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn term(magnitude: Magnitude, trig: Trig, angle: ExactAngle) -> Self {
        Coord {
            terms: vec![Term {
                magnitude,
                trig,
                angle,
            }],
        }
    }

    pub fn add(&self, other: &Self) -> Self {
        let mut terms = self.terms.clone();
        terms.extend(other.terms.iter().cloned());
        Coord { terms }
    }

    pub fn eval(&self, prec: u32) -> Float {
        let mut acc = Float::with_val(prec, 0);
        for t in &self.terms {
            let trig_val = match t.trig {
                Trig::Cos => t.angle.cos(prec),
                Trig::Sin => t.angle.sin(prec),
            };
            acc += t.magnitude.eval(prec) * trig_val;
        }
        acc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exact::magnitude::Atom;

    #[test]
    fn zero_coord_evaluates_to_zero() {
        let c = Coord::zero();
        assert!(c.eval(256).abs() < 1e-60);
    }

    #[test]
    fn single_term_matches_hand_computation() {
        let m = Magnitude::atom(Atom::Circumradius(5));
        let angle = ExactAngle::from_ratio(1, 4);
        let c = Coord::term(m.clone(), Trig::Cos, angle.clone());
        let expected = m.eval(256) * angle.cos(256);
        assert!((c.eval(256) - expected).abs() < 1e-60);
    }
}
