//! Exact magnitudes: rational-coefficient sums of the per-gon inradius and
//! circumradius atoms used throughout the placement recursion. The atoms
//! themselves are transcendental (`1/(2 tan(pi/n))`, `1/(2 sin(pi/n))`) and
//! are only ever evaluated to floating precision; their *coefficients* are
//! exact rationals, which is all the hop-length arithmetic actually needs.

use std::collections::HashMap;

use rug::{Float, Rational};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Atom {
    Inradius(usize),
    Circumradius(usize),
}

impl Atom {
    fn eval(self, prec: u32) -> Float {
        let pi = Float::with_val(prec, rug::float::Constant::Pi);
        match self {
            Atom::Inradius(n) => {
                let half_angle = pi / Float::with_val(prec, n);
                Float::with_val(prec, 1) / (Float::with_val(prec, 2) * half_angle.tan())
            }
            Atom::Circumradius(n) => {
                let half_angle = pi / Float::with_val(prec, n);
                Float::with_val(prec, 1) / (Float::with_val(prec, 2) * half_angle.sin())
            }
        }
    }
}

/// A rational-coefficient linear combination of atoms, plus a rational constant.
#[derive(Clone, Debug, Default)]
pub struct Magnitude {
    constant: Rational,
    terms: HashMap<Atom, Rational>,
}

impl Magnitude {
    pub fn atom(a: Atom) -> Self {
        let mut terms = HashMap::new();
        terms.insert(a, Rational::from(1));
        Magnitude {
            constant: Rational::from(0),
            terms,
        }
    }

    pub fn add(&self, other: &Self) -> Self {
        let mut terms = self.terms.clone();
        for (a, c) in &other.terms {
            terms
                .entry(*a)
                .and_modify(|e| *e += c)
                .or_insert_with(|| c.clone());
        }
        Magnitude {
            constant: (&self.constant + &other.constant).into(),
            terms,
        }
    }

    pub fn eval(&self, prec: u32) -> Float {
        let mut acc = Float::with_val(prec, &self.constant);
        for (a, c) in &self.terms {
            acc += Float::with_val(prec, c) * a.eval(prec);
        }
        acc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sum_of_two_inradii_matches_scalar_sum() {
        let m = Magnitude::atom(Atom::Inradius(3)).add(&Magnitude::atom(Atom::Inradius(4)));
        let combined = m.eval(256);
        let separate =
            Atom::Inradius(3).eval(256) + Atom::Inradius(4).eval(256);
        assert!((combined - separate).abs() < 1e-60);
    }
}
