//! E3's exact-arithmetic engine (`spec.md` §4.3, `SPEC_FULL.md` §5): exact
//! coordinate reconstruction, an exact parallel/collinear test over rational
//! angle fractions, and an adaptive-precision evaluator for the remaining
//! transcendental comparisons.

mod angle;
mod coord;
pub mod geometry;
pub mod intersect;
mod magnitude;
mod precision;

pub use geometry::{build_placements, face_edges, ExactEdge, ExactPlacement};
pub use intersect::classify_face_pair;
pub use precision::{INITIAL_PREC_BITS, MAX_PREC_BITS};
