//! E1: pruned depth-first enumeration of path-shaped unfoldings (`spec.md` §4.1).
//!
//! A single-threaded streaming search: for each root pair, one recursive
//! traversal visits children in counter-clockwise order, emitting a record
//! for every prefix whose last face might overlap the base face, and
//! restoring its shared mutable scratch (face usage, remaining-capacity
//! budget, current path) on every backtrack.

mod search;

pub use search::run_root;

use crate::error::Result;
use crate::poly::{Polyhedron, RootPair};
use crate::record::PartialUnfolding;

/// Run E1 over every root pair, in input order, calling `on_record` for each
/// emitted record in deterministic traversal order.
pub fn run_enumerator(
    poly: &Polyhedron,
    root_pairs: &[RootPair],
    symmetric_used: bool,
    mut on_record: impl FnMut(PartialUnfolding) -> Result<()>,
) -> Result<usize> {
    let mut count = 0usize;
    for &root in root_pairs {
        count += run_root(poly, root, symmetric_used, &mut on_record)?;
    }
    Ok(count)
}
