//! E2: canonical-form deduplication (`spec.md` §4.2).
//!
//! Each incoming record is reduced to a canonical key (see [`canonical`]) and
//! kept only the first time that key is seen, preserving arrival order among
//! survivors.

mod automorphism;
mod canonical;

use std::collections::HashSet;

use crate::error::Result;
use crate::poly::Polyhedron;
use crate::record::PartialUnfolding;

pub use canonical::{canonical_key, CanonicalKey, SymmetryData};

/// Streaming dedup filter: feed records one at a time via `accept`, which
/// returns `true` exactly once per distinct canonical class.
pub struct Deduplicator {
    sym: SymmetryData,
    seen: HashSet<CanonicalKey>,
}

impl Deduplicator {
    pub fn new(poly: &Polyhedron) -> Self {
        Self {
            sym: SymmetryData::compute(poly),
            seen: HashSet::new(),
        }
    }

    /// Returns `true` if `record` is the first representative of its
    /// canonical class seen so far (and should be kept).
    pub fn accept(&mut self, record: &PartialUnfolding) -> bool {
        let key = canonical_key(&self.sym, record);
        self.seen.insert(key)
    }
}

/// Run E2 over a full record stream, calling `on_record` for each surviving
/// representative in input order. Returns the number kept.
pub fn run_dedup(
    poly: &Polyhedron,
    records: impl IntoIterator<Item = PartialUnfolding>,
    mut on_record: impl FnMut(PartialUnfolding) -> Result<()>,
) -> Result<usize> {
    let mut dedup = Deduplicator::new(poly);
    let mut kept = 0usize;
    for record in records {
        if dedup.accept(&record) {
            on_record(record)?;
            kept += 1;
        }
    }
    Ok(kept)
}
