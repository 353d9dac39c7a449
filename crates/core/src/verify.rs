//! E3: the exact-arithmetic verifier (`spec.md` §4.3). Reconstructs exact
//! geometry for the base and last face of each record, applies the
//! chain-skipping rules of §4.3.3, and emits only records with a genuine
//! overlap, tagged with the strongest classification found.

use crate::error::Result;
use crate::exact::{build_placements, classify_face_pair, face_edges};
use crate::poly::Polyhedron;
use crate::record::{ExactOverlap, PartialUnfolding};

/// Decide one record. Returns `Ok(None)` if the pair is skipped or does not
/// overlap; `Ok(Some(record))` with `exact_overlap` populated otherwise.
pub fn verify_record(poly: &Polyhedron, record: PartialUnfolding) -> Result<Option<PartialUnfolding>> {
    let base_face = record.base_pair.base_face;
    let last_face = record.faces.last().unwrap().face_id;

    if poly.share_edge(base_face, last_face) {
        return Ok(None);
    }
    if poly.share_vertex(base_face, last_face) {
        return Ok(None);
    }

    let placements = build_placements(poly, &record)?;
    let base_placement = &placements[0];
    let last_placement = placements.last().unwrap();

    let base_edges = face_edges(poly, base_placement);
    let last_edges = face_edges(poly, last_placement);

    match classify_face_pair(&base_edges, &last_edges)? {
        None => Ok(None),
        Some(kind) => {
            let mut record = record;
            record.exact_overlap = Some(ExactOverlap { kind });
            Ok(Some(record))
        }
    }
}

/// Run E3 over a record stream, calling `on_record` for each retained,
/// classified record in input order. Returns the number retained.
pub fn run_verifier(
    poly: &Polyhedron,
    records: impl IntoIterator<Item = PartialUnfolding>,
    mut on_record: impl FnMut(PartialUnfolding) -> Result<()>,
) -> Result<usize> {
    let mut kept = 0usize;
    for record in records {
        if let Some(verified) = verify_record(poly, record)? {
            on_record(verified)?;
            kept += 1;
        }
    }
    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poly::test_fixtures::tetrahedron;
    use crate::record::{BasePair, UnfoldedFace};

    fn face(id: usize, gon: usize, edge: u64) -> UnfoldedFace {
        UnfoldedFace {
            face_id: id,
            gon,
            edge_id: edge,
            x: 0.0,
            y: 0.0,
            angle_deg: 0.0,
        }
    }

    #[test]
    fn trivial_two_face_unfolding_is_skipped_as_neighbours() {
        let poly = tetrahedron();
        let record = PartialUnfolding::new(
            BasePair {
                base_face: 0,
                base_edge: 0,
            },
            false,
            vec![face(0, 3, 0), face(3, 3, 0)],
        );
        assert!(verify_record(&poly, record).unwrap().is_none());
    }

    #[test]
    fn every_pair_of_tetrahedron_faces_shares_an_edge_or_a_vertex() {
        // The tetrahedron is too small to exhibit a genuine overlap: every
        // pair of its four faces is either adjacent or vertex-sharing, so
        // every record is skipped by chain-skipping alone.
        let poly = tetrahedron();
        for a in 0..poly.num_faces() {
            for b in 0..poly.num_faces() {
                if a == b {
                    continue;
                }
                assert!(poly.share_edge(a, b) || poly.share_vertex(a, b));
            }
        }
    }
}
