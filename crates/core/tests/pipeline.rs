//! End-to-end smoke tests driving all three stages together over a
//! polyhedron richer than the tetrahedron unit fixtures: a pentagonal pyramid
//! (`spec.md` §8 style scenarios 5 and 6), named `p05` so the `auto`
//! symmetry-mode naming convention resolves it as symmetric.

use rotunfold_core::prelude::*;
use rotunfold_core::geom::{circumradius, BUFFER};

/// A pentagonal pyramid: one pentagonal base plus five triangular sides
/// fanned around a common apex. `edges_of` follows the CCW-from-outside
/// convention of `spec.md` §3: base pentagon edges `e0..e4` run around the
/// base; apex edges `a0..a4` run from the apex to each base vertex.
fn pentagonal_pyramid() -> Polyhedron {
    const E: [EdgeId; 5] = [0, 1, 2, 3, 4];
    const A: [EdgeId; 5] = [10, 11, 12, 13, 14];

    let base = Face {
        face_id: 0,
        gon: 5,
        edges: E.to_vec(),
        neighbors: (0..5).map(|i| i + 1).collect(),
    };

    let mut faces = vec![base];
    for i in 0..5usize {
        let prev_triangle = (i + 4) % 5 + 1;
        let next_triangle = (i + 1) % 5 + 1;
        faces.push(Face {
            face_id: i + 1,
            gon: 3,
            edges: vec![A[i], E[i], A[(i + 1) % 5]],
            neighbors: vec![prev_triangle, 0, next_triangle],
        });
    }

    Polyhedron::new("p05".into(), "johnson".into(), faces).unwrap()
}

fn all_root_pairs(poly: &Polyhedron) -> Vec<RootPair> {
    let mut pairs = Vec::new();
    for f in 0..poly.num_faces() {
        for k in 0..poly.gon(f) {
            pairs.push(RootPair {
                base_face: f,
                base_edge: poly.edge_at(f, k),
            });
        }
    }
    pairs
}

#[test]
fn pentagonal_pyramid_validates() {
    let poly = pentagonal_pyramid();
    assert_eq!(poly.num_faces(), 6);
    assert_eq!(poly.num_vertices, 6);
}

#[test]
fn full_pipeline_preserves_record_order_end_to_end() {
    let poly = pentagonal_pyramid();
    let root_pairs = all_root_pairs(&poly);

    let mut raw = Vec::new();
    run_enumerator(&poly, &root_pairs, false, |rec| {
        raw.push(rec);
        Ok(())
    })
    .unwrap();
    assert!(!raw.is_empty(), "expect at least one emitted record");

    let mut deduped = Vec::new();
    run_dedup(&poly, raw.clone(), |rec| {
        deduped.push(rec);
        Ok(())
    })
    .unwrap();
    assert!(deduped.len() <= raw.len());

    let mut verified = Vec::new();
    run_verifier(&poly, deduped.clone(), |rec| {
        verified.push(rec);
        Ok(())
    })
    .unwrap();
    assert!(verified.len() <= deduped.len());

    // Every verified record's base pair must appear among the deduped input,
    // in the same relative order (E3 never reorders; `spec.md` §6).
    let mut cursor = 0usize;
    for v in &verified {
        let found = deduped[cursor..]
            .iter()
            .position(|d| d.base_pair == v.base_pair && d.faces.last().unwrap().face_id == v.faces.last().unwrap().face_id);
        let idx = found.expect("verified record must trace back to a deduped input record");
        cursor += idx + 1;
    }
}

#[test]
fn e1_distance_gate_soundness_holds_for_every_emitted_record() {
    let poly = pentagonal_pyramid();
    let root_pairs = all_root_pairs(&poly);

    let mut raw = Vec::new();
    run_enumerator(&poly, &root_pairs, false, |rec| {
        raw.push(rec);
        Ok(())
    })
    .unwrap();

    for rec in &raw {
        let base_gon = poly.gon(rec.base_pair.base_face);
        let r0 = circumradius(base_gon);
        let last = rec.faces.last().unwrap();
        let r_last = circumradius(last.gon);
        let rho = (last.x * last.x + last.y * last.y).sqrt();
        assert!(
            rho < r0 + r_last + BUFFER + 1e-9,
            "record last face centre at distance {rho} exceeds the gate r0={r0} r_last={r_last} buffer={BUFFER}"
        );
    }
}

#[test]
fn symmetric_run_emits_a_subset_of_the_asymmetric_run() {
    let poly = pentagonal_pyramid();
    let root_pairs = all_root_pairs(&poly);

    let mut off = Vec::new();
    run_enumerator(&poly, &root_pairs, false, |rec| {
        off.push(rec);
        Ok(())
    })
    .unwrap();

    let mut on = Vec::new();
    run_enumerator(&poly, &root_pairs, true, |rec| {
        on.push(rec);
        Ok(())
    })
    .unwrap();

    assert!(on.len() <= off.len());

    let off_keys: std::collections::HashSet<CanonicalKey> = {
        let sym = SymmetryData::compute(&poly);
        off.iter().map(|r| canonical_key(&sym, r)).collect()
    };
    let sym = SymmetryData::compute(&poly);
    for rec in &on {
        let key = canonical_key(&sym, rec);
        assert!(
            off_keys.contains(&key),
            "symmetric-on record has no asymmetric-run counterpart with the same canonical form"
        );
    }
}

#[test]
fn deduplication_is_idempotent() {
    let poly = pentagonal_pyramid();
    let root_pairs = all_root_pairs(&poly);

    let mut raw = Vec::new();
    run_enumerator(&poly, &root_pairs, false, |rec| {
        raw.push(rec);
        Ok(())
    })
    .unwrap();

    let mut once = Vec::new();
    run_dedup(&poly, raw, |rec| {
        once.push(rec);
        Ok(())
    })
    .unwrap();

    let mut twice = Vec::new();
    run_dedup(&poly, once.clone(), |rec| {
        twice.push(rec);
        Ok(())
    })
    .unwrap();

    assert_eq!(once.len(), twice.len());
}
