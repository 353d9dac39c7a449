//! Canonical signatures (`spec.md` §4.2): a record is reduced to the
//! lexicographically smaller of its forward and reverse tagged sequences,
//! each prefixed by a base-pair orbit label and built from precomputed edge
//! orbits — themselves derived from the automorphism group.

use std::collections::HashMap;

use crate::poly::{EdgeId, Polyhedron};
use crate::record::PartialUnfolding;

use super::automorphism::{compute_automorphisms, Automorphism};

/// Edge orbits and base-pair orbits under the polyhedron's orientation-preserving
/// combinatorial automorphism group, precomputed once per polyhedron.
pub struct SymmetryData {
    edge_orbit: HashMap<EdgeId, usize>,
    base_pair_orbit: HashMap<(usize, EdgeId), usize>,
}

impl SymmetryData {
    pub fn compute(poly: &Polyhedron) -> Self {
        let autos = compute_automorphisms(poly);
        let edge_orbit = edge_orbits(poly, &autos);
        let base_pair_orbit = base_pair_orbits(poly, &autos, &edge_orbit);
        Self {
            edge_orbit,
            base_pair_orbit,
        }
    }

    fn edge_label(&self, e: EdgeId) -> usize {
        self.edge_orbit[&e]
    }

    fn base_pair_label(&self, face: usize, edge: EdgeId) -> usize {
        self.base_pair_orbit[&(face, edge)]
    }
}

fn edge_orbits(poly: &Polyhedron, autos: &[Automorphism]) -> HashMap<EdgeId, usize> {
    let all_edges: Vec<EdgeId> = {
        let mut v: Vec<EdgeId> = poly
            .faces
            .iter()
            .flat_map(|f| f.edges.iter().copied())
            .collect();
        v.sort_unstable();
        v.dedup();
        v
    };
    let index: HashMap<EdgeId, usize> = all_edges.iter().enumerate().map(|(i, &e)| (e, i)).collect();
    let mut uf = UnionFind::new(all_edges.len());
    for a in autos {
        for (&e, &e2) in &a.edge_map {
            uf.union(index[&e], index[&e2]);
        }
    }
    let mut labels = HashMap::new();
    let mut next_label: HashMap<usize, usize> = HashMap::new();
    for &e in &all_edges {
        let root = uf.find(index[&e]);
        let n = next_label.len();
        let label = *next_label.entry(root).or_insert(n);
        labels.insert(e, label);
    }
    labels
}

fn base_pair_orbits(
    poly: &Polyhedron,
    autos: &[Automorphism],
    edge_orbit: &HashMap<EdgeId, usize>,
) -> HashMap<(usize, EdgeId), usize> {
    let _ = edge_orbit;
    let all_pairs: Vec<(usize, EdgeId)> = poly
        .faces
        .iter()
        .flat_map(|f| f.edges.iter().map(move |&e| (f.face_id, e)))
        .collect();
    let index: HashMap<(usize, EdgeId), usize> = all_pairs
        .iter()
        .enumerate()
        .map(|(i, &p)| (p, i))
        .collect();
    let mut uf = UnionFind::new(all_pairs.len());
    for a in autos {
        for &(f, e) in &all_pairs {
            let f2 = a.face_map[f];
            let e2 = a.edge_map[&e];
            uf.union(index[&(f, e)], index[&(f2, e2)]);
        }
    }
    let mut labels = HashMap::new();
    let mut next_label: HashMap<usize, usize> = HashMap::new();
    for &p in &all_pairs {
        let root = uf.find(index[&p]);
        let n = next_label.len();
        let label = *next_label.entry(root).or_insert(n);
        labels.insert(p, label);
    }
    labels
}

struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }
    fn find(&mut self, x: usize) -> usize {
        if self.parent[x] != x {
            self.parent[x] = self.find(self.parent[x]);
        }
        self.parent[x]
    }
    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            self.parent[ra] = rb;
        }
    }
}

/// One tagged sequence entry: a face's gon, and the orbit label of the edge
/// crossed to reach it (`None` for the path's first face).
type Tag = (usize, Option<usize>);

/// `(base-pair orbit label, tagged sequence)`, comparable lexicographically.
pub type CanonicalKey = (usize, Vec<Tag>);

fn forward_key(sym: &SymmetryData, record: &PartialUnfolding) -> CanonicalKey {
    let base_label = sym.base_pair_label(record.base_pair.base_face, record.base_pair.base_edge);
    let tags = record
        .faces
        .iter()
        .enumerate()
        .map(|(i, f)| {
            if i == 0 {
                (f.gon, None)
            } else {
                (f.gon, Some(sym.edge_label(f.edge_id)))
            }
        })
        .collect();
    (base_label, tags)
}

fn reverse_key(sym: &SymmetryData, record: &PartialUnfolding) -> CanonicalKey {
    let faces = &record.faces;
    let last = faces.last().unwrap();
    // The reversed path's "base edge" is the edge crossed to reach the
    // original last face.
    let base_label = sym.base_pair_label(last.face_id, last.edge_id);
    let n = faces.len();
    let tags = (0..n)
        .map(|i| {
            let f = &faces[n - 1 - i];
            if i == 0 {
                (f.gon, None)
            } else {
                // crossing edge between position i-1 and i in reverse order is
                // the edge_id recorded on the face one step closer to the
                // original start, i.e. faces[n-i].
                (f.gon, Some(sym.edge_label(faces[n - i].edge_id)))
            }
        })
        .collect();
    (base_label, tags)
}

/// The lexicographically smaller of the forward/reverse tagged signatures.
pub fn canonical_key(sym: &SymmetryData, record: &PartialUnfolding) -> CanonicalKey {
    let fwd = forward_key(sym, record);
    let rev = reverse_key(sym, record);
    fwd.min(rev)
}
