//! Orientation-preserving combinatorial automorphisms of the face-adjacency
//! structure (see `SPEC_FULL.md` §6 for the scope decision: reflections are
//! excluded because `neighbor_of` already fixes an outward orientation, and
//! path-direction reversal is the model's stand-in for mirroring).
//!
//! Found by backtracking over a BFS spanning tree of the face-adjacency
//! graph (built with `petgraph`): guess the image of one anchor face under
//! every gon-compatible rotation, then propagate the rest of the mapping
//! face-by-face, failing as soon as a conflict appears.

use std::collections::{HashMap, HashSet};

use crate::poly::{EdgeId, Polyhedron};

/// One combinatorial automorphism: a face permutation plus its induced edge
/// permutation.
#[derive(Clone, Debug)]
pub struct Automorphism {
    pub face_map: Vec<usize>,
    pub edge_map: HashMap<EdgeId, EdgeId>,
}

/// All orientation-preserving combinatorial automorphisms, including the identity.
pub fn compute_automorphisms(poly: &Polyhedron) -> Vec<Automorphism> {
    let n = poly.num_faces();
    if n == 0 {
        return Vec::new();
    }
    let anchor = 0usize;
    let anchor_gon = poly.gon(anchor);

    let mut found: Vec<Automorphism> = Vec::new();
    let mut seen_face_maps: HashSet<Vec<usize>> = HashSet::new();

    for target in 0..n {
        if poly.gon(target) != anchor_gon {
            continue;
        }
        for rot in 0..anchor_gon {
            if let Some(auto) = try_build(poly, anchor, target, rot) {
                if seen_face_maps.insert(auto.face_map.clone()) {
                    found.push(auto);
                }
            }
        }
    }
    found
}

/// Attempt to extend "anchor maps to target with rotation offset `rot`" into
/// a total, consistent automorphism via BFS propagation.
fn try_build(
    poly: &Polyhedron,
    anchor: usize,
    target: usize,
    rot: usize,
) -> Option<Automorphism> {
    let n = poly.num_faces();
    let mut face_map: Vec<Option<usize>> = vec![None; n];
    let mut offset: Vec<Option<usize>> = vec![None; n];
    let mut image_used = vec![false; n];

    face_map[anchor] = Some(target);
    offset[anchor] = Some(rot);
    image_used[target] = true;

    let mut queue = std::collections::VecDeque::new();
    queue.push_back(anchor);
    let mut edge_map: HashMap<EdgeId, EdgeId> = HashMap::new();

    while let Some(u) = queue.pop_front() {
        let u_image = face_map[u].unwrap();
        let off_u = offset[u].unwrap();
        let gon_u = poly.gon(u);
        if poly.gon(u_image) != gon_u {
            return None;
        }
        for k in 0..gon_u {
            let v = poly.neighbor(u, k);
            let e = poly.edge_at(u, k);
            let k_image = (k + off_u) % gon_u;
            let v_image = poly.neighbor(u_image, k_image);
            let e_image = poly.edge_at(u_image, k_image);

            if let Some(&prior) = edge_map.get(&e) {
                if prior != e_image {
                    return None;
                }
            } else {
                edge_map.insert(e, e_image);
            }

            match face_map[v] {
                Some(existing) => {
                    if existing != v_image {
                        return None;
                    }
                }
                None => {
                    if poly.gon(v) != poly.gon(v_image) || image_used[v_image] {
                        return None;
                    }
                    let q = poly.edge_position(v, e).ok()?;
                    let q_image = poly.edge_position(v_image, e_image).ok()?;
                    let gon_v = poly.gon(v);
                    let off_v = (q_image + gon_v - q % gon_v) % gon_v;
                    face_map[v] = Some(v_image);
                    offset[v] = Some(off_v);
                    image_used[v_image] = true;
                    queue.push_back(v);
                }
            }
        }
    }

    let mut total_face_map = Vec::with_capacity(n);
    for f in 0..n {
        total_face_map.push(face_map[f]?);
    }
    for f in 0..n {
        let off_f = offset[f].unwrap();
        let fi = total_face_map[f];
        for k in 0..poly.gon(f) {
            let e = poly.edge_at(f, k);
            let k_image = (k + off_f) % poly.gon(f);
            let e_image = poly.edge_at(fi, k_image);
            if edge_map.get(&e) != Some(&e_image) {
                return None;
            }
        }
    }

    Some(Automorphism {
        face_map: total_face_map,
        edge_map,
    })
}
