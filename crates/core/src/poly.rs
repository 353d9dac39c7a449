//! The polyhedron data model (`spec.md` §3): faces, edges, neighbours, and the
//! derived vertex incidence. Immutable once constructed and validated.

use std::collections::HashMap;

use petgraph::algo::connected_components;
use petgraph::graph::UnGraph;

use crate::error::{CoreError, Result};

pub type EdgeId = u64;

/// One face of the polyhedron: a regular `gon`-gon of unit side length.
#[derive(Clone, Debug)]
pub struct Face {
    pub face_id: usize,
    pub gon: usize,
    /// `edges_of[f]`: edge ids around the face, CCW as seen from outside.
    pub edges: Vec<EdgeId>,
    /// `neighbor_of[f]`: aligned one-to-one with `edges`.
    pub neighbors: Vec<usize>,
}

/// A convex regular-faced polyhedron plus its derived lookup tables.
#[derive(Clone, Debug)]
pub struct Polyhedron {
    pub name: String,
    pub class: String,
    pub faces: Vec<Face>,
    /// `edge_position[face][edge_id]` = index of `edge_id` within `faces[face].edges`.
    edge_position: Vec<HashMap<EdgeId, usize>>,
    /// Global vertex id for each (face, corner) pair, corner = junction of
    /// edge `k` and edge `(k+1) % gon`. Filled lazily by `vertex_incidence`.
    vertex_of_corner: Vec<Vec<usize>>,
    pub num_vertices: usize,
}

impl Polyhedron {
    /// Build and validate a polyhedron from its raw face list.
    pub fn new(name: String, class: String, faces: Vec<Face>) -> Result<Self> {
        validate_reciprocity(&faces)?;
        validate_connected(&faces)?;
        let edge_position = faces
            .iter()
            .map(|f| f.edges.iter().enumerate().map(|(k, &e)| (e, k)).collect())
            .collect();
        let mut poly = Polyhedron {
            name,
            class,
            faces,
            edge_position,
            vertex_of_corner: Vec::new(),
            num_vertices: 0,
        };
        poly.build_vertex_incidence();
        Ok(poly)
    }

    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    #[inline]
    pub fn gon(&self, face: usize) -> usize {
        self.faces[face].gon
    }

    #[inline]
    pub fn neighbor(&self, face: usize, k: usize) -> usize {
        self.faces[face].neighbors[k]
    }

    #[inline]
    pub fn edge_at(&self, face: usize, k: usize) -> EdgeId {
        self.faces[face].edges[k]
    }

    /// Index of `edge` within `faces[face].edges`.
    pub fn edge_position(&self, face: usize, edge: EdgeId) -> Result<usize> {
        self.edge_position[face].get(&edge).copied().ok_or_else(|| {
            CoreError::BoundsReference(format!(
                "edge {edge} is not incident to face {face}"
            ))
        })
    }

    /// The other face across a given edge of `face`.
    pub fn neighbor_across(&self, face: usize, edge: EdgeId) -> Result<usize> {
        let k = self.edge_position(face, edge)?;
        Ok(self.neighbor(face, k))
    }

    /// Global vertex id of the corner between edge `k` and edge `(k+1) % gon` of `face`.
    #[inline]
    pub fn vertex_at_corner(&self, face: usize, k: usize) -> usize {
        self.vertex_of_corner[face][k]
    }

    /// Whether two faces share a polyhedron edge.
    pub fn share_edge(&self, a: usize, b: usize) -> bool {
        self.faces[a].neighbors.iter().any(|&n| n == b)
    }

    /// Whether two faces share a vertex (via the union-find incidence), including
    /// the case where they share an edge (which shares two vertices).
    pub fn share_vertex(&self, a: usize, b: usize) -> bool {
        let gon_a = self.gon(a);
        let gon_b = self.gon(b);
        for ka in 0..gon_a {
            let va = self.vertex_at_corner(a, ka);
            for kb in 0..gon_b {
                if self.vertex_at_corner(b, kb) == va {
                    return true;
                }
            }
        }
        false
    }

    fn build_vertex_incidence(&mut self) {
        let corner_index: Vec<usize> = {
            let mut offsets = Vec::with_capacity(self.faces.len() + 1);
            let mut acc = 0usize;
            offsets.push(0);
            for f in &self.faces {
                acc += f.gon;
                offsets.push(acc);
            }
            offsets
        };
        let total_corners = *corner_index.last().unwrap();
        let mut uf = UnionFind::new(total_corners);
        let corner_id = |face: usize, k: usize| -> usize {
            let gon = self.faces[face].gon;
            corner_index[face] + (k % gon)
        };
        for (f, face) in self.faces.iter().enumerate() {
            let gon_f = face.gon;
            for k in 0..gon_f {
                let e = face.edges[k];
                let g = face.neighbors[k];
                let m = self.edge_position[g][&e];
                let gon_g = self.faces[g].gon;
                // Edge k of f runs from corner(f,k-1) to corner(f,k); shared with g
                // in reversed orientation: corner(f,k) <-> corner(g,m-1), corner(f,k-1) <-> corner(g,m).
                uf.union(corner_id(f, k), corner_id(g, (m + gon_g - 1) % gon_g));
                uf.union(
                    corner_id(f, (k + gon_f - 1) % gon_f),
                    corner_id(g, m),
                );
            }
        }
        let mut labels: HashMap<usize, usize> = HashMap::new();
        let mut vertex_of_corner = Vec::with_capacity(self.faces.len());
        for (f, face) in self.faces.iter().enumerate() {
            let mut row = Vec::with_capacity(face.gon);
            for k in 0..face.gon {
                let root = uf.find(corner_id(f, k));
                let next_id = labels.len();
                let id = *labels.entry(root).or_insert(next_id);
                row.push(id);
            }
            vertex_of_corner.push(row);
        }
        self.num_vertices = labels.len();
        self.vertex_of_corner = vertex_of_corner;
    }
}

fn validate_reciprocity(faces: &[Face]) -> Result<()> {
    if faces.is_empty() {
        return Err(CoreError::StructuralInput("polyhedron has no faces".into()));
    }
    let mut edge_owner: HashMap<EdgeId, Vec<(usize, usize)>> = HashMap::new();
    for (f, face) in faces.iter().enumerate() {
        if face.gon < 3 {
            return Err(CoreError::StructuralInput(format!(
                "face {f} has gon {} < 3",
                face.gon
            )));
        }
        if face.edges.len() != face.gon || face.neighbors.len() != face.gon {
            return Err(CoreError::StructuralInput(format!(
                "face {f} edges/neighbors length mismatch with gon {}",
                face.gon
            )));
        }
        for (k, &e) in face.edges.iter().enumerate() {
            edge_owner.entry(e).or_default().push((f, k));
        }
    }
    for (e, owners) in &edge_owner {
        if owners.len() != 2 {
            return Err(CoreError::StructuralInput(format!(
                "edge {e} is incident to {} faces, expected 2",
                owners.len()
            )));
        }
    }
    for (f, face) in faces.iter().enumerate() {
        for (k, (&e, &g)) in face.edges.iter().zip(face.neighbors.iter()).enumerate() {
            if g >= faces.len() {
                return Err(CoreError::StructuralInput(format!(
                    "face {f} edge {k} references unknown neighbor face {g}"
                )));
            }
            let pos_in_g = faces[g].edges.iter().position(|&ge| ge == e).ok_or_else(|| {
                CoreError::StructuralInput(format!(
                    "edge {e} of face {f} is missing from neighbor face {g}"
                ))
            })?;
            if faces[g].neighbors[pos_in_g] != f {
                return Err(CoreError::StructuralInput(format!(
                    "adjacency not reciprocal between face {f} and face {g} over edge {e}"
                )));
            }
        }
    }
    Ok(())
}

/// A polyhedron's face-adjacency graph must be a single connected component
/// (a closed surface cannot have an isolated island of faces).
fn validate_connected(faces: &[Face]) -> Result<()> {
    let mut g = UnGraph::<usize, ()>::new_undirected();
    let nodes: Vec<_> = (0..faces.len()).map(|f| g.add_node(f)).collect();
    let mut added: HashMap<(usize, usize), ()> = HashMap::new();
    for (f, face) in faces.iter().enumerate() {
        for &n in &face.neighbors {
            let key = (f.min(n), f.max(n));
            if added.insert(key, ()).is_none() {
                g.add_edge(nodes[f], nodes[n], ());
            }
        }
    }
    if connected_components(&g) != 1 {
        return Err(CoreError::StructuralInput(
            "face-adjacency graph is not connected".into(),
        ));
    }
    Ok(())
}

/// Plain union-find over integer indices, used once at load time to derive
/// global vertex ids from face-corner identifications.
struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
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
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }
}

/// A (base_face, base_edge) seed for one E1 search.
#[derive(Clone, Copy, Debug)]
pub struct RootPair {
    pub base_face: usize,
    pub base_edge: EdgeId,
}

#[cfg(test)]
pub(crate) mod test_fixtures {
    use super::*;

    /// A regular tetrahedron: 4 triangular faces, 6 edges, CCW-from-outside
    /// vertex order `[(1,2,3), (0,3,2), (0,1,3), (0,2,1)]`.
    pub fn tetrahedron() -> Polyhedron {
        let faces = vec![
            Face {
                face_id: 0,
                gon: 3,
                edges: vec![0, 1, 2],
                neighbors: vec![3, 1, 2],
            },
            Face {
                face_id: 1,
                gon: 3,
                edges: vec![3, 1, 4],
                neighbors: vec![2, 0, 3],
            },
            Face {
                face_id: 2,
                gon: 3,
                edges: vec![5, 2, 3],
                neighbors: vec![3, 0, 1],
            },
            Face {
                face_id: 3,
                gon: 3,
                edges: vec![4, 0, 5],
                neighbors: vec![1, 0, 2],
            },
        ];
        Polyhedron::new("tetrahedron".into(), "platonic".into(), faces).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::test_fixtures::tetrahedron;

    #[test]
    fn tetrahedron_validates() {
        let p = tetrahedron();
        assert_eq!(p.num_faces(), 4);
        assert_eq!(p.num_vertices, 4);
    }

    #[test]
    fn every_vertex_has_degree_at_least_three() {
        let p = tetrahedron();
        let mut degree = vec![0usize; p.num_vertices];
        for f in 0..p.num_faces() {
            for k in 0..p.gon(f) {
                degree[p.vertex_at_corner(f, k)] += 1;
            }
        }
        assert!(degree.iter().all(|&d| d >= 3));
        let sum: usize = degree.iter().sum();
        let expected: usize = (0..p.num_faces()).map(|f| p.gon(f)).sum();
        assert_eq!(sum, expected);
    }

    #[test]
    fn shared_edge_implies_shared_vertex() {
        let p = tetrahedron();
        assert!(p.share_edge(0, 1));
        assert!(p.share_vertex(0, 1));
    }
}
