//! Exact coordinate reconstruction (`spec.md` §4.3.1). E3 ignores the
//! floating-point coordinates carried by a record and rebuilds every face
//! position from the combinatorial path alone, mirroring the placement
//! recursion of [`crate::enumerator::search`] but in symbolic form.
//!
//! The orientation convention is independently derived here (see
//! `DESIGN.md`): E3 does not need to match E1's handedness bit-for-bit, only
//! to be internally consistent, since reflecting an entire embedding
//! preserves every pairwise edge intersection.

use super::angle::ExactAngle;
use super::coord::{Coord, Trig};
use super::magnitude::{Atom, Magnitude};
use crate::error::Result;
use crate::poly::{EdgeId, Polyhedron};
use crate::record::PartialUnfolding;

/// One exact-reconstructed face placement: its centre, gon, and the
/// orientation/position-index pair needed to compute vertex angles.
pub struct ExactPlacement {
    pub face_id: usize,
    pub gon: usize,
    pub center_x: Coord,
    pub center_y: Coord,
    /// Direction, from this face's centre, of the edge at position `entry_position`.
    pub theta: ExactAngle,
    /// Position (within the face's own edge list) of the edge used as the
    /// `theta` reference; for the base face, its `base_edge`.
    pub entry_position: usize,
}

/// A polygon vertex as an exact point.
#[derive(Clone)]
pub struct ExactPoint {
    pub x: Coord,
    pub y: Coord,
}

/// One polygon edge: its two endpoints, its own exact tangent direction, and
/// the polyhedron edge id it carries (used for chain-skipping upstream).
pub struct ExactEdge {
    pub p0: ExactPoint,
    pub p1: ExactPoint,
    pub direction: ExactAngle,
    pub edge_id: EdgeId,
}

/// Reconstruct the exact placement of every face along `record`'s path.
pub fn build_placements(poly: &Polyhedron, record: &PartialUnfolding) -> Result<Vec<ExactPlacement>> {
    let mut placements = Vec::with_capacity(record.faces.len());

    let base = &record.faces[0];
    let p0 = poly.edge_position(base.face_id, base.edge_id)?;
    let mut prev = ExactPlacement {
        face_id: base.face_id,
        gon: base.gon,
        center_x: Coord::zero(),
        center_y: Coord::zero(),
        theta: ExactAngle::zero(),
        entry_position: p0,
    };

    for cur in &record.faces[1..] {
        let edge_id = cur.edge_id;
        let out_idx = poly.edge_position(prev.face_id, edge_id)?;
        let k = (out_idx + prev.gon - prev.entry_position) % prev.gon;
        let step = ExactAngle::from_ratio(2 * k as i64, prev.gon as i64);
        let phi = prev.theta.add(&step);

        let hop = Magnitude::atom(Atom::Inradius(prev.gon)).add(&Magnitude::atom(Atom::Inradius(cur.gon)));
        let center_x = prev.center_x.add(&Coord::term(hop.clone(), Trig::Cos, phi.clone()));
        let center_y = prev.center_y.add(&Coord::term(hop, Trig::Sin, phi.clone()));
        let theta = phi.add(&ExactAngle::from_ratio(1, 1));
        let entry_position = poly.edge_position(cur.face_id, edge_id)?;

        placements.push(std::mem::replace(
            &mut prev,
            ExactPlacement {
                face_id: cur.face_id,
                gon: cur.gon,
                center_x,
                center_y,
                theta,
                entry_position,
            },
        ));
    }
    placements.push(prev);
    Ok(placements)
}

/// This face's vertex angles, relative to its own centre. Vertex `k` connects
/// to vertex `(k+1) % gon`, matching `spec.md`'s `C + rho*(cos, sin)` formula;
/// `alpha` is fixed so that the known `entry_position` edge points in
/// direction `theta` from the centre.
fn vertex_angle(placement: &ExactPlacement, k: usize) -> ExactAngle {
    let offset = 2 * (k as i64 - placement.entry_position as i64) - 1;
    placement
        .theta
        .add(&ExactAngle::from_ratio(offset, placement.gon as i64))
}

/// All `gon` vertices of a placed face, at its circumradius.
pub fn face_vertices(placement: &ExactPlacement) -> Vec<ExactPoint> {
    let rc = Magnitude::atom(Atom::Circumradius(placement.gon));
    (0..placement.gon)
        .map(|k| {
            let angle = vertex_angle(placement, k);
            ExactPoint {
                x: placement
                    .center_x
                    .add(&Coord::term(rc.clone(), Trig::Cos, angle.clone())),
                y: placement
                    .center_y
                    .add(&Coord::term(rc.clone(), Trig::Sin, angle)),
            }
        })
        .collect()
}

/// All `gon` edges of a placed face, tagged with their polyhedron edge id.
pub fn face_edges(poly: &Polyhedron, placement: &ExactPlacement) -> Vec<ExactEdge> {
    let vertices = face_vertices(placement);
    let gon = placement.gon;
    (0..gon)
        .map(|k| {
            let next = (k + 1) % gon;
            ExactEdge {
                p0: ExactPoint {
                    x: vertices[k].x.clone(),
                    y: vertices[k].y.clone(),
                },
                p1: ExactPoint {
                    x: vertices[next].x.clone(),
                    y: vertices[next].y.clone(),
                },
                direction: edge_direction(placement, k),
                edge_id: poly.edge_at(placement.face_id, k),
            }
        })
        .collect()
}

/// Exact tangent direction of edge `k`: the outward midpoint direction
/// (`theta + (k - entry_position) * 2*pi/gon`) rotated by `pi/2`.
fn edge_direction(placement: &ExactPlacement, k: usize) -> ExactAngle {
    let midpoint_dir = placement.theta.add(&ExactAngle::from_ratio(
        2 * (k as i64 - placement.entry_position as i64),
        placement.gon as i64,
    ));
    midpoint_dir.add(&ExactAngle::from_ratio(1, 2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poly::test_fixtures::tetrahedron;
    use crate::record::{BasePair, UnfoldedFace};

    fn face(id: usize, gon: usize, edge: EdgeId) -> UnfoldedFace {
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
    fn base_face_centre_is_origin() {
        let poly = tetrahedron();
        let record = PartialUnfolding::new(
            BasePair {
                base_face: 0,
                base_edge: 0,
            },
            false,
            vec![face(0, 3, 0)],
        );
        let placements = build_placements(&poly, &record).unwrap();
        assert_eq!(placements.len(), 1);
        assert!(placements[0].center_x.eval(256).abs() < 1e-60);
        assert!(placements[0].center_y.eval(256).abs() < 1e-60);
    }

    #[test]
    fn second_face_centre_is_one_hop_away() {
        let poly = tetrahedron();
        let record = PartialUnfolding::new(
            BasePair {
                base_face: 0,
                base_edge: 0,
            },
            false,
            vec![face(0, 3, 0), face(3, 3, 0)],
        );
        let placements = build_placements(&poly, &record).unwrap();
        let expected: f64 = Magnitude::atom(Atom::Inradius(3)).eval(256).to_f64() * 2.0;
        let got = (placements[1].center_x.eval(256).to_f64().powi(2)
            + placements[1].center_y.eval(256).to_f64().powi(2))
        .sqrt();
        assert!((got - expected).abs() < 1e-6);
    }

    #[test]
    fn every_face_has_gon_vertices_and_edges() {
        let poly = tetrahedron();
        let record = PartialUnfolding::new(
            BasePair {
                base_face: 0,
                base_edge: 0,
            },
            false,
            vec![face(0, 3, 0), face(3, 3, 0)],
        );
        let placements = build_placements(&poly, &record).unwrap();
        for p in &placements {
            assert_eq!(face_vertices(p).len(), p.gon);
            assert_eq!(face_edges(&poly, p).len(), p.gon);
        }
    }
}
