//! Two-stage intersection test and priority classification (`spec.md`
//! §4.3.2, §4.3.4). A regular polygon's edges never degenerate (every gon is
//! at least 3 and every circumradius is positive), so the degenerate-segment
//! reclassification `spec.md` §4.3.2 names does not arise here.

use rug::Float;

use super::angle::ExactAngle;
use super::geometry::{ExactEdge, ExactPoint};
use super::precision::{classify_param, decide_sign, error_bound, ParamClass, Sign, INITIAL_PREC_BITS, MAX_PREC_BITS};
use crate::error::{CoreError, Result};
use crate::record::OverlapKind;

/// The strongest overlap kind realised between one pair of edges, or `None`
/// if the two segments do not meet.
pub fn classify_edge_pair(a: &ExactEdge, b: &ExactEdge) -> Result<Option<OverlapKind>> {
    if a.direction.same_line(&b.direction) {
        classify_parallel(a, b)
    } else {
        classify_transversal(a, b)
    }
}

fn solve_ts(a: &ExactEdge, b: &ExactEdge, prec: u32) -> (Float, Float) {
    let a0x = a.p0.x.eval(prec);
    let a0y = a.p0.y.eval(prec);
    let a1x = a.p1.x.eval(prec);
    let a1y = a.p1.y.eval(prec);
    let b0x = b.p0.x.eval(prec);
    let b0y = b.p0.y.eval(prec);
    let b1x = b.p1.x.eval(prec);
    let b1y = b.p1.y.eval(prec);

    let d1x = Float::with_val(prec, &a1x - &a0x);
    let d1y = Float::with_val(prec, &a1y - &a0y);
    let d2x = Float::with_val(prec, &b1x - &b0x);
    let d2y = Float::with_val(prec, &b1y - &b0y);
    let rhsx = Float::with_val(prec, &b0x - &a0x);
    let rhsy = Float::with_val(prec, &b0y - &a0y);

    let det = Float::with_val(prec, &d1x * &d2y) - Float::with_val(prec, &d1y * &d2x);
    let t = Float::with_val(
        prec,
        Float::with_val(prec, &rhsx * &d2y) - Float::with_val(prec, &rhsy * &d2x),
    ) / &det;
    let s = Float::with_val(
        prec,
        Float::with_val(prec, &d1x * &rhsy) - Float::with_val(prec, &d1y * &rhsx),
    ) / &det;
    (t, s)
}

fn classify_transversal(a: &ExactEdge, b: &ExactEdge) -> Result<Option<OverlapKind>> {
    let t = classify_param(|prec| solve_ts(a, b, prec).0)?;
    let s = classify_param(|prec| solve_ts(a, b, prec).1)?;
    use ParamClass::*;
    let kind = match (t, s) {
        (Outside, _) | (_, Outside) => None,
        (Interior, Interior) => Some(OverlapKind::FaceFace),
        (Interior, _) | (_, Interior) => Some(OverlapKind::EdgeVertex),
        _ => Some(OverlapKind::VertexVertex),
    };
    Ok(kind)
}

fn classify_parallel(a: &ExactEdge, b: &ExactEdge) -> Result<Option<OverlapKind>> {
    let normal = a.direction.add(&ExactAngle::from_ratio(1, 2));
    let offset_sign = decide_sign("parallel-edge perpendicular offset", |prec| {
        let dx = Float::with_val(prec, b.p0.x.eval(prec)) - Float::with_val(prec, a.p0.x.eval(prec));
        let dy = Float::with_val(prec, b.p0.y.eval(prec)) - Float::with_val(prec, a.p0.y.eval(prec));
        Float::with_val(prec, &dx * normal.cos(prec)) + Float::with_val(prec, &dy * normal.sin(prec))
    })?;
    if offset_sign != Sign::Zero {
        // Parallel but on distinct lines: no contact possible.
        return Ok(None);
    }

    let mut prec = INITIAL_PREC_BITS;
    loop {
        let proj = |p: &ExactPoint| -> Float {
            Float::with_val(prec, p.x.eval(prec) * a.direction.cos(prec))
                + Float::with_val(prec, p.y.eval(prec) * a.direction.sin(prec))
        };
        let (a0, a1, b0, b1) = (proj(&a.p0), proj(&a.p1), proj(&b.p0), proj(&b.p1));
        let (a_lo, a_hi) = if a0 <= a1 { (a0, a1) } else { (a1, a0) };
        let (b_lo, b_hi) = if b0 <= b1 { (b0, b1) } else { (b1, b0) };
        let lo = if a_lo >= b_lo { a_lo } else { b_lo };
        let hi = if a_hi <= b_hi { a_hi } else { b_hi };
        let length = Float::with_val(prec, &hi - &lo);

        if length.clone().abs() > error_bound(prec) {
            return Ok(if length > 0 {
                Some(OverlapKind::EdgeEdge)
            } else {
                None
            });
        }
        if prec >= MAX_PREC_BITS {
            return Err(CoreError::NumericIndecision {
                precision_bits: prec,
                context: "parallel-edge overlap length".to_string(),
            });
        }
        prec = (prec * 2).min(MAX_PREC_BITS);
    }
}

/// The strongest kind across every edge pair of two placed faces, per
/// `spec.md` §4.3.4 (face-face > edge-edge > edge-vertex = vertex-vertex).
/// Short-circuits on the first `face-face` found; otherwise scans every pair.
pub fn classify_face_pair(
    edges_a: &[ExactEdge],
    edges_b: &[ExactEdge],
) -> Result<Option<OverlapKind>> {
    let mut best: Option<OverlapKind> = None;
    for ea in edges_a {
        for eb in edges_b {
            if let Some(kind) = classify_edge_pair(ea, eb)? {
                if kind == OverlapKind::FaceFace {
                    return Ok(Some(kind));
                }
                best = Some(match best {
                    Some(prev) if prev.strength() >= kind.strength() => prev,
                    _ => kind,
                });
            }
        }
    }
    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exact::geometry::build_placements;
    use crate::exact::geometry::face_edges;
    use crate::poly::test_fixtures::tetrahedron;
    use crate::record::{BasePair, PartialUnfolding, UnfoldedFace};

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
    fn identical_edge_is_fully_collinear_overlapping() {
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
        let edges = face_edges(&poly, &placements[0]);
        let kind = classify_edge_pair(&edges[0], &edges[0]).unwrap();
        assert_eq!(kind, Some(OverlapKind::EdgeEdge));
    }

    #[test]
    fn adjacent_edges_meet_only_at_their_shared_vertex() {
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
        let edges = face_edges(&poly, &placements[0]);
        let kind = classify_edge_pair(&edges[0], &edges[1]).unwrap();
        assert_eq!(kind, Some(OverlapKind::VertexVertex));
    }
}
