//! The recursive DFS itself (`spec.md` §4.1 state machine): `arrive` →
//! `place+normalise` → `distance-prune?` → `symmetry-prune?` → `emit?` →
//! `expand children` → `depart`.

use crate::error::Result;
use crate::geom::{circumradius, inradius, normalize_deg, snap, BUFFER};
use crate::poly::{EdgeId, Polyhedron, RootPair};
use crate::record::{BasePair, PartialUnfolding, UnfoldedFace};

/// Scratch shared across one root pair's recursion; restored on every backtrack.
struct Ctx<'a, F: FnMut(PartialUnfolding) -> Result<()>> {
    poly: &'a Polyhedron,
    base_face: usize,
    base_edge: EdgeId,
    r0: f64,
    symmetric_used: bool,
    used: Vec<bool>,
    path: Vec<UnfoldedFace>,
    on_record: &'a mut F,
    count: usize,
}

/// Run the search for a single root pair, returning the number of records emitted.
pub fn run_root(
    poly: &Polyhedron,
    root: RootPair,
    symmetric_used: bool,
    on_record: &mut impl FnMut(PartialUnfolding) -> Result<()>,
) -> Result<usize> {
    let base_face = root.base_face;
    let base_edge = root.base_edge;
    let n0 = poly.gon(base_face);
    let r0 = circumradius(n0);

    let k0 = poly.edge_position(base_face, base_edge)?;
    let second_face = poly.neighbor(base_face, k0);
    let n1 = poly.gon(second_face);

    let second_x = snap(inradius(n0) + inradius(n1));
    let second_y = snap(0.0);
    let second_theta = normalize_deg(-180.0);
    let p1 = poly.edge_position(second_face, base_edge)?;

    let mut used = vec![false; poly.num_faces()];
    used[base_face] = true;
    let total_span: f64 = (0..poly.num_faces())
        .map(|f| 2.0 * circumradius(poly.gon(f)))
        .sum();
    let remaining_after_base = total_span - 2.0 * r0;

    let base_entry = UnfoldedFace {
        face_id: base_face,
        gon: n0,
        edge_id: base_edge,
        x: 0.0,
        y: 0.0,
        angle_deg: 0.0,
    };

    let mut ctx = Ctx {
        poly,
        base_face,
        base_edge,
        r0,
        symmetric_used,
        used,
        path: vec![base_entry],
        on_record,
        count: 0,
    };

    place_and_recurse(
        &mut ctx,
        second_face,
        n1,
        base_edge,
        second_x,
        second_y,
        second_theta,
        p1,
        remaining_after_base,
        true, // y_moved_off_axis, initialised true
    )?;

    Ok(ctx.count)
}

/// Process the arrival at `face`, already placed at `(x, y)` with orientation
/// `theta` (the back-angle used to compute its own children) and incoming-edge
/// index `p` within `poly.faces[face].edges`. `remaining_r` is the
/// not-yet-used-face capacity *before* this face is removed from the pool.
#[allow(clippy::too_many_arguments)]
fn place_and_recurse<F: FnMut(PartialUnfolding) -> Result<()>>(
    ctx: &mut Ctx<F>,
    face: usize,
    gon: usize,
    edge_id: EdgeId,
    x: f64,
    y: f64,
    theta: f64,
    p: usize,
    remaining_r_before: f64,
    y_moved_off_axis_in: bool,
) -> Result<()> {
    let x = snap(x);
    let y = snap(y);

    ctx.used[face] = true;
    let rc = circumradius(gon);
    let remaining_r = remaining_r_before - 2.0 * rc;
    ctx.path.push(UnfoldedFace {
        face_id: face,
        gon,
        edge_id,
        x,
        y,
        angle_deg: theta,
    });

    let rho = (x * x + y * y).sqrt();

    let mut y_moved_off_axis = y_moved_off_axis_in;
    if y > 0.0 {
        y_moved_off_axis = false;
    }

    let distance_pruned = rho > remaining_r + ctx.r0 + rc + BUFFER;
    let symmetry_pruned = ctx.symmetric_used && y_moved_off_axis && y < 0.0;

    if !distance_pruned && !symmetry_pruned {
        if rho < ctx.r0 + rc + BUFFER {
            emit(ctx)?;
        }

        for k in 1..gon {
            let out_idx = (p + k) % gon;
            let phi = normalize_deg(theta - (k as f64) * (360.0 / gon as f64));
            let next_face = ctx.poly.neighbor(face, out_idx);
            if ctx.used[next_face] {
                continue;
            }
            let next_gon = ctx.poly.gon(next_face);
            let hop = inradius(gon) + inradius(next_gon);
            let next_x = snap(x + hop * phi.to_radians().cos());
            let next_y = snap(y + hop * phi.to_radians().sin());
            let next_theta = normalize_deg(phi - 180.0);
            let next_edge = ctx.poly.edge_at(face, out_idx);
            let p_next = match ctx.poly.edge_position(next_face, next_edge) {
                Ok(p) => p,
                Err(_) => continue,
            };
            place_and_recurse(
                ctx,
                next_face,
                next_gon,
                next_edge,
                next_x,
                next_y,
                next_theta,
                p_next,
                remaining_r,
                y_moved_off_axis,
            )?;
        }
    }

    ctx.path.pop();
    ctx.used[face] = false;
    Ok(())
}

fn emit<F: FnMut(PartialUnfolding) -> Result<()>>(ctx: &mut Ctx<F>) -> Result<()> {
    let record = PartialUnfolding::new(
        BasePair {
            base_face: ctx.base_face,
            base_edge: ctx.base_edge,
        },
        ctx.symmetric_used,
        ctx.path.clone(),
    );
    (ctx.on_record)(record)?;
    ctx.count += 1;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poly::test_fixtures::tetrahedron;

    #[test]
    fn emits_at_least_the_trivial_two_face_unfolding() {
        let poly = tetrahedron();
        let mut records = Vec::new();
        run_root(
            &poly,
            RootPair {
                base_face: 0,
                base_edge: 0,
            },
            false,
            &mut |r| {
                records.push(r);
                Ok(())
            },
        )
        .unwrap();
        assert!(!records.is_empty());
        assert!(records
            .iter()
            .any(|r| r.faces.len() == 2 && r.faces[1].face_id == poly.neighbor(0, 0)));
    }

    #[test]
    fn no_record_has_duplicate_face_ids() {
        let poly = tetrahedron();
        let mut records = Vec::new();
        run_root(
            &poly,
            RootPair {
                base_face: 0,
                base_edge: 0,
            },
            false,
            &mut |r| {
                records.push(r);
                Ok(())
            },
        )
        .unwrap();
        for r in &records {
            let mut seen = std::collections::HashSet::new();
            for f in &r.faces {
                assert!(seen.insert(f.face_id));
            }
        }
    }

    #[test]
    fn distance_gate_soundness() {
        let poly = tetrahedron();
        let mut records = Vec::new();
        run_root(
            &poly,
            RootPair {
                base_face: 0,
                base_edge: 0,
            },
            false,
            &mut |r| {
                records.push(r);
                Ok(())
            },
        )
        .unwrap();
        for r in &records {
            let last = r.faces.last().unwrap();
            let r0 = circumradius(poly.gon(r.base_pair.base_face));
            let rc = circumradius(last.gon);
            let rho = (last.x * last.x + last.y * last.y).sqrt();
            assert!(rho < r0 + rc + BUFFER + 1e-9);
        }
    }

    #[test]
    fn symmetric_on_is_subset_of_off_by_path_shape() {
        let poly = tetrahedron();
        let mut on_records = Vec::new();
        let mut off_records = Vec::new();
        run_root(
            &poly,
            RootPair {
                base_face: 0,
                base_edge: 0,
            },
            true,
            &mut |r| {
                on_records.push(r);
                Ok(())
            },
        )
        .unwrap();
        run_root(
            &poly,
            RootPair {
                base_face: 0,
                base_edge: 0,
            },
            false,
            &mut |r| {
                off_records.push(r);
                Ok(())
            },
        )
        .unwrap();
        assert!(on_records.len() <= off_records.len());
    }
}
