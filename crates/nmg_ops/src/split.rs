//! Face splitting at intersection curves.
//!
//! `classify_face` in [`crate::boolean`] only resolves a whole face
//! against the other operand. Two faces that partially overlap (a
//! coplanar pair whose footprints only intersect in part) or cross each
//! other (their planes meet along a line running through both
//! interiors) need to be cut along that curve first, so each resulting
//! piece can be classified as wholly shared, inside or outside instead
//! of the whole face being forced into one bucket.
//!
//! Both cases reduce to the same primitive: Sutherland-Hodgman clipping
//! of a face's outer ring, projected into its own plane, against a
//! single line or a convex polygon. Holes are out of scope here; a
//! candidate face with a hole loop is left untouched and falls back to
//! whole-face classification.

use crate::OpsResult;
use nmg_math::{Plane, Point3, Tolerance, Vec3};
use nmg_topo::{FaceId, FaceUseId, Model, ShellId, VertexId};
use std::collections::HashSet;

type Poly2 = Vec<(f64, f64)>;

const MAX_SPLIT_PASSES: usize = 10_000;

/// Split every pair of bounding-box-overlapping faces between `shell_a`
/// and `shell_b` that genuinely cross or partially overlap. Returns
/// `true` if anything changed.
///
/// A candidate pair that turns out not to need splitting (identical
/// footprint, a plane that only grazes the other face, or a face with
/// holes) is remembered and not retried.
pub fn split_faces(
    model: &mut Model,
    shell_a: ShellId,
    shell_b: ShellId,
    tol: &Tolerance,
) -> OpsResult<bool> {
    let mut changed = false;
    let mut rejected: HashSet<(FaceId, FaceId)> = HashSet::new();

    for _ in 0..MAX_SPLIT_PASSES {
        let pairs = candidate_pairs(model, shell_a, shell_b, tol);
        let next = pairs.into_iter().find(|&(fu_a, fu_b)| {
            let key = (model.faceuse_face(fu_a), model.faceuse_face(fu_b));
            !rejected.contains(&key)
        });
        let Some((fu_a, fu_b)) = next else {
            break;
        };
        let key = (model.faceuse_face(fu_a), model.faceuse_face(fu_b));
        if split_pair(model, fu_a, fu_b, tol)? {
            changed = true;
        } else {
            rejected.insert(key);
        }
    }
    Ok(changed)
}

fn candidate_pairs(
    model: &mut Model,
    shell_a: ShellId,
    shell_b: ShellId,
    tol: &Tolerance,
) -> Vec<(FaceUseId, FaceUseId)> {
    let fus_a: Vec<FaceUseId> = model.shell_faceuses(shell_a).to_vec();
    let fus_b: Vec<FaceUseId> = model.shell_faceuses(shell_b).to_vec();
    let mut out = Vec::new();
    for &fu_a in &fus_a {
        let bbox_a = model.face_bbox(model.faceuse_face(fu_a), tol);
        for &fu_b in &fus_b {
            let bbox_b = model.face_bbox(model.faceuse_face(fu_b), tol);
            if bbox_a.intersects(&bbox_b) {
                out.push((fu_a, fu_b));
            }
        }
    }
    out
}

fn split_pair(
    model: &mut Model,
    fu_a: FaceUseId,
    fu_b: FaceUseId,
    tol: &Tolerance,
) -> OpsResult<bool> {
    if has_holes(model, fu_a) || has_holes(model, fu_b) {
        return Ok(false);
    }
    let plane_a = model.face_plane(model.faceuse_face(fu_a));
    let plane_b = model.face_plane(model.faceuse_face(fu_b));

    if plane_a.is_parallel_to(&plane_b, tol.perp) {
        if !plane_a.approx_eq(&plane_b, tol.dist, tol.perp)
            && !plane_a.flip().approx_eq(&plane_b, tol.dist, tol.perp)
        {
            return Ok(false);
        }
        split_coplanar_pair(model, fu_a, fu_b, &plane_a, tol)
    } else {
        split_crossing_pair(model, fu_a, fu_b, &plane_a, &plane_b, tol)
    }
}

fn has_holes(model: &Model, fu: FaceUseId) -> bool {
    model.faceuse_loopuses(fu).len() > 1
}

fn outer_ring_verts(model: &Model, fu: FaceUseId) -> Vec<VertexId> {
    let lu = model.faceuse_loopuses(fu)[0];
    model
        .loopuse_edgeuses(lu)
        .unwrap()
        .iter()
        .map(|&eu| model.edgeuse_start_vertex(eu))
        .collect()
}

fn project_ring(model: &Model, verts: &[VertexId], plane: &Plane) -> Poly2 {
    verts
        .iter()
        .map(|&v| {
            let (u, v2, _) = plane.to_plane_coords(&model.vertex_point(v));
            (u, v2)
        })
        .collect()
}

fn project_line(plane: &Plane, p: Point3, dir: Vec3) -> ((f64, f64), (f64, f64)) {
    let (u0, v0, _) = plane.to_plane_coords(&p);
    let (u1, v1, _) = plane.to_plane_coords(&(p + dir));
    ((u0, v0), (u1, v1))
}

fn same_vertex_set(a: &[VertexId], b: &[VertexId]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let set_a: HashSet<VertexId> = a.iter().copied().collect();
    b.iter().all(|v| set_a.contains(v))
}

/// A pair of faces whose planes cross: project the plane-plane
/// intersection line into each face's own 2D frame and split each
/// face's ring into the two halves on either side of it.
fn split_crossing_pair(
    model: &mut Model,
    fu_a: FaceUseId,
    fu_b: FaceUseId,
    plane_a: &Plane,
    plane_b: &Plane,
    tol: &Tolerance,
) -> OpsResult<bool> {
    let Some((line_p, line_dir)) = plane_a.intersect_plane(plane_b) else {
        return Ok(false);
    };

    let poly_a = project_ring(model, &outer_ring_verts(model, fu_a), plane_a);
    let poly_b = project_ring(model, &outer_ring_verts(model, fu_b), plane_b);

    let (la0, la1) = project_line(plane_a, line_p, line_dir);
    let (lb0, lb1) = project_line(plane_b, line_p, line_dir);

    let a_pos = clip_half_plane(&poly_a, la0, la1, true);
    let a_neg = clip_half_plane(&poly_a, la0, la1, false);
    if polygon_area(&a_pos).abs() <= tol.dist_sq || polygon_area(&a_neg).abs() <= tol.dist_sq {
        return Ok(false);
    }
    let b_pos = clip_half_plane(&poly_b, lb0, lb1, true);
    let b_neg = clip_half_plane(&poly_b, lb0, lb1, false);
    if polygon_area(&b_pos).abs() <= tol.dist_sq || polygon_area(&b_neg).abs() <= tol.dist_sq {
        return Ok(false);
    }

    let shell_a = model.faceuse_shell(fu_a);
    let shell_b = model.faceuse_shell(fu_b);
    let built_a = rebuild_face_as_polys(model, shell_a, plane_a, fu_a, vec![a_pos, a_neg], tol)?;
    let built_b = rebuild_face_as_polys(model, shell_b, plane_b, fu_b, vec![b_pos, b_neg], tol)?;
    Ok(built_a || built_b)
}

/// A coplanar pair whose footprints only partially overlap: clip each
/// ring against the other, treated as a convex clip polygon, to get the
/// shared piece plus each side's own remainder.
fn split_coplanar_pair(
    model: &mut Model,
    fu_a: FaceUseId,
    fu_b: FaceUseId,
    plane_a: &Plane,
    tol: &Tolerance,
) -> OpsResult<bool> {
    let plane_b = model.face_plane(model.faceuse_face(fu_b));
    let flip = plane_a.normal().dot(&plane_b.normal()) < 0.0;

    let ring_a = outer_ring_verts(model, fu_a);
    let ring_b = outer_ring_verts(model, fu_b);
    if same_vertex_set(&ring_a, &ring_b) {
        return Ok(false);
    }

    let poly_a = project_ring(model, &ring_a, plane_a);
    let mut poly_b = project_ring(model, &ring_b, plane_a);
    if flip {
        poly_b.reverse();
    }
    if polygon_area(&poly_a).abs() <= tol.dist_sq || polygon_area(&poly_b).abs() <= tol.dist_sq {
        return Ok(false);
    }

    let shared = convex_intersection(&poly_a, &poly_b);
    if polygon_area(&shared).abs() <= tol.dist_sq {
        return Ok(false);
    }

    let rem_a = convex_difference(&poly_a, &poly_b);
    let rem_b = convex_difference(&poly_b, &poly_a);

    let mut polys_a = vec![shared.clone()];
    polys_a.extend(rem_a);

    let mut polys_b: Vec<Poly2> = vec![shared];
    polys_b.extend(rem_b);
    for poly in &mut polys_b {
        poly.reverse();
    }

    let shell_a = model.faceuse_shell(fu_a);
    let shell_b = model.faceuse_shell(fu_b);
    let built_a = rebuild_face_as_polys(model, shell_a, plane_a, fu_a, polys_a, tol)?;
    let built_b = rebuild_face_as_polys(model, shell_b, plane_a, fu_b, polys_b, tol)?;
    Ok(built_a || built_b)
}

/// Build a new face for each polygon piece with non-negligible area
/// before killing the old face-use, so the new faces' vertex references
/// are live before the old face-use's ring can drop the last reference
/// to a shared vertex.
fn rebuild_face_as_polys(
    model: &mut Model,
    shell: ShellId,
    plane: &Plane,
    old_fu: FaceUseId,
    polys: Vec<Poly2>,
    tol: &Tolerance,
) -> OpsResult<bool> {
    let mut new_faces: Vec<Vec<VertexId>> = Vec::new();
    for poly in polys {
        if polygon_area(&poly).abs() <= tol.dist_sq {
            continue;
        }
        let verts: Vec<VertexId> = poly
            .iter()
            .map(|&(u, v)| model.find_or_make_vertex(plane.point_at(u, v), tol))
            .collect();
        let verts = dedupe_consecutive(verts);
        if verts.len() >= 3 {
            new_faces.push(verts);
        }
    }
    if new_faces.len() < 2 {
        return Ok(false);
    }
    for verts in &new_faces {
        model.make_face_from_loop(shell, verts)?;
    }
    model.kill_faceuse(old_fu)?;
    Ok(true)
}

fn dedupe_consecutive(verts: Vec<VertexId>) -> Vec<VertexId> {
    let mut out: Vec<VertexId> = Vec::with_capacity(verts.len());
    for v in verts {
        if out.last() != Some(&v) {
            out.push(v);
        }
    }
    if out.len() > 1 && out.first() == out.last() {
        out.pop();
    }
    out
}

fn cross2(u: (f64, f64), v: (f64, f64)) -> f64 {
    u.0 * v.1 - u.1 * v.0
}

fn polygon_area(poly: &Poly2) -> f64 {
    if poly.len() < 3 {
        return 0.0;
    }
    let n = poly.len();
    let mut sum = 0.0;
    for i in 0..n {
        let (x1, y1) = poly[i];
        let (x2, y2) = poly[(i + 1) % n];
        sum += x1 * y2 - x2 * y1;
    }
    sum * 0.5
}

fn intersect_line(a: (f64, f64), b: (f64, f64), p0: (f64, f64), p1: (f64, f64)) -> (f64, f64) {
    let (x1, y1) = a;
    let (x2, y2) = b;
    let (x3, y3) = p0;
    let (x4, y4) = p1;
    let denom = (x1 - x2) * (y3 - y4) - (y1 - y2) * (x3 - x4);
    if denom.abs() < 1e-15 {
        return a;
    }
    let t = ((x1 - x3) * (y3 - y4) - (y1 - y3) * (x3 - x4)) / denom;
    (x1 + t * (x2 - x1), y1 + t * (y2 - y1))
}

/// Sutherland-Hodgman clip of `subject` against the single infinite
/// line through `p0`/`p1`. Keeps the side where `cross2(p1-p0, p-p0)`
/// is non-negative when `keep_positive`, or non-positive otherwise.
/// Valid for any simple subject polygon, convex or not.
fn clip_half_plane(subject: &Poly2, p0: (f64, f64), p1: (f64, f64), keep_positive: bool) -> Poly2 {
    if subject.is_empty() {
        return Vec::new();
    }
    let dir = (p1.0 - p0.0, p1.1 - p0.1);
    let side = |p: (f64, f64)| -> f64 {
        let d = cross2(dir, (p.0 - p0.0, p.1 - p0.1));
        if keep_positive {
            d
        } else {
            -d
        }
    };
    let n = subject.len();
    let mut out = Vec::with_capacity(n + 1);
    for i in 0..n {
        let curr = subject[i];
        let prev = subject[(i + n - 1) % n];
        let curr_in = side(curr) >= 0.0;
        let prev_in = side(prev) >= 0.0;
        if curr_in {
            if !prev_in {
                out.push(intersect_line(prev, curr, p0, p1));
            }
            out.push(curr);
        } else if prev_in {
            out.push(intersect_line(prev, curr, p0, p1));
        }
    }
    out
}

/// Clip `subject` against every edge of `clip`, which must be convex.
/// Valid for any simple `subject`.
fn convex_intersection(subject: &Poly2, clip: &Poly2) -> Poly2 {
    let mut result = subject.clone();
    let ccw = polygon_area(clip) >= 0.0;
    let n = clip.len();
    for i in 0..n {
        if result.is_empty() {
            break;
        }
        result = clip_half_plane(&result, clip[i], clip[(i + 1) % n], ccw);
    }
    result
}

/// `subject` minus the convex polygon `clip`, as a set of (possibly
/// several) pieces. At each clip edge in turn, the part of the
/// still-unclipped `working` polygon that falls outside that edge is
/// final (since `working` is already inside every prior edge); the part
/// that's still inside carries on to the next edge.
fn convex_difference(subject: &Poly2, clip: &Poly2) -> Vec<Poly2> {
    let mut pieces = Vec::new();
    let mut working = subject.clone();
    let ccw = polygon_area(clip) >= 0.0;
    let n = clip.len();
    for i in 0..n {
        if working.is_empty() {
            break;
        }
        let p0 = clip[i];
        let p1 = clip[(i + 1) % n];
        let outside = clip_half_plane(&working, p0, p1, !ccw);
        if outside.len() >= 3 {
            pieces.push(outside);
        }
        working = clip_half_plane(&working, p0, p1, ccw);
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;
    use nmg_topo::Model;

    fn square(model: &mut Model, shell: ShellId, origin: (f64, f64), size: f64) -> FaceId {
        let (ox, oy) = origin;
        let verts: Vec<VertexId> = [
            (0.0, 0.0),
            (size, 0.0),
            (size, size),
            (0.0, size),
        ]
        .iter()
        .map(|&(x, y)| model.make_vertex(Point3::new(ox + x, oy + y, 0.0)))
        .collect();
        model.make_face_from_loop(shell, &verts).unwrap()
    }

    #[test]
    fn test_split_coplanar_partial_overlap() {
        let mut model = Model::default();
        let region = model.nmg_mr();
        let shell_a = model.nmg_ms(region).unwrap();
        let shell_b = model.nmg_ms(region).unwrap();
        square(&mut model, shell_a, (0.0, 0.0), 1.0);
        square(&mut model, shell_b, (0.5, 0.0), 1.0);

        let tol = Tolerance::DEFAULT;
        let changed = split_faces(&mut model, shell_a, shell_b, &tol).unwrap();
        assert!(changed);
        // Each original square split into a shared piece plus a remainder.
        assert_eq!(model.shell_faceuses(shell_a).len(), 2);
        assert_eq!(model.shell_faceuses(shell_b).len(), 2);
    }

    #[test]
    fn test_split_disjoint_faces_is_a_no_op() {
        let mut model = Model::default();
        let region = model.nmg_mr();
        let shell_a = model.nmg_ms(region).unwrap();
        let shell_b = model.nmg_ms(region).unwrap();
        square(&mut model, shell_a, (0.0, 0.0), 1.0);
        square(&mut model, shell_b, (10.0, 0.0), 1.0);

        let tol = Tolerance::DEFAULT;
        let changed = split_faces(&mut model, shell_a, shell_b, &tol).unwrap();
        assert!(!changed);
        assert_eq!(model.shell_faceuses(shell_a).len(), 1);
        assert_eq!(model.shell_faceuses(shell_b).len(), 1);
    }

    #[test]
    fn test_split_identical_footprint_is_a_no_op() {
        let mut model = Model::default();
        let region = model.nmg_mr();
        let shell_a = model.nmg_ms(region).unwrap();
        let shell_b = model.nmg_ms(region).unwrap();
        let face_a = square(&mut model, shell_a, (0.0, 0.0), 1.0);
        square(&mut model, shell_b, (0.0, 0.0), 1.0);

        let tol = Tolerance::DEFAULT;
        let changed = split_faces(&mut model, shell_a, shell_b, &tol).unwrap();
        assert!(!changed);
        assert_eq!(model.faceuse_face(model.shell_faceuses(shell_a)[0]), face_a);
    }

    #[test]
    fn test_convex_intersection_of_overlapping_squares() {
        let a = vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
        let b = vec![(0.5, 0.5), (1.5, 0.5), (1.5, 1.5), (0.5, 1.5)];
        let shared = convex_intersection(&a, &b);
        assert!((polygon_area(&shared).abs() - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_convex_difference_area_sums_to_remainder() {
        let a = vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
        let b = vec![(0.5, 0.5), (1.5, 0.5), (1.5, 1.5), (0.5, 1.5)];
        let pieces = convex_difference(&a, &b);
        let total: f64 = pieces.iter().map(|p| polygon_area(p).abs()).sum();
        assert!((total - 0.75).abs() < 1e-9);
    }
}
