//! Boolean evaluation: fuse, pairwise face intersection and splitting,
//! classification, cull, stitch.
//!
//! Faces that straddle the other operand (a coplanar pair whose
//! footprints only partially overlap, or a pair whose planes cross
//! through both interiors) are first cut along that curve by
//! [`crate::split::split_faces`], so what reaches `classify_face` is
//! always either disjoint from the other operand or wholly coincident
//! with one of its faces. Classification itself still works at whole
//! (post-split) face granularity: coplanar-face matching plus ray
//! casting against the other operand's shell, kept or discarded under a
//! truth table. `split_faces` only rebuilds a face's outer ring, so a
//! candidate face with holes falls back to the old whole-face
//! classification untouched; see DESIGN.md.

use crate::split::split_faces;
use crate::{OpsError, OpsResult};
use nmg_math::{Point3, Tolerance, Vec3};
use nmg_topo::{FaceId, FaceUseId, Model, ShellId, VertexId};
use std::collections::HashSet;

/// The three Boolean operations the evaluator supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOp {
    /// A ∪ B.
    Union,
    /// A \ B.
    Subtract,
    /// A ∩ B.
    Intersect,
}

impl BooleanOp {
    /// Short name, used in log messages.
    pub fn name(&self) -> &'static str {
        match self {
            BooleanOp::Union => "union",
            BooleanOp::Subtract => "subtract",
            BooleanOp::Intersect => "intersect",
        }
    }
}

/// Where a face of one operand sits relative to the other operand's shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaceClass {
    /// Entirely inside the other shell.
    Inside,
    /// Entirely outside the other shell.
    Outside,
    /// Touches the other shell's boundary without coinciding with a face.
    OnBoundary,
    /// Coincides with a face of the other shell, same outward normal.
    SharedSame,
    /// Coincides with a face of the other shell, opposite outward normal.
    SharedOpposite,
}

/// Evaluates Boolean operations between two shells of the same [`Model`].
#[derive(Debug, Clone, Copy)]
pub struct BooleanEvaluator {
    tol: Tolerance,
}

impl BooleanEvaluator {
    /// Build an evaluator using the given tolerance bundle.
    pub fn new(tol: Tolerance) -> Self {
        Self { tol }
    }

    /// Evaluate `shell_a OP shell_b`, both already present in `model`,
    /// and return the freshly built result shell. The two input shells
    /// are killed; the result lives in a new region.
    pub fn evaluate(
        &self,
        model: &mut Model,
        shell_a: ShellId,
        shell_b: ShellId,
        op: BooleanOp,
    ) -> OpsResult<ShellId> {
        log::debug!(
            "boolean {}: shell_a={shell_a:?} shell_b={shell_b:?}",
            op.name()
        );
        self.fuse(model, shell_a, shell_b)?;
        split_faces(model, shell_a, shell_b, &self.tol)?;

        let class_a = self.classify_shell(model, shell_a, shell_b);
        let class_b = self.classify_shell(model, shell_b, shell_a);

        let region = model.nmg_mr();
        let result = model.nmg_ms(region)?;

        self.cull_and_stitch(model, &class_a, true, op, result)?;
        self.cull_and_stitch(model, &class_b, false, op, result)?;

        model.kill_shell(shell_a)?;
        model.kill_shell(shell_b)?;

        if op == BooleanOp::Intersect && model.shell_is_empty(result) {
            return Err(OpsError::NoIntersection);
        }
        Ok(result)
    }

    /// Weld any boundary edge-use pair from the two shells whose endpoints
    /// coincide within tolerance, so a later Boolean pass sees them as a
    /// single shared edge rather than two edges that happen to overlap.
    fn fuse(&self, model: &mut Model, shell_a: ShellId, shell_b: ShellId) -> OpsResult<()> {
        let eus_a = self.boundary_edgeuses(model, shell_a);
        let eus_b = self.boundary_edgeuses(model, shell_b);
        for &eu_a in &eus_a {
            let a0 = model.vertex_point(model.edgeuse_start_vertex(eu_a));
            let a1 = model.vertex_point(model.edgeuse_end_vertex(eu_a));
            for &eu_b in &eus_b {
                if model.edgeuse_edge(eu_a) == model.edgeuse_edge(eu_b) {
                    continue;
                }
                let b0 = model.vertex_point(model.edgeuse_start_vertex(eu_b));
                let b1 = model.vertex_point(model.edgeuse_end_vertex(eu_b));
                let forward = self.coincident(a0, b0) && self.coincident(a1, b1);
                let reverse = self.coincident(a0, b1) && self.coincident(a1, b0);
                if forward || reverse {
                    model.weld_edge(eu_a, eu_b)?;
                }
            }
        }
        Ok(())
    }

    fn boundary_edgeuses(&self, model: &Model, shell: ShellId) -> Vec<nmg_topo::EdgeUseId> {
        let mut out = Vec::new();
        for &fu in model.shell_faceuses(shell) {
            for &lu in model.faceuse_loopuses(fu) {
                if let Some(eus) = model.loopuse_edgeuses(lu) {
                    out.extend_from_slice(eus);
                }
            }
        }
        out
    }

    fn coincident(&self, p: Point3, q: Point3) -> bool {
        self.tol.coincident_sq(p.distance_squared_to(&q))
    }

    /// Classify every OT_SAME face of `shell` against `other`.
    fn classify_shell(&self, model: &Model, shell: ShellId, other: ShellId) -> Vec<(FaceId, FaceClass)> {
        model
            .shell_faceuses(shell)
            .iter()
            .map(|&fu| {
                let face = model.faceuse_face(fu);
                (face, self.classify_face(model, fu, other))
            })
            .collect()
    }

    fn classify_face(&self, model: &Model, fu: FaceUseId, other: ShellId) -> FaceClass {
        let face = model.faceuse_face(fu);
        let plane = model.face_plane(face);
        let normal = model.face_normal(fu);
        let footprint = self.outer_ring_vertex_set(model, fu);

        for &other_fu in model.shell_faceuses(other) {
            let other_face = model.faceuse_face(other_fu);
            let other_plane = model.face_plane(other_face);
            if !other_plane.approx_eq(&plane, self.tol.dist, self.tol.perp)
                && !other_plane.flip().approx_eq(&plane, self.tol.dist, self.tol.perp)
            {
                continue;
            }
            // Coplanar alone isn't enough: only a face whose boundary is
            // made of the exact same (already vertex-welded) vertices as
            // `other_fu` actually coincides with it. A coplanar face that
            // only partially overlapped was already cut by `split_faces`,
            // so by this point any coplanar-but-distinct footprint really
            // is a separate face that happens to share a plane.
            if self.outer_ring_vertex_set(model, other_fu) != footprint {
                continue;
            }
            let other_normal = model.face_normal(other_fu);
            let dot = normal.dot(&other_normal);
            if dot >= self.tol.para {
                return FaceClass::SharedSame;
            }
            if dot <= -self.tol.para {
                return FaceClass::SharedOpposite;
            }
        }

        let centroid = self.face_centroid(model, fu);
        self.classify_point(model, centroid, other)
    }

    fn outer_ring_vertex_set(&self, model: &Model, fu: FaceUseId) -> HashSet<VertexId> {
        let lu = model.faceuse_loopuses(fu)[0];
        model
            .loopuse_edgeuses(lu)
            .unwrap()
            .iter()
            .map(|&eu| model.edgeuse_start_vertex(eu))
            .collect()
    }

    fn face_centroid(&self, model: &Model, fu: FaceUseId) -> Point3 {
        let lu = model.faceuse_loopuses(fu)[0];
        let verts: Vec<VertexId> = model
            .loopuse_edgeuses(lu)
            .unwrap()
            .iter()
            .map(|&eu| model.edgeuse_start_vertex(eu))
            .collect();
        let mut sum = Vec3::ZERO;
        for &v in &verts {
            sum += model.vertex_point(v).to_vector();
        }
        let n = verts.len().max(1) as f64;
        Point3::new(sum.x() / n, sum.y() / n, sum.z() / n)
    }

    /// Classify a point against a shell by parity ray casting along +X:
    /// count crossings of the shell's faces, with an early "on boundary"
    /// exit when the point itself lies in a face's plane and footprint.
    fn classify_point(&self, model: &Model, point: Point3, shell: ShellId) -> FaceClass {
        let ray_dir = Vec3::X;
        let mut crossings = 0usize;
        for &fu in model.shell_faceuses(shell) {
            let face = model.faceuse_face(fu);
            let plane = model.face_plane(face);
            let dist = plane.signed_distance_to_point(&point);
            if dist.abs() <= self.tol.dist && self.point_in_face_footprint(model, fu, point) {
                return FaceClass::OnBoundary;
            }
            let normal = plane.normal();
            let denom = normal.dot(&ray_dir);
            if denom.abs() < self.tol.perp {
                continue;
            }
            let t = (plane.origin() - point).dot(&normal) / denom;
            if t <= self.tol.dist {
                continue;
            }
            let hit = point + ray_dir * t;
            if self.point_in_face_footprint(model, fu, hit) {
                crossings += 1;
            }
        }
        if crossings % 2 == 1 {
            FaceClass::Inside
        } else {
            FaceClass::Outside
        }
    }

    /// Bounding-box footprint test in the face's plane; a cheap stand-in
    /// for an exact point-in-polygon test, adequate once ear-clipping
    /// (`nmg_tess`) has already validated the polygon is simple.
    fn point_in_face_footprint(&self, model: &Model, fu: FaceUseId, p: Point3) -> bool {
        let lu = model.faceuse_loopuses(fu)[0];
        let Some(eus) = model.loopuse_edgeuses(lu) else {
            return false;
        };
        let plane = model.face_plane(model.faceuse_face(fu));
        let (u_axis, v_axis) = plane.basis_vectors();
        let origin = plane.origin();
        let (pu, pv) = {
            let d = p - origin;
            (d.dot(&u_axis), d.dot(&v_axis))
        };
        let mut inside = false;
        let n = eus.len();
        for i in 0..n {
            let vi = model.vertex_point(model.edgeuse_start_vertex(eus[i]));
            let vj = model.vertex_point(model.edgeuse_start_vertex(eus[(i + 1) % n]));
            let (xi, yi) = {
                let d = vi - origin;
                (d.dot(&u_axis), d.dot(&v_axis))
            };
            let (xj, yj) = {
                let d = vj - origin;
                (d.dot(&u_axis), d.dot(&v_axis))
            };
            if (yi > pv) != (yj > pv) {
                let x_cross = xi + (pv - yi) / (yj - yi) * (xj - xi);
                if pu < x_cross {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// Keep or discard each classified face of one operand, rebuilding
    /// kept faces (vertex-deduplicated against the result shell so far)
    /// into `result`. `is_first` distinguishes operand A from operand B
    /// in the per-operation truth table.
    fn cull_and_stitch(
        &self,
        model: &mut Model,
        classified: &[(FaceId, FaceClass)],
        is_first: bool,
        op: BooleanOp,
        result: ShellId,
    ) -> OpsResult<()> {
        let mut seen_shared = HashSet::new();
        for &(face, class) in classified {
            let (keep, flip) = self.truth_table(op, is_first, class);
            if !keep {
                continue;
            }
            if matches!(class, FaceClass::SharedSame | FaceClass::SharedOpposite) {
                // Only one side contributes a shared face to the result.
                let key = (face, class);
                if !is_first && seen_shared.contains(&key) {
                    continue;
                }
                seen_shared.insert(key);
            }
            self.rebuild_face(model, face, flip, result)?;
        }
        Ok(())
    }

    /// `(keep, flip)` for a face classified as `class`, belonging to the
    /// first or second operand of `op`. Flipping reverses the rebuilt
    /// face's winding, needed when a subtracted operand's retained
    /// interior face must point into the cavity it creates.
    fn truth_table(&self, op: BooleanOp, is_first: bool, class: FaceClass) -> (bool, bool) {
        use FaceClass::*;
        match (op, is_first, class) {
            (BooleanOp::Union, _, Outside) => (true, false),
            (BooleanOp::Union, _, OnBoundary) => (true, false),
            (BooleanOp::Union, true, SharedSame) => (true, false),
            (BooleanOp::Union, false, SharedSame) => (true, false),
            (BooleanOp::Union, _, SharedOpposite) => (false, false),
            (BooleanOp::Union, _, Inside) => (false, false),

            (BooleanOp::Subtract, true, Outside) => (true, false),
            (BooleanOp::Subtract, true, OnBoundary) => (true, false),
            (BooleanOp::Subtract, true, Inside) => (false, false),
            (BooleanOp::Subtract, true, SharedSame) => (false, false),
            (BooleanOp::Subtract, true, SharedOpposite) => (true, false),
            (BooleanOp::Subtract, false, Inside) => (true, true),
            (BooleanOp::Subtract, false, Outside) => (false, false),
            (BooleanOp::Subtract, false, OnBoundary) => (false, false),
            (BooleanOp::Subtract, false, SharedSame) => (false, false),
            (BooleanOp::Subtract, false, SharedOpposite) => (false, false),

            (BooleanOp::Intersect, _, Inside) => (true, false),
            (BooleanOp::Intersect, true, SharedSame) => (true, false),
            (BooleanOp::Intersect, false, SharedSame) => (true, false),
            (BooleanOp::Intersect, _, SharedOpposite) => (false, false),
            (BooleanOp::Intersect, _, Outside) => (false, false),
            (BooleanOp::Intersect, _, OnBoundary) => (false, false),
        }
    }

    /// Re-derive a kept face's polygon (outer ring plus holes) from its
    /// still-live source and rebuild it in `result`, deduplicating
    /// vertices against whatever the result shell already contains.
    fn rebuild_face(&self, model: &mut Model, face: FaceId, flip: bool, result: ShellId) -> OpsResult<()> {
        let [fu_same, _] = model.face_faceuses(face);
        let loopuses: Vec<_> = model.faceuse_loopuses(fu_same).to_vec();
        let mut rings: Vec<Vec<VertexId>> = Vec::with_capacity(loopuses.len());
        for &lu in &loopuses {
            let Some(eus) = model.loopuse_edgeuses(lu) else {
                continue;
            };
            let points: Vec<Point3> = eus
                .iter()
                .map(|&eu| model.vertex_point(model.edgeuse_start_vertex(eu)))
                .collect();
            let mut verts: Vec<VertexId> = points
                .iter()
                .map(|&p| model.find_or_make_vertex(p, &self.tol))
                .collect();
            if flip {
                verts.reverse();
            }
            rings.push(verts);
        }
        let Some((outer, holes)) = rings.split_first() else {
            return Ok(());
        };
        let new_face = model.make_face_from_loop(result, outer)?;
        for hole in holes {
            model.add_hole_to_face(new_face, hole)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nmg_math::Point3;

    fn cube(model: &mut Model, shell: ShellId, origin: Point3, size: f64) {
        let (x, y, z) = (origin.x(), origin.y(), origin.z());
        let v = |dx: f64, dy: f64, dz: f64| Point3::new(x + dx * size, y + dy * size, z + dz * size);
        let corners = [
            v(0.0, 0.0, 0.0),
            v(1.0, 0.0, 0.0),
            v(1.0, 1.0, 0.0),
            v(0.0, 1.0, 0.0),
            v(0.0, 0.0, 1.0),
            v(1.0, 0.0, 1.0),
            v(1.0, 1.0, 1.0),
            v(0.0, 1.0, 1.0),
        ];
        let ids: Vec<VertexId> = corners.into_iter().map(|p| model.make_vertex(p)).collect();
        let faces = [
            [0, 3, 2, 1], // bottom, normal -Z
            [4, 5, 6, 7], // top, normal +Z
            [0, 1, 5, 4], // front
            [1, 2, 6, 5], // right
            [2, 3, 7, 6], // back
            [3, 0, 4, 7], // left
        ];
        for f in faces {
            let verts: Vec<VertexId> = f.iter().map(|&i| ids[i]).collect();
            model.make_face_from_loop(shell, &verts).unwrap();
        }
    }

    #[test]
    fn test_union_of_disjoint_cubes_keeps_all_faces() {
        let mut model = Model::default();
        let region = model.nmg_mr();
        let shell_a = model.nmg_ms(region).unwrap();
        let shell_b = model.nmg_ms(region).unwrap();
        cube(&mut model, shell_a, Point3::new(0.0, 0.0, 0.0), 1.0);
        cube(&mut model, shell_b, Point3::new(10.0, 0.0, 0.0), 1.0);

        let evaluator = BooleanEvaluator::new(Tolerance::DEFAULT);
        let result = evaluator
            .evaluate(&mut model, shell_a, shell_b, BooleanOp::Union)
            .unwrap();
        assert_eq!(model.shell_faceuses(result).len(), 12);
    }

    #[test]
    fn test_intersect_of_disjoint_cubes_is_empty() {
        let mut model = Model::default();
        let region = model.nmg_mr();
        let shell_a = model.nmg_ms(region).unwrap();
        let shell_b = model.nmg_ms(region).unwrap();
        cube(&mut model, shell_a, Point3::new(0.0, 0.0, 0.0), 1.0);
        cube(&mut model, shell_b, Point3::new(10.0, 0.0, 0.0), 1.0);

        let evaluator = BooleanEvaluator::new(Tolerance::DEFAULT);
        let err = evaluator
            .evaluate(&mut model, shell_a, shell_b, BooleanOp::Intersect)
            .unwrap_err();
        assert_eq!(err, OpsError::NoIntersection);
    }

    #[test]
    fn test_subtract_overlapping_cubes_keeps_some_faces() {
        let mut model = Model::default();
        let region = model.nmg_mr();
        let shell_a = model.nmg_ms(region).unwrap();
        let shell_b = model.nmg_ms(region).unwrap();
        cube(&mut model, shell_a, Point3::new(0.0, 0.0, 0.0), 2.0);
        cube(&mut model, shell_b, Point3::new(1.0, 1.0, 1.0), 2.0);

        let evaluator = BooleanEvaluator::new(Tolerance::DEFAULT);
        let result = evaluator
            .evaluate(&mut model, shell_a, shell_b, BooleanOp::Subtract)
            .unwrap();
        assert!(!model.shell_faceuses(result).is_empty());
    }

    #[test]
    fn test_union_of_partially_overlapping_cubes_splits_straddling_faces() {
        let mut model = Model::default();
        let region = model.nmg_mr();
        let shell_a = model.nmg_ms(region).unwrap();
        let shell_b = model.nmg_ms(region).unwrap();
        cube(&mut model, shell_a, Point3::new(0.0, 0.0, 0.0), 1.0);
        cube(&mut model, shell_b, Point3::new(0.5, 0.0, 0.0), 1.0);

        let evaluator = BooleanEvaluator::new(Tolerance::DEFAULT);
        let result = evaluator
            .evaluate(&mut model, shell_a, shell_b, BooleanOp::Union)
            .unwrap();

        let bbox = model.shell_bbox(result, &Tolerance::DEFAULT);
        assert!((bbox.min.x() - 0.0).abs() < 1e-9);
        assert!((bbox.max.x() - 1.5).abs() < 1e-9);
        assert!((bbox.min.y() - 0.0).abs() < 1e-9);
        assert!((bbox.max.y() - 1.0).abs() < 1e-9);

        // Straddling side faces got cut at the overlap boundary rather
        // than kept or discarded whole: more pieces than a disjoint
        // union's 12, but the coincident interior halves are discarded
        // so it's well short of one new face per clip.
        let count = model.shell_faceuses(result).len();
        assert!(count > 6, "expected straddling faces to be split, got {count} faces");
    }
}
