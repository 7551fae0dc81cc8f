//! Ear-clipping triangulation with hole bridging.

use crate::error::{TessError, TessResult};
use crate::mesh::{Mesh, Vertex};
use nmg_topo::{FaceId, FaceUseId, Model, RegionId, ShellId, VertexId};
use rayon::prelude::*;
use std::collections::HashMap;

/// Triangulates faces of an [`Model`] into a flat [`Mesh`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Triangulator;

impl Triangulator {
    /// A triangulator with no configurable state; ear clipping needs no
    /// tolerance beyond the orientation sign already baked into the
    /// model's loop-use windings.
    pub fn new() -> Self {
        Self
    }

    /// Triangulate every OT_SAME face of a shell, in parallel across
    /// faces, and merge the results into one mesh.
    pub fn triangulate_shell(&self, model: &Model, shell: ShellId) -> TessResult<Mesh> {
        let faceuses = model.shell_faceuses(shell).to_vec();
        let meshes: Vec<Mesh> = faceuses
            .par_iter()
            .map(|&fu| self.triangulate_faceuse(model, fu))
            .collect::<Result<_, _>>()?;
        let mut out = Mesh::new();
        for mesh in meshes {
            out.extend(mesh);
        }
        Ok(out)
    }

    /// Triangulate a single face-use into its own mesh.
    pub fn triangulate_faceuse(&self, model: &Model, fu: FaceUseId) -> TessResult<Mesh> {
        let face = model.faceuse_face(fu);
        let plane = model.face_plane(face);
        let normal = model.face_normal(fu);
        let loopuses = model.faceuse_loopuses(fu);

        let mut rings: Vec<Vec<VertexId>> = Vec::with_capacity(loopuses.len());
        for &lu in loopuses {
            let eus = model
                .loopuse_edgeuses(lu)
                .ok_or(TessError::DegenerateLoop(face))?;
            if eus.len() < 3 {
                return Err(TessError::DegenerateLoop(face));
            }
            rings.push(eus.iter().map(|&eu| model.edgeuse_start_vertex(eu)).collect());
        }
        let Some((outer, holes)) = rings.split_first() else {
            return Err(TessError::DegenerateLoop(face));
        };

        let (u_axis, v_axis) = plane.basis_vectors();
        let origin = plane.origin();
        let mut coords: HashMap<VertexId, (f64, f64)> = HashMap::new();
        for &v in outer.iter().chain(holes.iter().flatten()) {
            let p = model.vertex_point(v) - origin;
            coords.insert(v, (p.dot(&u_axis), p.dot(&v_axis)));
        }

        let mut ring = outer.clone();
        for hole in holes {
            bridge_hole(&mut ring, hole, &coords);
        }

        let triangles = ear_clip(&ring, &coords).ok_or(TessError::TriangulationFailed(face, ring.len()))?;

        let mut mesh = Mesh::new();
        let mut index_of = HashMap::new();
        for [a, b, c] in &triangles {
            let mut idx = [0u32; 3];
            for (slot, v) in idx.iter_mut().zip([a, b, c]) {
                *slot = *index_of.entry(*v).or_insert_with(|| {
                    mesh.push_vertex(Vertex {
                        position: model.vertex_point(*v),
                        normal,
                    })
                });
            }
            mesh.push_triangle(idx, face);
        }
        Ok(mesh)
    }

    /// Triangulate every shell of every region in `model`, in place: each
    /// face's loop system is rewritten so every remaining loop is a single
    /// triangle, rather than emitting a side [`Mesh`]. Idempotent — a
    /// face that is already a holeless triangle is left untouched (same
    /// `FaceId`, same vertices), so triangulating an already-triangulated
    /// model is a no-op.
    pub fn triangulate_model_in_place(&self, model: &mut Model) -> TessResult<()> {
        let regions = model.regions().to_vec();
        for region in regions {
            self.triangulate_region_in_place(model, region)?;
        }
        Ok(())
    }

    /// Triangulate every shell of `region` in place.
    pub fn triangulate_region_in_place(&self, model: &mut Model, region: RegionId) -> TessResult<()> {
        let shells = model.region_shells(region).to_vec();
        for shell in shells {
            self.triangulate_shell_in_place(model, shell)?;
        }
        Ok(())
    }

    /// Triangulate every OT_SAME face-use of `shell` in place.
    pub fn triangulate_shell_in_place(&self, model: &mut Model, shell: ShellId) -> TessResult<()> {
        let faceuses = model.shell_faceuses(shell).to_vec();
        for fu in faceuses {
            self.triangulate_faceuse_in_place(model, fu)?;
        }
        Ok(())
    }

    /// Rebuild a single face-use's loop system in place as one or more
    /// triangular loops of the same face, returning the `FaceId`s of the
    /// resulting triangle faces (a single-element vector containing the
    /// original face if it was already a holeless triangle).
    ///
    /// New triangle faces are built *before* the original face-use is
    /// killed, so their shared vertices stay referenced throughout and
    /// are never transiently freed out from under them.
    pub fn triangulate_faceuse_in_place(&self, model: &mut Model, fu: FaceUseId) -> TessResult<Vec<FaceId>> {
        let face = model.faceuse_face(fu);
        let shell = model.faceuse_shell(fu);
        let plane = model.face_plane(face);
        let loopuses = model.faceuse_loopuses(fu).to_vec();

        let mut rings: Vec<Vec<VertexId>> = Vec::with_capacity(loopuses.len());
        for lu in loopuses {
            let eus = model
                .loopuse_edgeuses(lu)
                .ok_or(TessError::DegenerateLoop(face))?;
            if eus.len() < 3 {
                return Err(TessError::DegenerateLoop(face));
            }
            rings.push(eus.iter().map(|&eu| model.edgeuse_start_vertex(eu)).collect());
        }
        let Some((outer, holes)) = rings.split_first() else {
            return Err(TessError::DegenerateLoop(face));
        };

        if holes.is_empty() && outer.len() == 3 {
            return Ok(vec![face]);
        }

        let (u_axis, v_axis) = plane.basis_vectors();
        let origin = plane.origin();
        let mut coords: HashMap<VertexId, (f64, f64)> = HashMap::new();
        for &v in outer.iter().chain(holes.iter().flatten()) {
            let p = model.vertex_point(v) - origin;
            coords.insert(v, (p.dot(&u_axis), p.dot(&v_axis)));
        }

        let mut ring = outer.clone();
        for hole in holes {
            bridge_hole(&mut ring, hole, &coords);
        }

        let triangles = ear_clip(&ring, &coords).ok_or(TessError::TriangulationFailed(face, ring.len()))?;

        let mut new_faces = Vec::with_capacity(triangles.len());
        for [a, b, c] in &triangles {
            new_faces.push(model.make_face_from_loop(shell, &[*a, *b, *c])?);
        }
        model.kill_faceuse(fu)?;
        Ok(new_faces)
    }
}

/// Splice `hole` into `ring` by connecting the hole's rightmost vertex to
/// its nearest ring vertex, duplicating both endpoints so the combined
/// sequence is one simple polygon. Uses nearest-vertex rather than full
/// visibility testing against every other hole.
fn bridge_hole(ring: &mut Vec<VertexId>, hole: &[VertexId], coords: &HashMap<VertexId, (f64, f64)>) {
    let hole_idx = hole
        .iter()
        .enumerate()
        .max_by(|(_, &a), (_, &b)| coords[&a].0.partial_cmp(&coords[&b].0).unwrap())
        .map(|(i, _)| i)
        .unwrap_or(0);
    let hole_vertex = hole[hole_idx];

    let bridge_at = ring
        .iter()
        .enumerate()
        .min_by(|(_, &a), (_, &b)| dist2(coords[&a], coords[&hole_vertex])
            .partial_cmp(&dist2(coords[&b], coords[&hole_vertex]))
            .unwrap())
        .map(|(i, _)| i)
        .unwrap_or(0);

    let mut spliced = Vec::with_capacity(ring.len() + hole.len() + 2);
    spliced.extend_from_slice(&ring[..=bridge_at]);
    spliced.extend(hole[hole_idx..].iter().chain(hole[..hole_idx].iter()).copied());
    spliced.push(hole_vertex);
    spliced.push(ring[bridge_at]);
    spliced.extend_from_slice(&ring[bridge_at + 1..]);
    *ring = spliced;
}

fn dist2(a: (f64, f64), b: (f64, f64)) -> f64 {
    let (dx, dy) = (a.0 - b.0, a.1 - b.1);
    dx * dx + dy * dy
}

fn cross2(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> f64 {
    (b.0 - a.0) * (c.1 - a.1) - (b.1 - a.1) * (c.0 - a.0)
}

fn point_in_triangle(p: (f64, f64), a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> bool {
    let d1 = cross2(a, b, p);
    let d2 = cross2(b, c, p);
    let d3 = cross2(c, a, p);
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}

/// Standard O(n^2) ear clipping over a simple, counter-clockwise ring.
/// Returns `None` if a complete ear could not be found before the
/// remaining polygon had collapsed below a triangle, which signals a
/// non-simple (self-crossing) input ring.
fn ear_clip(ring: &[VertexId], coords: &HashMap<VertexId, (f64, f64)>) -> Option<Vec<[VertexId; 3]>> {
    let mut idx: Vec<usize> = (0..ring.len()).collect();
    let mut triangles = Vec::new();

    while idx.len() > 3 {
        let n = idx.len();
        let mut clipped = false;
        for i in 0..n {
            let i_prev = idx[(i + n - 1) % n];
            let i_cur = idx[i];
            let i_next = idx[(i + 1) % n];
            let a = coords[&ring[i_prev]];
            let b = coords[&ring[i_cur]];
            let c = coords[&ring[i_next]];
            if cross2(a, b, c) <= 0.0 {
                continue;
            }
            let is_ear = idx
                .iter()
                .copied()
                .filter(|&j| j != i_prev && j != i_cur && j != i_next)
                .all(|j| !point_in_triangle(coords[&ring[j]], a, b, c));
            if is_ear {
                triangles.push([ring[i_prev], ring[i_cur], ring[i_next]]);
                idx.remove(i);
                clipped = true;
                break;
            }
        }
        if !clipped {
            return None;
        }
    }
    if idx.len() == 3 {
        triangles.push([ring[idx[0]], ring[idx[1]], ring[idx[2]]]);
    }
    Some(triangles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nmg_math::Point3;

    #[test]
    fn test_triangulate_unit_square() {
        let mut model = Model::default();
        let region = model.nmg_mr();
        let shell = model.nmg_ms(region).unwrap();
        let v0 = model.make_vertex(Point3::new(0.0, 0.0, 0.0));
        let v1 = model.make_vertex(Point3::new(1.0, 0.0, 0.0));
        let v2 = model.make_vertex(Point3::new(1.0, 1.0, 0.0));
        let v3 = model.make_vertex(Point3::new(0.0, 1.0, 0.0));
        model.make_face_from_loop(shell, &[v0, v1, v2, v3]).unwrap();

        let tess = Triangulator::new();
        let mesh = tess.triangulate_shell(&model, shell).unwrap();
        assert_eq!(mesh.triangles.len(), 2);
    }

    #[test]
    fn test_triangulate_square_with_hole() {
        let mut model = Model::default();
        let region = model.nmg_mr();
        let shell = model.nmg_ms(region).unwrap();
        let v0 = model.make_vertex(Point3::new(0.0, 0.0, 0.0));
        let v1 = model.make_vertex(Point3::new(4.0, 0.0, 0.0));
        let v2 = model.make_vertex(Point3::new(4.0, 4.0, 0.0));
        let v3 = model.make_vertex(Point3::new(0.0, 4.0, 0.0));
        let face = model.make_face_from_loop(shell, &[v0, v1, v2, v3]).unwrap();

        let h0 = model.make_vertex(Point3::new(1.0, 1.0, 0.0));
        let h1 = model.make_vertex(Point3::new(1.0, 2.0, 0.0));
        let h2 = model.make_vertex(Point3::new(2.0, 2.0, 0.0));
        let h3 = model.make_vertex(Point3::new(2.0, 1.0, 0.0));
        model.add_hole_to_face(face, &[h3, h2, h1, h0]).unwrap();

        let tess = Triangulator::new();
        let mesh = tess.triangulate_shell(&model, shell).unwrap();
        // 4-sided outer ring plus 4-sided hole bridged into one 10-vertex
        // simple polygon triangulates into 8 triangles.
        assert_eq!(mesh.triangles.len(), 8);
    }

    #[test]
    fn test_triangulate_model_in_place_rewrites_square_into_triangles() {
        let mut model = Model::default();
        let region = model.nmg_mr();
        let shell = model.nmg_ms(region).unwrap();
        let v0 = model.make_vertex(Point3::new(0.0, 0.0, 0.0));
        let v1 = model.make_vertex(Point3::new(1.0, 0.0, 0.0));
        let v2 = model.make_vertex(Point3::new(1.0, 1.0, 0.0));
        let v3 = model.make_vertex(Point3::new(0.0, 1.0, 0.0));
        model.make_face_from_loop(shell, &[v0, v1, v2, v3]).unwrap();

        let tess = Triangulator::new();
        tess.triangulate_model_in_place(&mut model).unwrap();

        let faceuses = model.shell_faceuses(shell);
        assert_eq!(faceuses.len(), 2);
        for &fu in faceuses {
            let loopuses = model.faceuse_loopuses(fu);
            assert_eq!(loopuses.len(), 1);
            let eus = model.loopuse_edgeuses(loopuses[0]).unwrap();
            assert_eq!(eus.len(), 3);
        }
    }

    #[test]
    fn test_triangulate_model_in_place_is_idempotent() {
        let mut model = Model::default();
        let region = model.nmg_mr();
        let shell = model.nmg_ms(region).unwrap();
        let v0 = model.make_vertex(Point3::new(0.0, 0.0, 0.0));
        let v1 = model.make_vertex(Point3::new(4.0, 0.0, 0.0));
        let v2 = model.make_vertex(Point3::new(4.0, 4.0, 0.0));
        let v3 = model.make_vertex(Point3::new(0.0, 4.0, 0.0));
        let face = model.make_face_from_loop(shell, &[v0, v1, v2, v3]).unwrap();
        let h0 = model.make_vertex(Point3::new(1.0, 1.0, 0.0));
        let h1 = model.make_vertex(Point3::new(1.0, 2.0, 0.0));
        let h2 = model.make_vertex(Point3::new(2.0, 2.0, 0.0));
        let h3 = model.make_vertex(Point3::new(2.0, 1.0, 0.0));
        model.add_hole_to_face(face, &[h3, h2, h1, h0]).unwrap();

        let tess = Triangulator::new();
        tess.triangulate_model_in_place(&mut model).unwrap();
        let after_first: Vec<FaceId> = model.shell_faceuses(shell).iter().map(|&fu| model.faceuse_face(fu)).collect();

        tess.triangulate_model_in_place(&mut model).unwrap();
        let after_second: Vec<FaceId> = model.shell_faceuses(shell).iter().map(|&fu| model.faceuse_face(fu)).collect();

        assert_eq!(after_first, after_second);
        for &fu in model.shell_faceuses(shell) {
            let loopuses = model.faceuse_loopuses(fu);
            assert_eq!(loopuses.len(), 1);
            assert_eq!(model.loopuse_edgeuses(loopuses[0]).unwrap().len(), 3);
        }
    }
}
