//! Shell/loop patch walker: visits a shell's faces in a format-writer-
//! friendly order without itself knowing anything about the output
//! format. A "patch" is one face's outer boundary plus its holes,
//! already ordered for a fan/strip-oblivious consumer (vertex list per
//! ring, outer ring first).

use nmg_topo::{FaceUseId, Model, ShellId, VertexId};

/// One face's boundary, ready to hand to a format writer: the outer
/// ring followed by zero or more hole rings, each as a closed polygon
/// of vertices in traversal order.
#[derive(Debug, Clone)]
pub struct Patch {
    /// The face-use this patch was read from.
    pub faceuse: FaceUseId,
    /// Outer ring, then each hole ring.
    pub rings: Vec<Vec<VertexId>>,
}

impl Patch {
    /// The outer boundary ring (never empty for a well-formed patch).
    pub fn outer(&self) -> &[VertexId] {
        &self.rings[0]
    }

    /// The hole rings, if any.
    pub fn holes(&self) -> &[Vec<VertexId>] {
        &self.rings[1..]
    }
}

/// Walks a shell's OT_SAME faces in storage order, yielding one
/// [`Patch`] per face-use. Point loops (degenerate single-vertex
/// "loops") are skipped, since a format writer has nothing to emit for
/// them.
pub fn walk_shell_patches(model: &Model, shell: ShellId) -> Vec<Patch> {
    model
        .shell_faceuses(shell)
        .iter()
        .filter_map(|&fu| walk_faceuse_patch(model, fu))
        .collect()
}

/// Build the patch for a single face-use, or `None` if every loop-use
/// on it is a degenerate point loop.
pub fn walk_faceuse_patch(model: &Model, fu: FaceUseId) -> Option<Patch> {
    let rings: Vec<Vec<VertexId>> = model
        .faceuse_loopuses(fu)
        .iter()
        .filter_map(|&lu| model.loopuse_edgeuses(lu))
        .map(|eus| eus.iter().map(|&eu| model.edgeuse_start_vertex(eu)).collect())
        .collect();
    if rings.is_empty() {
        return None;
    }
    Some(Patch { faceuse: fu, rings })
}

#[cfg(test)]
mod tests {
    use super::*;
    use nmg_math::Point3;

    #[test]
    fn test_walk_shell_patches_visits_every_face() {
        let mut model = Model::default();
        let region = model.nmg_mr();
        let shell = model.nmg_ms(region).unwrap();
        let v0 = model.make_vertex(Point3::new(0.0, 0.0, 0.0));
        let v1 = model.make_vertex(Point3::new(1.0, 0.0, 0.0));
        let v2 = model.make_vertex(Point3::new(1.0, 1.0, 0.0));
        model.make_face_from_loop(shell, &[v0, v1, v2]).unwrap();

        let v3 = model.make_vertex(Point3::new(0.0, 0.0, 1.0));
        let v4 = model.make_vertex(Point3::new(1.0, 0.0, 1.0));
        let v5 = model.make_vertex(Point3::new(1.0, 1.0, 1.0));
        model.make_face_from_loop(shell, &[v3, v4, v5]).unwrap();

        let patches = walk_shell_patches(&model, shell);
        assert_eq!(patches.len(), 2);
        for patch in &patches {
            assert_eq!(patch.outer().len(), 3);
            assert!(patch.holes().is_empty());
        }
    }

    #[test]
    fn test_patch_separates_outer_from_holes() {
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

        let [fu, _] = model.face_faceuses(face);
        let patch = walk_faceuse_patch(&model, fu).unwrap();
        assert_eq!(patch.rings.len(), 2);
        assert_eq!(patch.outer().len(), 4);
        assert_eq!(patch.holes().len(), 1);
        assert_eq!(patch.holes()[0].len(), 4);
    }
}
