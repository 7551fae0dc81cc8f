//! Structural invariant checking over an [`nmg_topo::Model`].
//!
//! Unlike geometric validation (self-intersection, gaps, degenerate
//! facets — the concern of a format-specific or tessellation-stage
//! checker), this crate verifies the topology store's own bookkeeping:
//! that mates are involutions, radial chains close, loop-use rings have
//! at least three edge-uses, shell/face-use back-references agree, and
//! bounding boxes nest face-in-shell-in-region.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

use nmg_math::Tolerance;
use nmg_topo::{EdgeUseId, FaceId, FaceUseId, LoopKind, LoopUseId, Model, RegionId, ShellId};

/// One broken structural invariant.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Invariant {
    /// `eu.mate.mate != eu`.
    #[error("edge-use {0:?} is not its own mate's mate")]
    EdgeUseMateNotInvolutive(EdgeUseId),
    /// `lu.mate.mate != lu`.
    #[error("loop-use {0:?} is not its own mate's mate")]
    LoopUseMateNotInvolutive(LoopUseId),
    /// `fu.mate.mate != fu`.
    #[error("face-use {0:?} is not its own mate's mate")]
    FaceUseMateNotInvolutive(FaceUseId),
    /// Walking `radial_next` `radial_len` times from an edge-use did not
    /// return to it.
    #[error("edge-use {0:?}'s radial chain does not close after {1} steps")]
    RadialChainNotClosed(EdgeUseId, usize),
    /// `radial_next(radial_prev(eu)) != eu`.
    #[error("edge-use {0:?}'s radial_next/radial_prev are inconsistent")]
    RadialLinksInconsistent(EdgeUseId),
    /// A ring loop-use had fewer than three edge-uses.
    #[error("loop-use {0:?} has a ring of only {1} edge-use(s)")]
    LoopRingTooShort(LoopUseId, usize),
    /// A face-use's `shell` back-reference does not match the shell it
    /// is actually stored under.
    #[error("face-use {0:?} claims shell {1:?} but is stored under {2:?}")]
    ShellBoundaryMismatch(FaceUseId, ShellId, ShellId),
    /// A face's bounding box is not enclosed by its shell's.
    #[error("face {0:?}'s bbox is not enclosed by shell {1:?}'s bbox")]
    FaceBboxNotEnclosed(FaceId, ShellId),
    /// A shell's bounding box is not enclosed by its region's.
    #[error("shell {0:?}'s bbox is not enclosed by region {1:?}'s bbox")]
    ShellBboxNotEnclosed(ShellId, RegionId),
}

/// Accumulated invariant violations from one [`check_model`] pass.
#[derive(Debug, Clone, Default)]
pub struct CheckReport {
    /// Every invariant violation found, in traversal order.
    pub violations: Vec<Invariant>,
}

impl CheckReport {
    /// An empty, passing report.
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` iff no invariant was violated.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    fn push(&mut self, v: Invariant) {
        self.violations.push(v);
    }
}

/// Runs every structural invariant check over the whole model.
///
/// Bbox checks require `&mut Model` because [`Model::face_bbox`] and
/// friends lazily compute and cache their result.
pub fn check_model(model: &mut Model, tol: &Tolerance) -> CheckReport {
    let mut report = CheckReport::new();
    check_mates(model, &mut report);
    check_radial_chains(model, &mut report);
    check_loop_rings(model, &mut report);
    check_shell_boundaries(model, &mut report);
    check_bbox_enclosure(model, tol, &mut report);
    report
}

fn all_edgeuses(model: &Model) -> Vec<EdgeUseId> {
    let mut out = Vec::new();
    for &region in model.regions() {
        for &shell in model.region_shells(region) {
            for &fu in model.shell_faceuses(shell) {
                for &lu in model.faceuse_loopuses(fu) {
                    if let Some(eus) = model.loopuse_edgeuses(lu) {
                        out.extend_from_slice(eus);
                    }
                }
            }
            out.extend_from_slice(model.shell_wire_edgeuses(shell));
        }
    }
    out
}

fn check_mates(model: &Model, report: &mut CheckReport) {
    for eu in all_edgeuses(model) {
        let mate = model.edgeuse_mate(eu);
        if model.edgeuse_mate(mate) != eu {
            report.push(Invariant::EdgeUseMateNotInvolutive(eu));
        }
    }
    for &region in model.regions() {
        for &shell in model.region_shells(region) {
            for &fu in model.shell_faceuses(shell) {
                let mate = model.faceuse_mate(fu);
                if model.faceuse_mate(mate) != fu {
                    report.push(Invariant::FaceUseMateNotInvolutive(fu));
                }
                for &lu in model.faceuse_loopuses(fu) {
                    let mate = model.loopuse_mate(lu);
                    if model.loopuse_mate(mate) != lu {
                        report.push(Invariant::LoopUseMateNotInvolutive(lu));
                    }
                }
            }
        }
    }
}

fn check_radial_chains(model: &Model, report: &mut CheckReport) {
    for eu in all_edgeuses(model) {
        let len = model.radial_len(eu);
        let mut cur = eu;
        for _ in 0..len {
            cur = model.edgeuse_radial_next(cur);
        }
        if cur != eu {
            report.push(Invariant::RadialChainNotClosed(eu, len));
        }
        let prev = model.edgeuse_radial_prev(eu);
        if model.edgeuse_radial_next(prev) != eu {
            report.push(Invariant::RadialLinksInconsistent(eu));
        }
    }
}

fn check_loop_rings(model: &Model, report: &mut CheckReport) {
    for &region in model.regions() {
        for &shell in model.region_shells(region) {
            for &fu in model.shell_faceuses(shell) {
                for &lu in model.faceuse_loopuses(fu) {
                    if let LoopKind::Ring(eus) = model.loopuse_kind(lu) {
                        if eus.len() < 3 {
                            report.push(Invariant::LoopRingTooShort(lu, eus.len()));
                        }
                    }
                }
            }
        }
    }
}

fn check_shell_boundaries(model: &Model, report: &mut CheckReport) {
    for &region in model.regions() {
        for &shell in model.region_shells(region) {
            for &fu in model.shell_faceuses(shell) {
                let claimed = model.faceuse_shell(fu);
                if claimed != shell {
                    report.push(Invariant::ShellBoundaryMismatch(fu, claimed, shell));
                }
            }
        }
    }
}

fn check_bbox_enclosure(model: &mut Model, tol: &Tolerance, report: &mut CheckReport) {
    let regions = model.regions().to_vec();
    for region in regions {
        let region_bbox = model.region_bbox(region, tol);
        let shells = model.region_shells(region).to_vec();
        for shell in shells {
            let shell_bbox = model.shell_bbox(shell, tol);
            if !region_bbox.contains_bbox(&shell_bbox) {
                report.push(Invariant::ShellBboxNotEnclosed(shell, region));
            }
            let faceuses = model.shell_faceuses(shell).to_vec();
            for fu in faceuses {
                let face = model.faceuse_face(fu);
                let face_bbox = model.face_bbox(face, tol);
                if !shell_bbox.contains_bbox(&face_bbox) {
                    report.push(Invariant::FaceBboxNotEnclosed(face, shell));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nmg_math::Point3;

    fn cube() -> Model {
        let mut model = Model::default();
        let region = model.nmg_mr();
        let shell = model.nmg_ms(region).unwrap();
        let verts: Vec<_> = [
            (0.0, 0.0, 0.0),
            (1.0, 0.0, 0.0),
            (1.0, 1.0, 0.0),
            (0.0, 1.0, 0.0),
            (0.0, 0.0, 1.0),
            (1.0, 0.0, 1.0),
            (1.0, 1.0, 1.0),
            (0.0, 1.0, 1.0),
        ]
        .iter()
        .map(|&(x, y, z)| model.make_vertex(Point3::new(x, y, z)))
        .collect();
        let faces = [
            [0, 3, 2, 1],
            [4, 5, 6, 7],
            [0, 1, 5, 4],
            [1, 2, 6, 5],
            [2, 3, 7, 6],
            [3, 0, 4, 7],
        ];
        for f in faces {
            let v: Vec<_> = f.iter().map(|&i| verts[i]).collect();
            model.make_face_from_loop(shell, &v).unwrap();
        }
        model
    }

    #[test]
    fn test_cube_has_no_violations() {
        let mut model = cube();
        let report = check_model(&mut model, &Tolerance::DEFAULT);
        assert!(report.is_valid(), "{:?}", report.violations);
    }

    #[test]
    fn test_degenerate_loop_is_rejected_at_construction() {
        let mut model = Model::default();
        let region = model.nmg_mr();
        let shell = model.nmg_ms(region).unwrap();
        let v0 = model.make_vertex(Point3::new(0.0, 0.0, 0.0));
        let v1 = model.make_vertex(Point3::new(1.0, 0.0, 0.0));
        assert!(model.make_face_from_loop(shell, &[v0, v1]).is_err());
    }
}
