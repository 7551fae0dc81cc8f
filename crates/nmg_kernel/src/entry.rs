//! Direct entry points: the lower-level operations exposed for testing
//! and bespoke callers who don't want the full tree walker.

use crate::error::KernelResult;
use nmg_math::Tolerance;
use nmg_ops::{BooleanEvaluator, BooleanOp};
use nmg_tess::{Mesh, Triangulator};
use nmg_topo::{Model, RegionId, ShellId};

/// `shell_a OP shell_b`, both already in `model`. Consumes both input
/// shells and returns the freshly built result shell.
pub fn boolean(
    model: &mut Model,
    op: BooleanOp,
    shell_a: ShellId,
    shell_b: ShellId,
    tol: &Tolerance,
) -> KernelResult<ShellId> {
    Ok(BooleanEvaluator::new(*tol).evaluate(model, shell_a, shell_b, op)?)
}

/// Split a shell into its maximal connected components.
pub fn decompose(model: &mut Model, region: RegionId, shell: ShellId) -> KernelResult<Vec<ShellId>> {
    Ok(nmg_ops::decompose_shell(model, region, shell)?)
}

/// Remove degenerate crack loop-uses from a shell. Returns `true` if
/// anything changed.
pub fn kill_cracks(model: &mut Model, shell: ShellId, tol: &Tolerance) -> KernelResult<bool> {
    let changed = nmg_ops::kill_cracks(model, shell, tol)?;
    Ok(changed > 0)
}

/// Remove zero-length ring edge-uses from every shell in the model.
/// Returns `true` if anything changed.
pub fn kill_zero_len_eus(model: &mut Model, tol: &Tolerance) -> KernelResult<bool> {
    let shells: Vec<ShellId> = model
        .regions()
        .iter()
        .flat_map(|&r| model.region_shells(r).to_vec())
        .collect();
    let mut changed = false;
    for shell in shells {
        if nmg_ops::kill_zero_len_eus(model, shell, tol)? > 0 {
            changed = true;
        }
    }
    Ok(changed)
}

/// Triangulate every shell of every region in the model into one mesh,
/// without touching the model's own topology.
pub fn triangulate_model(model: &Model, _tol: &Tolerance) -> KernelResult<Mesh> {
    let tess = Triangulator::new();
    let mut out = Mesh::new();
    for &region in model.regions() {
        for &shell in model.region_shells(region) {
            out.extend(tess.triangulate_shell(model, shell)?);
        }
    }
    Ok(out)
}

/// Triangulate every shell of every region in the model in place: each
/// face's loop system is rewritten into one or more triangular faces of
/// the same face-use orientation. Idempotent, since an already-triangular
/// holeless face is left untouched.
pub fn triangulate_model_in_place(model: &mut Model, _tol: &Tolerance) -> KernelResult<()> {
    let tess = Triangulator::new();
    Ok(tess.triangulate_model_in_place(model)?)
}

/// Classify every shell of a region as void or external. Returns
/// `(shell, is_void)` pairs in shell storage order.
pub fn find_void_shells(
    model: &mut Model,
    region: RegionId,
    tol: &Tolerance,
) -> Vec<(ShellId, bool)> {
    model
        .region_shells(region)
        .to_vec()
        .into_iter()
        .map(|shell| {
            let is_void = nmg_ops::is_void_shell(model, shell, tol);
            (shell, is_void)
        })
        .collect()
}

/// Associate each void shell of `region` with the external shell whose
/// bounding box contains it, breaking any multi-way contention by
/// smallest-volume-first (see the crate's design notes on the source's
/// non-deterministic first-visited rule). Thin wrapper over
/// `nmg_ops::assoc_void_shells`, which `find_void_shells`'s `marks` is
/// redundant with once both walk `region_shells` themselves.
pub fn assoc_void_shells(
    model: &mut Model,
    region: RegionId,
    tol: &Tolerance,
) -> Vec<(ShellId, ShellId)> {
    nmg_ops::assoc_void_shells(model, region, tol)
}

/// Merge a void shell into its containing external shell, preserving
/// the void's boundary as OT_OPPOSITE loops of the merged shell.
pub fn merge_shells(model: &mut Model, ext: ShellId, void: ShellId) -> KernelResult<()> {
    model.merge_shell_into(ext, void)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nmg_math::Point3;

    fn cube(model: &mut Model, shell: ShellId, origin: (f64, f64, f64)) {
        let (ox, oy, oz) = origin;
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
        .map(|&(x, y, z)| model.make_vertex(Point3::new(x + ox, y + oy, z + oz)))
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
    }

    #[test]
    fn test_boolean_union_then_triangulate() {
        let mut model = Model::default();
        let region = model.nmg_mr();
        let shell_a = model.nmg_ms(region).unwrap();
        cube(&mut model, shell_a, (0.0, 0.0, 0.0));
        let shell_b = model.nmg_ms(region).unwrap();
        cube(&mut model, shell_b, (2.0, 0.0, 0.0));

        let tol = Tolerance::DEFAULT;
        let result = boolean(&mut model, BooleanOp::Union, shell_a, shell_b, &tol).unwrap();
        let mesh = triangulate_model(&model, &tol).unwrap();
        assert!(!mesh.triangles.is_empty());
        let _ = result;
    }

    #[test]
    fn test_decompose_two_disjoint_cubes() {
        let mut model = Model::default();
        let region = model.nmg_mr();
        let shell = model.nmg_ms(region).unwrap();
        cube(&mut model, shell, (0.0, 0.0, 0.0));
        cube(&mut model, shell, (5.0, 0.0, 0.0));

        let parts = decompose(&mut model, region, shell).unwrap();
        assert_eq!(parts.len(), 2);
    }
}
