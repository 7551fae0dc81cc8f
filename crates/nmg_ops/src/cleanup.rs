//! Topological cleanup: kill cracks, kill zero-length edge-uses, shell
//! decomposition, and void/external classification.
//!
//! The Boolean evaluator's stitch stage rebuilds faces from scratch, so a
//! result shell never ends up with a genuine crack or zero-length
//! edge-use on its own; cleanup still matters for models handed in from
//! elsewhere (a CSG tree walker's leaf tessellation, or a future format
//! reader) that may not uphold those invariants.

use crate::OpsResult;
use nmg_math::Tolerance;
use nmg_topo::{FaceUseId, Model, RegionId, ShellId};

/// Remove zero-length edge-uses (both endpoints of the edge-use coincide
/// within tolerance) from every face-use of `shell`. A crack collapses to
/// nothing once its two bounding vertices are recognized as one.
pub fn kill_zero_len_eus(model: &mut Model, shell: ShellId, tol: &Tolerance) -> OpsResult<usize> {
    let mut killed = 0;
    loop {
        let Some((fu, lu, eu)) = find_zero_len_eu(model, shell, tol) else {
            break;
        };
        let _ = (fu, lu);
        match model.kill_zero_length_edgeuse(eu) {
            Ok(()) => killed += 1,
            Err(err) => {
                log::warn!("kill_zero_len_eus: leaving degenerate edge-use {eu:?}: {err}");
                break;
            }
        }
        if killed > 10_000 {
            log::warn!("kill_zero_len_eus: giving up after 10000 passes on {shell:?}");
            break;
        }
    }
    Ok(killed)
}

fn find_zero_len_eu(
    model: &Model,
    shell: ShellId,
    tol: &Tolerance,
) -> Option<(FaceUseId, nmg_topo::LoopUseId, nmg_topo::EdgeUseId)> {
    for &fu in model.shell_faceuses(shell) {
        for &lu in model.faceuse_loopuses(fu) {
            let Some(eus) = model.loopuse_edgeuses(lu) else {
                continue;
            };
            for &eu in eus {
                let start = model.vertex_point(model.edgeuse_start_vertex(eu));
                let end = model.vertex_point(model.edgeuse_end_vertex(eu));
                if tol.coincident_sq(start.distance_squared_to(&end)) {
                    return Some((fu, lu, eu));
                }
            }
        }
    }
    None
}

/// Kill "cracks": a loop-use whose ring has degenerated to a dangling
/// sliver (two edge-uses tracing the same edge back and forth, the
/// zero-area case `kill_zero_len_eus` doesn't catch because neither
/// individual edge-use is itself zero-length). A degenerate hole loop-use
/// is excised on its own; a degenerate outer loop-use takes its whole
/// face-use down with it, which can in turn empty the shell.
///
/// Returns the number of loop-uses/face-uses removed. If `shell` itself
/// is left with no face-uses, the caller is responsible for killing it.
pub fn kill_cracks(model: &mut Model, shell: ShellId, tol: &Tolerance) -> OpsResult<usize> {
    let mut killed = 0;
    loop {
        let Some((fu, lu, is_outer)) = find_crack_loopuse(model, shell, tol) else {
            break;
        };
        if is_outer {
            match model.kill_faceuse(fu) {
                Ok(()) => killed += 1,
                Err(err) => {
                    log::warn!("kill_cracks: leaving degenerate face-use {fu:?}: {err}");
                    break;
                }
            }
        } else {
            match model.kill_loopuse(lu) {
                Ok(()) => killed += 1,
                Err(err) => {
                    log::warn!("kill_cracks: leaving degenerate loop-use {lu:?}: {err}");
                    break;
                }
            }
        }
        if model.shell_faceuses(shell).is_empty() {
            // Every face-use was a crack; nothing left in the shell to
            // re-scan. The caller decides whether to kill the now-empty
            // shell.
            break;
        }
        if killed > 10_000 {
            log::warn!("kill_cracks: giving up after 10000 passes on {shell:?}");
            break;
        }
    }
    Ok(killed)
}

fn find_crack_loopuse(
    model: &Model,
    shell: ShellId,
    tol: &Tolerance,
) -> Option<(FaceUseId, nmg_topo::LoopUseId, bool)> {
    for &fu in model.shell_faceuses(shell) {
        let loopuses = model.faceuse_loopuses(fu);
        for (i, &lu) in loopuses.iter().enumerate() {
            if model.loopuse_signed_area(lu).abs() <= tol.dist_sq {
                return Some((fu, lu, i == 0));
            }
        }
    }
    None
}

/// Split a shell's faces into maximal face-connected components (two
/// faces are connected if they share an edge), returning one new shell
/// per component beyond the first. The shell with the most faces keeps
/// the original `ShellId`.
pub fn decompose_shell(model: &mut Model, region: RegionId, shell: ShellId) -> OpsResult<Vec<ShellId>> {
    let faceuses = model.shell_faceuses(shell).to_vec();
    let mut components: Vec<Vec<FaceUseId>> = Vec::new();
    let mut assigned = std::collections::HashSet::new();

    for &seed in &faceuses {
        if assigned.contains(&seed) {
            continue;
        }
        let mut component = Vec::new();
        let mut stack = vec![seed];
        while let Some(fu) = stack.pop() {
            if !assigned.insert(fu) {
                continue;
            }
            component.push(fu);
            for &lu in model.faceuse_loopuses(fu) {
                let Some(eus) = model.loopuse_edgeuses(lu) else {
                    continue;
                };
                for &eu in eus {
                    for radial in model.radial_chain(eu) {
                        if let nmg_topo::EdgeUseParent::LoopUse(other_lu) = model.edgeuse_parent(radial) {
                            let other_fu = model.loopuse_faceuse(other_lu);
                            if faceuses.contains(&other_fu) && !assigned.contains(&other_fu) {
                                stack.push(other_fu);
                            }
                        }
                    }
                }
            }
        }
        components.push(component);
    }

    if components.len() <= 1 {
        return Ok(vec![shell]);
    }

    components.sort_by_key(|c| std::cmp::Reverse(c.len()));
    let mut result = vec![shell];
    for component in &components[1..] {
        let new_shell = model.nmg_ms(region)?;
        for &fu in component {
            model.move_faceuse_to_shell(fu, new_shell)?;
        }
        result.push(new_shell);
        log::debug!(
            "decompose_shell: split {} faces into new shell {new_shell:?}",
            component.len()
        );
    }
    Ok(result)
}

/// Classify a shell as a void (its faces wind inward, enclosing empty
/// space cut out of a surrounding shell) or external (a normal outer
/// boundary), using the `find_top_face` heuristic: the face with the
/// greatest z-extent should have an outward (+Z-biased) normal for an
/// external shell and an inward (-Z-biased) normal for a void.
///
/// This tie-breaks on an arbitrary axis and is not rotation-invariant;
/// see DESIGN.md for why a full solid-angle computation was not used.
pub fn is_void_shell(model: &mut Model, shell: ShellId, tol: &Tolerance) -> bool {
    let Some(top_face) = model.find_top_face(shell, tol) else {
        return false;
    };
    let [fu_same, _] = model.face_faceuses(top_face);
    model.face_normal(fu_same).z() < 0.0
}

/// Associate each void shell in `region` with the external shell whose
/// bounding box contains it, breaking multi-way contention by
/// smallest-volume-first: a void nested inside two concentric externals
/// is claimed by the tighter-fitting one first. A void with no
/// containing external is left unpaired (it stays its own shell; the
/// model is non-manifold but that's a modeling error, not ours to hide).
pub fn assoc_void_shells(model: &mut Model, region: RegionId, tol: &Tolerance) -> Vec<(ShellId, ShellId)> {
    let shells = model.region_shells(region).to_vec();
    let mut voids = Vec::new();
    let mut externals = Vec::new();
    for &shell in &shells {
        if is_void_shell(model, shell, tol) {
            voids.push(shell);
        } else {
            externals.push(shell);
        }
    }

    voids.sort_by(|&a, &b| {
        let va = model.shell_bbox(a, tol).volume();
        let vb = model.shell_bbox(b, tol).volume();
        va.partial_cmp(&vb).unwrap()
    });

    let mut pairs = Vec::new();
    for void in voids {
        let void_bbox = model.shell_bbox(void, tol);
        if let Some(&ext) = externals
            .iter()
            .find(|&&ext| model.shell_bbox(ext, tol).contains_bbox(&void_bbox))
        {
            pairs.push((void, ext));
        } else {
            log::warn!("assoc_void_shells: void shell {void:?} has no containing external");
        }
    }
    pairs
}

/// Merge every void shell found in `region` into the external shell that
/// geometrically contains it (see [`assoc_void_shells`]), so a region
/// ends with at most one shell per disjoint solid even when it holds
/// several externals each owning their own cavity.
pub fn merge_voids_into_externals(model: &mut Model, region: RegionId, tol: &Tolerance) -> OpsResult<usize> {
    let pairs = assoc_void_shells(model, region, tol);
    let mut merged = 0;
    for (void, ext) in pairs {
        model.merge_shell_into(ext, void)?;
        merged += 1;
    }
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nmg_math::Point3;
    use nmg_topo::Model;

    fn unit_square(model: &mut Model, shell: ShellId, z: f64) -> nmg_topo::FaceId {
        let v0 = model.make_vertex(Point3::new(0.0, 0.0, z));
        let v1 = model.make_vertex(Point3::new(1.0, 0.0, z));
        let v2 = model.make_vertex(Point3::new(1.0, 1.0, z));
        let v3 = model.make_vertex(Point3::new(0.0, 1.0, z));
        model.make_face_from_loop(shell, &[v0, v1, v2, v3]).unwrap()
    }

    #[test]
    fn test_kill_zero_len_eus_no_op_on_clean_shell() {
        let mut model = Model::default();
        let tol = Tolerance::DEFAULT;
        let region = model.nmg_mr();
        let shell = model.nmg_ms(region).unwrap();
        unit_square(&mut model, shell, 0.0);
        let killed = kill_zero_len_eus(&mut model, shell, &tol).unwrap();
        assert_eq!(killed, 0);
    }

    #[test]
    fn test_decompose_shell_single_component_no_op() {
        let mut model = Model::default();
        let region = model.nmg_mr();
        let shell = model.nmg_ms(region).unwrap();
        unit_square(&mut model, shell, 0.0);
        let shells = decompose_shell(&mut model, region, shell).unwrap();
        assert_eq!(shells, vec![shell]);
    }

    #[test]
    fn test_merge_voids_into_externals_no_voids_is_noop() {
        let mut model = Model::default();
        let tol = Tolerance::DEFAULT;
        let region = model.nmg_mr();
        let shell = model.nmg_ms(region).unwrap();
        unit_square(&mut model, shell, 0.0);
        let merged = merge_voids_into_externals(&mut model, region, &tol).unwrap();
        assert_eq!(merged, 0);
    }

    #[test]
    fn test_kill_cracks_excises_degenerate_hole() {
        let mut model = Model::default();
        let tol = Tolerance::DEFAULT;
        let region = model.nmg_mr();
        let shell = model.nmg_ms(region).unwrap();
        let face = unit_square(&mut model, shell, 0.0);

        // A sliver hole: three nearly-coincident points, area well under
        // `tol.dist_sq`.
        let h0 = model.make_vertex(Point3::new(0.1, 0.1, 0.0));
        let h1 = model.make_vertex(Point3::new(0.100_000_01, 0.1, 0.0));
        let h2 = model.make_vertex(Point3::new(0.1, 0.100_000_01, 0.0));
        model.add_hole_to_face(face, &[h0, h1, h2]).unwrap();

        let [fu_same, _] = model.face_faceuses(face);
        assert_eq!(model.faceuse_loopuses(fu_same).len(), 2);

        let killed = kill_cracks(&mut model, shell, &tol).unwrap();
        assert_eq!(killed, 1);
        assert_eq!(model.faceuse_loopuses(fu_same).len(), 1);
        assert_eq!(model.shell_faceuses(shell).len(), 1);
    }

    #[test]
    fn test_kill_cracks_excises_degenerate_face() {
        let mut model = Model::default();
        // A looser tolerance than the kernel default: the sliver below
        // needs to clear `Plane::from_points`'s own collinearity
        // threshold (it would reject anything flatter) while still
        // registering as degenerate against `tol.dist_sq`.
        let tol = Tolerance::new(1e-2, 1e-6).unwrap();
        let region = model.nmg_mr();
        let shell = model.nmg_ms(region).unwrap();
        unit_square(&mut model, shell, 0.0);

        // A sliver face: three nearly-collinear points, area under
        // `tol.dist_sq` but not flat enough to be rejected as collinear.
        let s0 = model.make_vertex(Point3::new(5.0, 5.0, 0.0));
        let s1 = model.make_vertex(Point3::new(6.0, 5.0, 0.0));
        let s2 = model.make_vertex(Point3::new(5.0, 5.000_001, 0.0));
        model.make_face_from_loop(shell, &[s0, s1, s2]).unwrap();
        assert_eq!(model.shell_faceuses(shell).len(), 2);

        let killed = kill_cracks(&mut model, shell, &tol).unwrap();
        assert_eq!(killed, 1);
        assert_eq!(model.shell_faceuses(shell).len(), 1);
    }

    #[test]
    fn test_merge_voids_into_externals_pairs_by_containment() {
        let mut model = Model::default();
        let tol = Tolerance::DEFAULT;
        let region = model.nmg_mr();

        let ext_a = model.nmg_ms(region).unwrap();
        cube(&mut model, ext_a, (0.0, 0.0, 0.0), 10.0, false);
        let void_a = model.nmg_ms(region).unwrap();
        cube(&mut model, void_a, (2.0, 2.0, 2.0), 1.0, true);

        let ext_b = model.nmg_ms(region).unwrap();
        cube(&mut model, ext_b, (100.0, 0.0, 0.0), 10.0, false);
        let void_b = model.nmg_ms(region).unwrap();
        cube(&mut model, void_b, (102.0, 2.0, 2.0), 1.0, true);

        let merged = merge_voids_into_externals(&mut model, region, &tol).unwrap();
        assert_eq!(merged, 2);

        // Each external absorbed exactly its own nested void's 6 faces,
        // not the other external's.
        assert_eq!(model.shell_faceuses(ext_a).len(), 12);
        assert_eq!(model.shell_faceuses(ext_b).len(), 12);
        let shells = model.region_shells(region);
        assert!(!shells.contains(&void_a));
        assert!(!shells.contains(&void_b));
    }

    fn cube(model: &mut Model, shell: ShellId, origin: (f64, f64, f64), size: f64, inward: bool) {
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
        .map(|&(x, y, z)| model.make_vertex(Point3::new(x * size + ox, y * size + oy, z * size + oz)))
        .collect();
        let mut faces = [
            [0, 3, 2, 1],
            [4, 5, 6, 7],
            [0, 1, 5, 4],
            [1, 2, 6, 5],
            [2, 3, 7, 6],
            [3, 0, 4, 7],
        ];
        if inward {
            for f in &mut faces {
                f.reverse();
            }
        }
        for f in faces {
            let v: Vec<_> = f.iter().map(|&i| verts[i]).collect();
            model.make_face_from_loop(shell, &v).unwrap();
        }
    }
}
