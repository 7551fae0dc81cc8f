//! The CSG tree walker: recursively tessellates leaves, evaluates
//! Boolean operators bottom-up, and runs the cleanup pipeline once per
//! region, with per-region fault isolation standing in for the source's
//! `setjmp`/`longjmp` checkpoints.

use crate::context::Context;
use crate::error::{KernelError, KernelResult};
use nmg_ops::{kill_cracks, merge_voids_into_externals, BooleanEvaluator, BooleanOp};
use nmg_topo::{Model, ShellId};

/// A CSG tree: leaves reference an opaque primitive id resolved by the
/// caller's [`PrimitiveTessellator`]; interior nodes are Boolean ops.
#[derive(Debug, Clone)]
pub enum CsgTree {
    /// A primitive leaf, keyed by a caller-defined opaque id.
    Leaf(u64),
    /// An interior Boolean node over two subtrees.
    Op(BooleanOp, Box<CsgTree>, Box<CsgTree>),
}

/// Produces an NMG region for a tree leaf. Implemented out-of-core by
/// whatever owns the primitive ray-intersection code.
pub trait PrimitiveTessellator {
    /// Tessellate `leaf` into a fresh shell of `model`, within `tol`/`ttol`.
    fn tessellate(
        &self,
        leaf: u64,
        model: &mut Model,
        ctx: &Context,
    ) -> Result<ShellId, String>;
}

/// Consumes one region's finished model once cleanup has run.
pub trait RegionSink {
    /// Called once per successfully converted, non-empty region.
    fn accept(&mut self, region_id: u64, model: &Model, shell: ShellId);
}

/// Provides the (region-id, tree) pairs to evaluate. The core treats
/// this as opaque — it never reads the underlying database itself.
pub trait DatabaseReader {
    /// Every region this reader knows about, in an implementation-defined
    /// but stable order.
    fn regions(&self) -> Vec<(u64, CsgTree)>;
}

/// Walk every region a [`DatabaseReader`] produces, delivering each
/// converted region to `sink`. Returns the final stats snapshot.
pub fn walk_database<T: PrimitiveTessellator, D: DatabaseReader, S: RegionSink>(
    db: &D,
    tessellator: &T,
    sink: &mut S,
    ctx: &Context,
) -> crate::context::StatsSnapshot {
    for (region_id, tree) in db.regions() {
        if ctx.is_cancelled() {
            break;
        }
        walk_tree(&tree, region_id, tessellator, sink, ctx);
    }
    ctx.stats.snapshot()
}

/// Evaluate a single region's tree and, if it converts, deliver it to
/// `sink`. A fresh, private [`Model`] is created per region so parallel
/// callers across regions need no synchronization on the topology store.
///
/// Any [`KernelError`] raised while evaluating the tree is the
/// region-boundary checkpoint: it is logged, the region is counted as
/// attempted-but-not-converted, and the partially built model is simply
/// dropped.
pub fn walk_tree<T: PrimitiveTessellator, S: RegionSink>(
    tree: &CsgTree,
    region_id: u64,
    tessellator: &T,
    sink: &mut S,
    ctx: &Context,
) {
    ctx.stats.record_tried();

    if ctx.is_cancelled() {
        log::debug!("region {region_id}: cancelled before evaluation");
        return;
    }

    let mut model = Model::default();
    match eval_node(tree, &mut model, tessellator, ctx) {
        Ok(shell) => match finish_region(&mut model, shell, ctx) {
            Ok(()) => {
                ctx.stats.record_converted();
                if !model.shell_is_empty(shell) {
                    sink.accept(region_id, &model, shell);
                    ctx.stats.record_written();
                }
            }
            Err(e) => log::warn!("region {region_id}: cleanup failed: {e}"),
        },
        Err(e) => log::warn!("region {region_id}: evaluation failed: {e}"),
    }
}

fn eval_node<T: PrimitiveTessellator>(
    node: &CsgTree,
    model: &mut Model,
    tessellator: &T,
    ctx: &Context,
) -> KernelResult<ShellId> {
    if ctx.is_cancelled() {
        return Err(KernelError::Cancelled);
    }
    match node {
        CsgTree::Leaf(leaf) => tessellator
            .tessellate(*leaf, model, ctx)
            .map_err(KernelError::Tessellation),
        CsgTree::Op(op, lhs, rhs) => {
            let shell_a = eval_node(lhs, model, tessellator, ctx)?;
            let shell_b = eval_node(rhs, model, tessellator, ctx)?;
            if ctx.is_cancelled() {
                return Err(KernelError::Cancelled);
            }
            let evaluator = BooleanEvaluator::new(ctx.tol);
            Ok(evaluator.evaluate(model, shell_a, shell_b, *op)?)
        }
    }
}

/// Run the cleanup pipeline on a freshly evaluated region's shell:
/// crack removal then void/external merge within its region.
fn finish_region(model: &mut Model, shell: ShellId, ctx: &Context) -> KernelResult<()> {
    kill_cracks(model, shell, &ctx.tol)?;
    let region = model.shell_region(shell);
    merge_voids_into_externals(model, region, &ctx.tol)?;
    Ok(())
}
