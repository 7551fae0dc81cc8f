//! The NMG boundary-representation kernel: a facade over the topology
//! store, Boolean evaluator, cleanup pipeline, triangulator, and the CSG
//! tree walker that ties them together.
//!
//! ## Modules
//!
//! - [`nmg_math`]: tolerance-governed geometric primitives.
//! - [`nmg_topo`]: the arena-backed B-rep topology store (`Model`).
//! - [`nmg_ops`]: Boolean evaluation and structural cleanup.
//! - [`nmg_tess`]: ear-clipping triangulation and patch walking.
//! - [`nmg_check`]: structural invariant checking.
//! - [`tree`], [`entry`], [`context`]: the CSG tree walker, direct entry
//!   points, and the `Context`/`Stats` bundle passed through both.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod context;
pub mod entry;
mod error;
pub mod tree;

pub use nmg_check;
pub use nmg_math;
pub use nmg_ops;
pub use nmg_tess;
pub use nmg_topo;

pub use context::{Context, LogGate, Stats, StatsSnapshot};
pub use entry::{
    assoc_void_shells, boolean, decompose, find_void_shells, kill_cracks, kill_zero_len_eus,
    merge_shells, triangulate_model, triangulate_model_in_place,
};
pub use error::{KernelError, KernelResult};
pub use tree::{walk_database, walk_tree, CsgTree, DatabaseReader, PrimitiveTessellator, RegionSink};

/// Version of the NMG kernel.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get the kernel version string.
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
