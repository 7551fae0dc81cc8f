//! Boolean evaluation and topological cleanup over an [`nmg_topo::Model`].
//!
//! This crate is the layer above the raw topology store: it fuses two
//! shells' coincident boundaries, classifies and culls faces under a
//! Boolean operation's truth table, stitches the kept faces into a
//! result shell, and cleans up the aftermath (cracks, zero-length
//! edge-uses, disconnected shell components, void/external shells).

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod boolean;
pub mod cleanup;
mod error;
pub mod split;

pub use boolean::{BooleanEvaluator, BooleanOp, FaceClass};
pub use cleanup::{
    assoc_void_shells, decompose_shell, is_void_shell, kill_cracks, kill_zero_len_eus,
    merge_voids_into_externals,
};
pub use error::{OpsError, OpsResult};
pub use split::split_faces;
