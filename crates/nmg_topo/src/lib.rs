//! Non-manifold boundary-representation topology store.
//!
//! A [`Model`] is an arena of regions, shells, faces, loops, edges and
//! vertices, each wrapped in an oriented "use" record (face-use, loop-use,
//! edge-use, vertex-use) the way a winged-edge structure needs to represent
//! a face seen from two sides or an edge shared by more than two faces.
//! Edge-uses sharing an edge are linked in a circular radial chain;
//! face-uses, loop-uses and edge-uses each have a mate with the opposite
//! orientation. This crate only builds and mutates that graph — Boolean
//! evaluation, cleanup, and tessellation live in the crates built on top
//! of it.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

mod entity;
mod error;
mod model;

pub use entity::{
    AnyId, EdgeId, EdgeUseId, EdgeUseParent, FaceId, FaceUseId, LoopId, LoopKind, LoopUseId,
    Orientation, RegionId, ShellId, VertexId, VertexUseId, VertexUseParent,
};
pub use error::{TopoError, TopoResult};
pub use model::{make_model, Model};
