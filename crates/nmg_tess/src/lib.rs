//! Triangulation and patch-walking over an [`nmg_topo::Model`].
//!
//! This crate turns a shell's faces into two different
//! format-writer-ready shapes: a flat triangle [`Mesh`] via ear clipping
//! with hole bridging, or an ordered sequence of [`Patch`]es (outer ring
//! plus holes, untriangulated) for writers that want polygons rather
//! than triangles.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

mod error;
mod mesh;
mod triangulate;
mod walker;

pub use error::{TessError, TessResult};
pub use mesh::{Mesh, Triangle, Vertex};
pub use triangulate::Triangulator;
pub use walker::{walk_faceuse_patch, walk_shell_patches, Patch};
