//! Error types for triangulation.

use thiserror::Error;

/// Result type for `nmg_tess` operations.
pub type TessResult<T> = Result<T, TessError>;

/// Errors raised while triangulating a face or walking a shell's patches.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TessError {
    /// A loop-use had fewer than 3 edge-uses, or was a point loop where a
    /// ring was expected.
    #[error("face {0:?} has a degenerate loop and cannot be triangulated")]
    DegenerateLoop(nmg_topo::FaceId),

    /// Ear clipping ran out of ears before the polygon collapsed to a
    /// single triangle, which only happens for a self-intersecting or
    /// otherwise non-simple ring.
    #[error("face {0:?} did not fully triangulate: {1} vertices left over")]
    TriangulationFailed(nmg_topo::FaceId, usize),

    /// Rebuilding a face's loop system in place hit a topology error.
    #[error(transparent)]
    Topology(#[from] nmg_topo::TopoError),
}
