//! The kernel's top-level error taxonomy: every failure an entry point or
//! the tree walker can produce, wrapping the lower crates' errors.

use nmg_math::ToleranceError;
use nmg_ops::OpsError;
use nmg_tess::TessError;
use nmg_topo::TopoError;
use thiserror::Error;

/// Result type for `nmg_kernel` operations.
pub type KernelResult<T> = Result<T, KernelError>;

/// Everything that can go wrong at a kernel entry point or inside one
/// region's tree evaluation.
#[derive(Debug, Error, Clone)]
pub enum KernelError {
    /// An ill-formed tolerance record, rejected at entry with no state
    /// changes.
    #[error("tolerance error: {0}")]
    Tolerance(#[from] ToleranceError),

    /// The external tessellator failed or produced an invalid region.
    #[error("tessellation failed for leaf: {0}")]
    Tessellation(String),

    /// Geometric ambiguity within the distance tolerance (e.g. three
    /// faces coincident).
    #[error("boolean evaluation error: {0}")]
    Boolean(#[from] OpsError),

    /// Ear clipping could not complete.
    #[error("triangulation error: {0}")]
    Triangulation(#[from] TessError),

    /// A structural invariant was violated — a bug, not a recoverable
    /// input condition.
    #[error("invariant violated: {0}")]
    Invariant(#[from] TopoError),

    /// Allocation failed. Treated the same as an invariant violation:
    /// the region is abandoned and the model reset.
    #[error("resource exhausted")]
    ResourceExhausted,

    /// The cancel flag was observed set at a region boundary.
    #[error("cancelled")]
    Cancelled,
}
