//! Error types for Boolean evaluation and topological cleanup.

use nmg_topo::TopoError;
use thiserror::Error;

/// Result type for `nmg_ops` operations.
pub type OpsResult<T> = Result<T, OpsError>;

/// Errors raised by the Boolean evaluator and the cleanup pipeline.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OpsError {
    /// The underlying topology store rejected a mutation.
    #[error("topology error: {0}")]
    Topology(#[from] TopoError),

    /// Classification could not resolve a face's status relative to the
    /// other operand (e.g. a face straddling the other shell's boundary
    /// without a usable coincident neighbor to classify against).
    #[error("boolean result indeterminate: {0}")]
    BooleanIndeterminate(String),

    /// Neither operand overlaps and the requested operation requires
    /// overlap (intersect).
    #[error("no intersection between operands")]
    NoIntersection,

    /// A cleanup pass would leave a shell neither void nor external.
    #[error("dangling void shell: {0}")]
    DanglingVoid(String),
}
