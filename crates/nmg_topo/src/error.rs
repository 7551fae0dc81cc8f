//! Error taxonomy for the topology store.

use thiserror::Error;

/// Errors raised by topology store operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TopoError {
    /// A handle referenced an object that has been killed or belongs to a
    /// different model.
    #[error("invalid reference to {0}")]
    InvalidReference(&'static str),

    /// An operation would violate a structural invariant (mate
    /// involution, radial closure, loop-use ring length, ...). This is the
    /// Rust stand-in for the source's `bomb()`.
    #[error("topology invariant violated: {0}")]
    Invariant(String),

    /// A kill would have left a dangling, ownerless structure.
    #[error("cannot kill {0}: would orphan a structure still in use")]
    WouldOrphan(&'static str),
}

/// Result alias for topology store operations.
pub type TopoResult<T> = Result<T, TopoError>;
