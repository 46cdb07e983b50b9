use std::collections::TryReserveError;
use thiserror::Error;

/// Errors surfaced by the skip list.
///
/// Not finding an element is never an error. Deletions report it with a `bool` and queries with
/// `None`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SkipListError {
    /// The node store or a node's level array could not grow. The list is left untouched.
    #[error("out of memory while allocating a skip list node")]
    OutOfMemory(#[from] TryReserveError),

    /// NaN has no place in a total order.
    #[error("score must not be NaN")]
    NanScore,

    /// The level probability must lie strictly between 0 and 1.
    #[error("level probability must be in (0, 1), got {0}")]
    InvalidProbability(f64),
}

/// Convenience alias for results produced by this crate.
pub type Result<T> = std::result::Result<T, SkipListError>;
