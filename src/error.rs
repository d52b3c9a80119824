//! Error types for tree construction.

use thiserror::Error;

use crate::btree_base::btree::MIN_DEGREE;

/// Result type alias for fallible tree operations
pub type Result<T> = std::result::Result<T, BTreeError>;

/// Errors reported by this crate.
///
/// Searching or removing an absent key is a normal outcome (end
/// iterator / zero removal count), never an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BTreeError {
    /// The configured minimum degree is too small to keep the node
    /// fanout invariants meaningful
    #[error("minimum degree must be at least {MIN_DEGREE}, got {0}")]
    InvalidMinDegree(usize),
}
