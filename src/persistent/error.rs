//! Error types for persistent trees.
//!
//! Every core tree operation is total. The only failure a caller can observe
//! is applying a [`Locator`](super::Locator) to a tree version it was not
//! computed against.

use std::fmt;

/// Returned by [`remove_at`](super::PersistentRedBlackTree::remove_at) when the
/// locator was computed against a different version of the tree.
///
/// # Examples
///
/// ```rust
/// use persistent_rbtree::persistent::StaleLocatorError;
///
/// let error = StaleLocatorError { depth: 3 };
/// assert_eq!(
///     format!("{error}"),
///     "stale locator: path of depth 3 belongs to a different tree version"
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaleLocatorError {
    /// Length of the rejected locator's root-to-target path.
    pub depth: usize,
}

impl fmt::Display for StaleLocatorError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "stale locator: path of depth {} belongs to a different tree version",
            self.depth
        )
    }
}

impl std::error::Error for StaleLocatorError {}
