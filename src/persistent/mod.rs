//! Persistent (immutable) ordered map.
//!
//! This module provides [`PersistentRedBlackTree`], a versioned red-black
//! tree. Every insert or remove returns a new tree and leaves the old one
//! untouched:
//!
//! - [`PersistentRedBlackTree`]: the versioned tree handle
//! - [`Locator`]: a search result that a removal can consume without searching again
//! - [`Comparator`] / [`NaturalOrder`]: the key order
//! - [`NodeRef`] / [`Color`]: read-only views handed to traversal visitors
//!
//! # Structural Sharing
//!
//! A mutation copies the nodes on one root-to-node path and shares every
//! other subtree with the previous version.
//!
//! # Examples
//!
//! ```rust
//! use persistent_rbtree::persistent::PersistentRedBlackTree;
//!
//! let tree = PersistentRedBlackTree::new()
//!     .insert(3, "three")
//!     .insert(1, "one")
//!     .insert(2, "two");
//!
//! // Entries are always in sorted order
//! let keys: Vec<&i32> = tree.keys().collect();
//! assert_eq!(keys, vec![&1, &2, &3]);
//!
//! // Structural sharing: the original tree is preserved
//! let smaller = tree.remove(&1);
//! assert_eq!(tree.len(), 3);    // Original unchanged
//! assert_eq!(smaller.len(), 2); // New version
//! ```

// =============================================================================
// Reference Counter Type Alias
// =============================================================================

/// Reference-counted smart pointer type.
///
/// When the `arc` feature is enabled, this is `std::sync::Arc`, and trees
/// can be shared across threads.
///
/// When the `arc` feature is disabled (default), this is `std::rc::Rc`,
/// which is faster but not thread-safe.
#[cfg(feature = "arc")]
pub(crate) type ReferenceCounter<T> = std::sync::Arc<T>;

#[cfg(not(feature = "arc"))]
pub(crate) type ReferenceCounter<T> = std::rc::Rc<T>;

mod comparator;
mod error;
mod locator;
mod node;
mod redblack;
mod removal;
mod spine;

pub use comparator::Comparator;
pub use comparator::NaturalOrder;
pub use error::StaleLocatorError;
pub use locator::Locator;
pub use node::Color;
pub use node::NodeRef;
pub use redblack::PersistentRedBlackTree;
pub use redblack::PersistentRedBlackTreeIterator;

// =============================================================================
// Tests
// =============================================================================
