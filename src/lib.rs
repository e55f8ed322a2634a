//! # persistent-rbtree
//!
//! A persistent (immutable, versioned) balanced ordered map.
//!
//! ## Overview
//!
//! Every mutating operation returns a new version of the map in O(log n)
//! time and O(log n) new allocations, while every previously returned
//! version stays valid, unmodified and safe to read. It is meant as the
//! ordered-index building block underneath higher-level stores: database
//! indexes, undoable editor state, functional collections.
//!
//! - **Red-black balancing** with path copying on insert and remove
//! - **Locators**: search once, remove through the recorded path
//! - **Order statistics**: `nth` and `rank` from per-node subtree counts
//! - **Custom comparators** through the [`Comparator`](persistent::Comparator) trait
//!
//! ## Feature Flags
//!
//! - `arc`: share nodes through `Arc` instead of `Rc`, so trees are `Send + Sync`
//!
//! ## Example
//!
//! ```rust
//! use persistent_rbtree::prelude::*;
//!
//! let v1 = PersistentRedBlackTree::new().insert(2, "two").insert(1, "one");
//! let v2 = v1.insert(3, "three");
//! let v3 = v2.remove(&1);
//!
//! assert_eq!(v1.len(), 2);
//! assert_eq!(v2.len(), 3);
//! assert_eq!(v3.keys().copied().collect::<Vec<_>>(), vec![2, 3]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// ```rust
/// use persistent_rbtree::prelude::*;
/// ```
pub mod prelude {
    pub use crate::persistent::*;
}

pub mod persistent;
