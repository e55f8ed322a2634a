//! Three-way key comparison used to order a [`PersistentRedBlackTree`].
//!
//! A tree never calls `Ord` directly. Every descent goes through a
//! [`Comparator`], so callers can order keys by any total order without
//! wrapping them in newtypes.
//!
//! # Examples
//!
//! ```rust
//! use persistent_rbtree::persistent::{Comparator, NaturalOrder, PersistentRedBlackTree};
//! use std::cmp::Ordering;
//!
//! assert_eq!(NaturalOrder.compare(&1, &2), Ordering::Less);
//!
//! // Closures are comparators too
//! let descending = PersistentRedBlackTree::with_comparator(|a: &i32, b: &i32| b.cmp(a))
//!     .insert(1, "one")
//!     .insert(3, "three")
//!     .insert(2, "two");
//! let keys: Vec<&i32> = descending.keys().collect();
//! assert_eq!(keys, vec![&3, &2, &1]);
//! ```
//!
//! [`PersistentRedBlackTree`]: super::PersistentRedBlackTree

use std::cmp::Ordering;

/// A total order over keys of type `K`.
///
/// `Less`, `Equal` and `Greater` stand for the classic `-1`, `0` and `1`
/// results of a three-way comparison. The order must stay consistent for
/// the whole lifetime of every tree built with it; an inconsistent
/// comparator does not cause memory unsafety, but lookups may miss keys.
pub trait Comparator<K: ?Sized> {
    /// Compares `left` against `right`.
    fn compare(&self, left: &K, right: &K) -> Ordering;
}

/// The default comparator: delegates to the key's [`Ord`] implementation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct NaturalOrder;

impl<K: Ord + ?Sized> Comparator<K> for NaturalOrder {
    #[inline]
    fn compare(&self, left: &K, right: &K) -> Ordering {
        left.cmp(right)
    }
}

impl<K: ?Sized, F> Comparator<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, left: &K, right: &K) -> Ordering {
        self(left, right)
    }
}
