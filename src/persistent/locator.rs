//! Search results that can be consumed by a removal.
//!
//! A [`Locator`] remembers the exact root-to-node path a search walked, so a
//! removal through it does not search again. It also keeps its tree version
//! alive, which makes [`Locator::remove`] valid for as long as the locator
//! exists.

use super::ReferenceCounter;
use super::comparator::NaturalOrder;
use super::error::StaleLocatorError;
use super::node::{Node, NodeRef};
use super::redblack::PersistentRedBlackTree;
use smallvec::SmallVec;
use std::fmt;

/// Shared handles from the root (first) down to a target node (last).
pub(crate) type NodePath<K, V> = SmallVec<[ReferenceCounter<Node<K, V>>; 16]>;

/// The result of [`PersistentRedBlackTree::find`].
///
/// An empty path means the key was not found.
///
/// # Examples
///
/// ```rust
/// use persistent_rbtree::persistent::PersistentRedBlackTree;
///
/// let tree = PersistentRedBlackTree::new().insert(2, "two").insert(1, "one");
///
/// let locator = tree.find(&1);
/// assert!(locator.is_found());
/// assert_eq!(locator.key(), Some(&1));
///
/// let removed = locator.remove();
/// assert_eq!(removed.len(), 1);
/// assert_eq!(tree.len(), 2); // Original unchanged
/// ```
pub struct Locator<K, V, C = NaturalOrder> {
    tree: PersistentRedBlackTree<K, V, C>,
    path: NodePath<K, V>,
}

impl<K, V, C> Locator<K, V, C> {
    pub(crate) const fn new(tree: PersistentRedBlackTree<K, V, C>, path: NodePath<K, V>) -> Self {
        Self { tree, path }
    }

    /// Returns `true` if the search ended on a matching node.
    #[must_use]
    pub fn is_found(&self) -> bool {
        !self.path.is_empty()
    }

    /// The located node, if any.
    #[must_use]
    pub fn node(&self) -> Option<NodeRef<'_, K, V>> {
        self.path.last().map(|node| NodeRef::new(node))
    }

    /// The key of the located entry.
    #[must_use]
    pub fn key(&self) -> Option<&K> {
        self.path.last().map(|node| &node.key)
    }

    /// The value of the located entry.
    #[must_use]
    pub fn value(&self) -> Option<&V> {
        self.path.last().map(|node| &node.value)
    }

    /// Number of nodes on the path, 0 when nothing was found.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// The tree version this locator was computed against.
    #[must_use]
    pub const fn tree(&self) -> &PersistentRedBlackTree<K, V, C> {
        &self.tree
    }

    pub(crate) fn path(&self) -> &[ReferenceCounter<Node<K, V>>] {
        &self.path
    }
}

impl<K: Clone, V: Clone, C> Locator<K, V, C> {
    /// Removes the located entry and returns the new version of the tree.
    ///
    /// If nothing was found the locator's own tree is returned unchanged.
    #[must_use]
    pub fn remove(&self) -> PersistentRedBlackTree<K, V, C> {
        self.tree.remove_along(&self.path)
    }
}

impl<K: Clone, V: Clone, C> PersistentRedBlackTree<K, V, C> {
    /// Removes the entry located by `locator` from this tree.
    ///
    /// Unlike [`Locator::remove`], this checks that `locator` was computed
    /// against this very version of the tree. A locator obtained from any
    /// other version is rejected, even an equal-looking one.
    ///
    /// # Errors
    ///
    /// Returns [`StaleLocatorError`] if `locator` belongs to another version.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_rbtree::persistent::PersistentRedBlackTree;
    ///
    /// let tree = PersistentRedBlackTree::new().insert(1, "one").insert(2, "two");
    /// let locator = tree.find(&1);
    ///
    /// assert_eq!(tree.remove_at(&locator).map(|tree| tree.len()), Ok(1));
    ///
    /// let newer = tree.insert(3, "three");
    /// assert!(newer.remove_at(&locator).is_err());
    /// ```
    pub fn remove_at(&self, locator: &Locator<K, V, C>) -> Result<Self, StaleLocatorError> {
        if !self.same_version(&locator.tree) {
            tracing::debug!(
                depth = locator.depth(),
                "rejected a locator computed against another tree version"
            );
            return Err(StaleLocatorError {
                depth: locator.depth(),
            });
        }
        Ok(self.remove_along(locator.path()))
    }
}

impl<K, V, C> Clone for Locator<K, V, C> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
            path: self.path.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for Locator<K, V, C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Locator")
            .field("depth", &self.depth())
            .field("key", &self.key())
            .field("value", &self.value())
            .finish()
    }
}
