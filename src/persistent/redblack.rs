//! Persistent (immutable) ordered map based on a path-copying red-black tree.
//!
//! This module provides [`PersistentRedBlackTree`], an immutable ordered map
//! in which every mutating operation returns a new version of the tree.
//!
//! # Overview
//!
//! - O(log N) insert, remove, find and get
//! - O(log N) new allocations per insert or remove
//! - O(log N) `nth` and `rank` through per-node subtree counts
//! - O(1) len and `is_empty`
//!
//! A mutation copies only the nodes on one root-to-node path. Every subtree
//! off that path is shared by reference between the old and the new version,
//! so all previously returned versions stay valid and unchanged.
//!
//! # Duplicate keys
//!
//! Keys that compare equal are not merged. An insert whose key ties with a
//! visited node descends left, so the tree keeps every inserted entry and
//! [`find`](PersistentRedBlackTree::find) returns the first equal node met
//! on the way down.
//!
//! # Examples
//!
//! ```rust
//! use persistent_rbtree::persistent::PersistentRedBlackTree;
//!
//! let tree = PersistentRedBlackTree::new()
//!     .insert(7, "quux")
//!     .insert(2, "bar")
//!     .insert(1, "foo");
//!
//! let without_two = tree.remove(&2);
//! assert_eq!(tree.len(), 3); // Original unchanged
//! assert_eq!(without_two.keys().copied().collect::<Vec<_>>(), vec![1, 7]);
//! ```
//!
//! # Internal Structure
//!
//! The tree maintains the following invariants:
//! 1. The root is black
//! 2. Red nodes have only black children
//! 3. Every path from a node to an empty slot has the same number of black nodes
//! 4. Every node's `count` is the size of its subtree

use super::ReferenceCounter;
use super::comparator::{Comparator, NaturalOrder};
use super::locator::{Locator, NodePath};
use super::node::{
    Color, Link, Node, NodeRef, Side, blacken, count_of, into_owned, is_red, share,
};
use super::spine::{Frame, Spine};
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::fmt;
use std::iter::FromIterator;
use std::ops::ControlFlow;

/// Initial capacity for path buffers; deep enough for millions of entries.
pub(crate) const DEPTH_HINT: usize = 48;

// =============================================================================
// PersistentRedBlackTree Definition
// =============================================================================

/// A persistent (immutable) ordered map based on a red-black tree.
///
/// Entries are ordered by a [`Comparator`], [`NaturalOrder`] by default.
/// Cloning a tree is O(1): it only bumps two reference counts.
///
/// # Time Complexity
///
/// | Operation         | Complexity |
/// |-------------------|------------|
/// | `new`             | O(1)       |
/// | `insert`          | O(log N)   |
/// | `remove`          | O(log N)   |
/// | `find` / `get`    | O(log N)   |
/// | `nth` / `rank`    | O(log N)   |
/// | `first` / `last`  | O(log N)   |
/// | `len`             | O(1)       |
///
/// # Examples
///
/// ```rust
/// use persistent_rbtree::persistent::PersistentRedBlackTree;
///
/// let tree1 = PersistentRedBlackTree::new().insert(1, "one");
/// let tree2 = tree1.insert(2, "two");
///
/// assert_eq!(tree1.len(), 1);
/// assert_eq!(tree2.len(), 2);
/// assert_eq!(tree2.get(&2), Some(&"two"));
/// ```
pub struct PersistentRedBlackTree<K, V, C = NaturalOrder> {
    root: Link<K, V>,
    comparator: ReferenceCounter<C>,
}

impl<K, V> PersistentRedBlackTree<K, V, NaturalOrder> {
    /// Creates a new empty tree ordered by the keys' [`Ord`] implementation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_rbtree::persistent::PersistentRedBlackTree;
    ///
    /// let tree: PersistentRedBlackTree<i32, String> = PersistentRedBlackTree::new();
    /// assert!(tree.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }
}

impl<K, V, C> PersistentRedBlackTree<K, V, C> {
    /// Creates a new empty tree ordered by `comparator`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_rbtree::persistent::PersistentRedBlackTree;
    ///
    /// let tree = PersistentRedBlackTree::with_comparator(|a: &i32, b: &i32| b.cmp(a))
    ///     .insert(1, ())
    ///     .insert(2, ());
    /// assert_eq!(tree.first().map(|(key, _)| *key), Some(2));
    /// ```
    #[must_use]
    pub fn with_comparator(comparator: C) -> Self {
        Self {
            root: None,
            comparator: ReferenceCounter::new(comparator),
        }
    }

    /// Returns the number of entries in the tree (the root's subtree count).
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        count_of(&self.root)
    }

    /// Returns `true` if the tree contains no entries.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the comparator ordering this tree.
    #[must_use]
    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Returns a handle to the root node, or `None` for an empty tree.
    ///
    /// The handle can be used to inspect the shape of the tree, and to check
    /// structural sharing between versions with [`NodeRef::ptr_eq`].
    #[must_use]
    pub fn root(&self) -> Option<NodeRef<'_, K, V>> {
        NodeRef::from_link(&self.root)
    }

    #[cfg(test)]
    pub(crate) fn root_link(&self) -> &Link<K, V> {
        &self.root
    }

    /// Returns `true` if both trees are the very same version.
    pub(crate) fn same_version(&self, other: &Self) -> bool {
        match (&self.root, &other.root) {
            (Some(left), Some(right)) => ReferenceCounter::ptr_eq(left, right),
            (None, None) => true,
            _ => false,
        }
    }

    /// A new version sharing this tree's comparator.
    pub(crate) fn with_root(&self, root: Link<K, V>) -> Self {
        Self {
            root,
            comparator: ReferenceCounter::clone(&self.comparator),
        }
    }

    /// Returns the entry with the smallest key.
    #[must_use]
    pub fn first(&self) -> Option<(&K, &V)> {
        let mut node = self.root.as_deref()?;
        while let Some(left) = node.left.as_deref() {
            node = left;
        }
        Some((&node.key, &node.value))
    }

    /// Returns the entry with the largest key.
    #[must_use]
    pub fn last(&self) -> Option<(&K, &V)> {
        let mut node = self.root.as_deref()?;
        while let Some(right) = node.right.as_deref() {
            node = right;
        }
        Some((&node.key, &node.value))
    }

    /// Returns the entry at in-order position `index`, counting from zero.
    ///
    /// Uses the subtree counts, so it does not walk the preceding entries.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_rbtree::persistent::PersistentRedBlackTree;
    ///
    /// let tree: PersistentRedBlackTree<i32, char> =
    ///     [(30, 'c'), (10, 'a'), (20, 'b')].into_iter().collect();
    /// assert_eq!(tree.nth(1), Some((&20, &'b')));
    /// assert_eq!(tree.nth(3), None);
    /// ```
    #[must_use]
    pub fn nth(&self, index: usize) -> Option<(&K, &V)> {
        let mut remaining = index;
        let mut cursor = self.root.as_deref();
        while let Some(node) = cursor {
            let left_count = count_of(&node.left);
            match remaining.cmp(&left_count) {
                Ordering::Less => cursor = node.left.as_deref(),
                Ordering::Equal => return Some((&node.key, &node.value)),
                Ordering::Greater => {
                    remaining -= left_count + 1;
                    cursor = node.right.as_deref();
                }
            }
        }
        None
    }

    /// Visits every node in order (left subtree, node, right subtree).
    ///
    /// The walk runs over the shared structure without copying anything.
    /// Returning [`ControlFlow::Break`] from the visitor stops the walk
    /// immediately and its payload is returned; a walk that visits every
    /// node returns `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_rbtree::persistent::PersistentRedBlackTree;
    /// use std::ops::ControlFlow;
    ///
    /// let tree: PersistentRedBlackTree<i32, &str> =
    ///     [(1, "foo"), (2, "bar"), (4, "baz")].into_iter().collect();
    ///
    /// let first_even = tree.for_each(|node| {
    ///     if node.key() % 2 == 0 {
    ///         ControlFlow::Break(*node.value())
    ///     } else {
    ///         ControlFlow::Continue(())
    ///     }
    /// });
    /// assert_eq!(first_even, Some("bar"));
    ///
    /// let mut sizes = Vec::new();
    /// let finished = tree.for_each(|node| {
    ///     sizes.push(node.len());
    ///     ControlFlow::<()>::Continue(())
    /// });
    /// assert_eq!(finished, None);
    /// assert_eq!(sizes.len(), 3);
    /// ```
    pub fn for_each<B, F>(&self, mut visitor: F) -> Option<B>
    where
        F: FnMut(NodeRef<'_, K, V>) -> ControlFlow<B>,
    {
        match visit_in_order(self.root.as_deref(), &mut visitor) {
            ControlFlow::Break(result) => Some(result),
            ControlFlow::Continue(()) => None,
        }
    }

    /// Returns an iterator over entries in order.
    #[must_use]
    pub fn iter(&self) -> PersistentRedBlackTreeIterator<'_, K, V> {
        PersistentRedBlackTreeIterator::new(self.root.as_deref(), self.len())
    }

    /// Returns an iterator over keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(key, _)| key)
    }

    /// Returns an iterator over values in key order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }
}

fn visit_in_order<'a, K, V, B, F>(node: Option<&'a Node<K, V>>, visitor: &mut F) -> ControlFlow<B>
where
    F: FnMut(NodeRef<'a, K, V>) -> ControlFlow<B>,
{
    let Some(node) = node else {
        return ControlFlow::Continue(());
    };
    visit_in_order(node.left.as_deref(), visitor)?;
    visitor(NodeRef::new(node))?;
    visit_in_order(node.right.as_deref(), visitor)
}

// =============================================================================
// Search
// =============================================================================

impl<K, V, C: Comparator<K>> PersistentRedBlackTree<K, V, C> {
    /// Descends from the root and returns the first node comparing equal.
    fn search(&self, key: &K) -> Option<&Node<K, V>> {
        let mut cursor = self.root.as_deref();
        while let Some(node) = cursor {
            cursor = match self.comparator.compare(key, &node.key) {
                Ordering::Equal => return Some(node),
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
            };
        }
        None
    }

    /// Returns a reference to the value of the first entry found for `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_rbtree::persistent::PersistentRedBlackTree;
    ///
    /// let tree = PersistentRedBlackTree::new().insert("hello", 42);
    /// assert_eq!(tree.get(&"hello"), Some(&42));
    /// assert_eq!(tree.get(&"world"), None);
    /// ```
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.search(key).map(|node| &node.value)
    }

    /// Returns `true` if the tree contains an entry for `key`.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.search(key).is_some()
    }

    /// Returns the number of entries whose key compares strictly less than `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_rbtree::persistent::PersistentRedBlackTree;
    ///
    /// let tree: PersistentRedBlackTree<i32, ()> =
    ///     [1, 3, 5, 7].into_iter().map(|key| (key, ())).collect();
    /// assert_eq!(tree.rank(&5), 2);
    /// assert_eq!(tree.rank(&6), 3);
    /// assert_eq!(tree.rank(&0), 0);
    /// ```
    #[must_use]
    pub fn rank(&self, key: &K) -> usize {
        let mut rank = 0;
        let mut cursor = self.root.as_deref();
        while let Some(node) = cursor {
            if self.comparator.compare(key, &node.key) == Ordering::Greater {
                rank += count_of(&node.left) + 1;
                cursor = node.right.as_deref();
            } else {
                cursor = node.left.as_deref();
            }
        }
        rank
    }

    /// Searches for `key` and returns a [`Locator`] holding the visited path.
    ///
    /// The path ends at the first node comparing equal to `key`. When no node
    /// matches the locator's path is empty and removing through it is a no-op.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_rbtree::persistent::PersistentRedBlackTree;
    ///
    /// let tree = PersistentRedBlackTree::new().insert(1, "one").insert(2, "two");
    ///
    /// let found = tree.find(&2);
    /// assert_eq!(found.value(), Some(&"two"));
    /// assert_eq!(found.remove().len(), 1);
    ///
    /// assert!(!tree.find(&3).is_found());
    /// ```
    #[must_use]
    pub fn find(&self, key: &K) -> Locator<K, V, C> {
        let mut path = NodePath::new();
        let mut cursor = self.root.as_ref();
        while let Some(node) = cursor {
            path.push(ReferenceCounter::clone(node));
            cursor = match self.comparator.compare(key, &node.key) {
                Ordering::Equal => return Locator::new(self.clone(), path),
                Ordering::Less => node.left.as_ref(),
                Ordering::Greater => node.right.as_ref(),
            };
        }
        Locator::new(self.clone(), NodePath::new())
    }
}

// =============================================================================
// Insert
// =============================================================================

impl<K: Clone, V: Clone, C: Comparator<K>> PersistentRedBlackTree<K, V, C> {
    /// Creates a tree containing a single entry.
    #[must_use]
    pub fn singleton(key: K, value: V) -> Self
    where
        C: Default,
    {
        Self::with_comparator(C::default()).insert(key, value)
    }

    /// Inserts an entry and returns the new version of the tree.
    ///
    /// Keys comparing equal to an existing key are kept side by side: the
    /// new entry is placed in the left subtree of the equal node, and the
    /// length grows by one.
    ///
    /// # Complexity
    ///
    /// O(log N) time and O(log N) new nodes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_rbtree::persistent::PersistentRedBlackTree;
    ///
    /// let tree = PersistentRedBlackTree::new().insert(1, "one");
    /// let twice = tree.insert(1, "uno");
    ///
    /// assert_eq!(tree.len(), 1);
    /// assert_eq!(twice.len(), 2);
    /// ```
    #[must_use]
    pub fn insert(&self, key: K, value: V) -> Self {
        let mut spine = Spine::with_capacity(DEPTH_HINT);
        let mut cursor = self.root.as_ref();
        while let Some(node) = cursor {
            let side = if self.comparator.compare(&key, &node.key) == Ordering::Greater {
                Side::Right
            } else {
                Side::Left
            };
            let mut copy = (**node).clone();
            copy.count += 1;
            cursor = node.child(side).as_ref();
            spine.push(copy, side);
        }
        let leaf = ReferenceCounter::new(Node::new_red(key, value));
        self.with_root(blacken(rebalance_after_insert(spine, leaf)))
    }
}

/// Repairs red-red violations bottom-up and seals the spine.
///
/// `focus` is the subtree that hangs in the hole of the spine's last frame.
fn rebalance_after_insert<K: Clone, V: Clone>(
    mut spine: Spine<K, V>,
    mut focus: ReferenceCounter<Node<K, V>>,
) -> Link<K, V> {
    while focus.is_red() {
        let Some(parent) = spine.pop() else { break };
        if !parent.node.is_red() {
            spine.push_frame(parent);
            break;
        }
        let Some(mut grandparent) = spine.pop() else {
            // A red root is blackened by the caller.
            spine.push_frame(parent);
            break;
        };

        if is_red(grandparent.sibling()) {
            // Red uncle: push the grandparent's blackness down one level and
            // carry on from the grandparent.
            let mut parent = parent;
            parent.node.color = Color::Black;
            let uncle_side = grandparent.side.opposite();
            let uncle = grandparent
                .node
                .take_child(uncle_side)
                .map(|uncle| ReferenceCounter::new(uncle.with_color(Color::Black)));
            grandparent.node.set_child(uncle_side, uncle);
            grandparent.node.color = Color::Red;
            let parent = parent.fill(Some(focus));
            focus = grandparent.fill(Some(parent));
            continue;
        }

        focus = rotate_after_insert(grandparent, parent, focus);
        break;
    }
    spine.seal(Some(focus))
}

/// Resolves a red-red violation under a black uncle with one rotation
/// (outer child) or two (inner child). Returns the new black subtree root.
fn rotate_after_insert<K: Clone, V: Clone>(
    mut grandparent: Frame<K, V>,
    mut parent: Frame<K, V>,
    focus: ReferenceCounter<Node<K, V>>,
) -> ReferenceCounter<Node<K, V>> {
    let outer = grandparent.side;
    let inner = outer.opposite();
    grandparent.node.color = Color::Red;

    if parent.side == outer {
        parent.node.set_child(outer, Some(focus));
        grandparent
            .node
            .set_child(outer, parent.node.take_child(inner));
        grandparent.node.recount();
        parent.node.set_child(inner, share(grandparent.node));
        parent.node.color = Color::Black;
        parent.node.recount();
        return ReferenceCounter::new(parent.node);
    }

    let mut element = into_owned(focus);
    parent.node.set_child(inner, element.take_child(outer));
    parent.node.recount();
    grandparent.node.set_child(outer, element.take_child(inner));
    grandparent.node.recount();
    element.set_child(outer, share(parent.node));
    element.set_child(inner, share(grandparent.node));
    element.color = Color::Black;
    element.recount();
    ReferenceCounter::new(element)
}

// =============================================================================
// Iterator Implementation
// =============================================================================

/// A lazy in-order iterator over the entries of a [`PersistentRedBlackTree`].
pub struct PersistentRedBlackTreeIterator<'a, K, V> {
    stack: SmallVec<[&'a Node<K, V>; DEPTH_HINT]>,
    remaining: usize,
}

impl<'a, K, V> PersistentRedBlackTreeIterator<'a, K, V> {
    fn new(root: Option<&'a Node<K, V>>, length: usize) -> Self {
        let mut iterator = Self {
            stack: SmallVec::new(),
            remaining: length,
        };
        iterator.push_left_spine(root);
        iterator
    }

    fn push_left_spine(&mut self, mut node: Option<&'a Node<K, V>>) {
        while let Some(current) = node {
            self.stack.push(current);
            node = current.left.as_deref();
        }
    }
}

impl<'a, K, V> Iterator for PersistentRedBlackTreeIterator<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        self.remaining = self.remaining.saturating_sub(1);
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for PersistentRedBlackTreeIterator<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K, V, C> Clone for PersistentRedBlackTree<K, V, C> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            comparator: ReferenceCounter::clone(&self.comparator),
        }
    }
}

impl<K, V, C: Default> Default for PersistentRedBlackTree<K, V, C> {
    #[inline]
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<K: Clone, V: Clone, C: Comparator<K> + Default> FromIterator<(K, V)>
    for PersistentRedBlackTree<K, V, C>
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = Self::default();
        tree.extend(iter);
        tree
    }
}

impl<K: Clone, V: Clone, C: Comparator<K>> Extend<(K, V)> for PersistentRedBlackTree<K, V, C> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            *self = self.insert(key, value);
        }
    }
}

impl<'a, K, V, C> IntoIterator for &'a PersistentRedBlackTree<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = PersistentRedBlackTreeIterator<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Two trees are equal when they hold the same entries in the same order,
/// regardless of shape or colors.
impl<K: PartialEq, V: PartialEq, C> PartialEq for PersistentRedBlackTree<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq, C> Eq for PersistentRedBlackTree<K, V, C> {}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for PersistentRedBlackTree<K, V, C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

impl<K: fmt::Display, V: fmt::Display, C> fmt::Display for PersistentRedBlackTree<K, V, C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        let mut first = true;
        for (key, value) in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{key}: {value}")?;
        }
        write!(formatter, "}}")
    }
}

#[cfg(not(feature = "arc"))]
static_assertions::assert_not_impl_any!(PersistentRedBlackTree<i32, i32>: Send, Sync);

#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(PersistentRedBlackTree<i32, String>: Send, Sync);
