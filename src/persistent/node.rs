//! Tree nodes and the borrowed [`NodeRef`] handle exposed to visitors.

use super::ReferenceCounter;
use std::fmt;

// =============================================================================
// Color and Side
// =============================================================================

/// The color of a red-black tree node.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Color {
    /// A red node. Never the root and never the parent of another red node.
    Red,
    /// A black node. Counts towards the black height.
    Black,
}

/// Which child slot of a node a path continues through.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    /// Returns the mirror side.
    pub(crate) const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

// =============================================================================
// Node Definition
// =============================================================================

/// A shared, optional child reference.
pub(crate) type Link<K, V> = Option<ReferenceCounter<Node<K, V>>>;

/// Internal node structure.
///
/// A node is only ever mutated while it is owned by the operation that
/// allocated it. Once it is wrapped in a [`ReferenceCounter`] and linked into
/// a published tree it is read-only.
#[derive(Clone)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) color: Color,
    pub(crate) left: Link<K, V>,
    pub(crate) right: Link<K, V>,
    /// Number of entries in the subtree rooted here, this node included.
    pub(crate) count: usize,
}

impl<K, V> Node<K, V> {
    /// Creates a new red leaf.
    pub(crate) const fn new_red(key: K, value: V) -> Self {
        Self {
            key,
            value,
            color: Color::Red,
            left: None,
            right: None,
            count: 1,
        }
    }

    pub(crate) fn is_red(&self) -> bool {
        self.color == Color::Red
    }

    pub(crate) const fn child(&self, side: Side) -> &Link<K, V> {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub(crate) const fn child_mut(&mut self, side: Side) -> &mut Link<K, V> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    pub(crate) fn set_child(&mut self, side: Side, link: Link<K, V>) {
        *self.child_mut(side) = link;
    }

    pub(crate) fn take_child(&mut self, side: Side) -> Link<K, V> {
        self.child_mut(side).take()
    }

    /// Recomputes `count` from the children currently linked.
    pub(crate) fn recount(&mut self) {
        self.count = 1 + count_of(&self.left) + count_of(&self.right);
    }

    /// Creates a copy of this node with a new color.
    pub(crate) fn with_color(&self, color: Color) -> Self
    where
        K: Clone,
        V: Clone,
    {
        Self {
            color,
            ..self.clone()
        }
    }
}

/// Returns the subtree size behind a link, 0 for an empty slot.
pub(crate) fn count_of<K, V>(link: &Link<K, V>) -> usize {
    link.as_ref().map_or(0, |node| node.count)
}

/// Checks if an optional node is red. Empty slots are black.
pub(crate) fn is_red<K, V>(link: &Link<K, V>) -> bool {
    link.as_ref().is_some_and(|node| node.is_red())
}

/// Takes ownership of a node.
///
/// A node allocated during the current operation is still uniquely owned and
/// is unwrapped without copying. A node shared with a published tree is
/// cloned, which is the path-copying step.
pub(crate) fn into_owned<K: Clone, V: Clone>(node: ReferenceCounter<Node<K, V>>) -> Node<K, V> {
    ReferenceCounter::try_unwrap(node).unwrap_or_else(|shared| (*shared).clone())
}

/// Wraps an owned node into a link, publishing it.
pub(crate) fn share<K, V>(node: Node<K, V>) -> Link<K, V> {
    Some(ReferenceCounter::new(node))
}

/// Forces a (new) root to black.
pub(crate) fn blacken<K: Clone, V: Clone>(root: Link<K, V>) -> Link<K, V> {
    root.map(|node| {
        if node.is_red() {
            let mut owned = into_owned(node);
            owned.color = Color::Black;
            ReferenceCounter::new(owned)
        } else {
            node
        }
    })
}

// =============================================================================
// NodeRef
// =============================================================================

/// A borrowed, read-only view of one node of a tree.
///
/// Handed to [`for_each`](super::PersistentRedBlackTree::for_each) visitors
/// and returned by [`root`](super::PersistentRedBlackTree::root). The
/// subtree handles returned by [`left`](Self::left) and [`right`](Self::right)
/// point into the same shared structure; nothing is copied.
pub struct NodeRef<'a, K, V> {
    node: &'a Node<K, V>,
}

impl<K, V> Clone for NodeRef<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for NodeRef<'_, K, V> {}

impl<'a, K, V> NodeRef<'a, K, V> {
    pub(crate) const fn new(node: &'a Node<K, V>) -> Self {
        Self { node }
    }

    pub(crate) fn from_link(link: &'a Link<K, V>) -> Option<Self> {
        link.as_deref().map(Self::new)
    }

    /// The node's color.
    #[must_use]
    pub const fn color(&self) -> Color {
        self.node.color
    }

    /// The node's key.
    #[must_use]
    pub const fn key(&self) -> &'a K {
        &self.node.key
    }

    /// The node's value.
    #[must_use]
    pub const fn value(&self) -> &'a V {
        &self.node.value
    }

    /// The left subtree, or `None` for an empty slot.
    #[must_use]
    pub fn left(&self) -> Option<Self> {
        Self::from_link(&self.node.left)
    }

    /// The right subtree, or `None` for an empty slot.
    #[must_use]
    pub fn right(&self) -> Option<Self> {
        Self::from_link(&self.node.right)
    }

    /// Number of entries in the subtree rooted at this node.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.node.count
    }

    /// Always `false`: a node's subtree contains at least the node itself.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Returns `true` if both handles refer to the very same allocation.
    ///
    /// Two versions of a tree that share a subtree return `true` here.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.node, other.node)
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for NodeRef<'_, K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("NodeRef")
            .field("color", &self.node.color)
            .field("key", &self.node.key)
            .field("value", &self.node.value)
            .field("count", &self.node.count)
            .finish_non_exhaustive()
    }
}
