//! The private builder scope of a single mutating operation.
//!
//! A [`Spine`] holds owned copies of the nodes on one root-to-node path. Each
//! [`Frame`] has a *hole* on the side the path continues through; the hole is
//! filled only when the spine is [sealed](Spine::seal). Until then every node
//! in the spine is exclusively owned by the running operation and may be
//! recolored, recounted and relinked freely. Sealing wraps the nodes into
//! shared references bottom-up and returns the new root, after which none of
//! them is ever touched again.
//!
//! Nodes hanging off the spine (the non-hole children) are shared with the
//! previous version of the tree and are never mutated.

use super::ReferenceCounter;
use super::node::{Link, Node, Side, count_of};

/// One owned ancestor on a path, with a hole on `side`.
pub(crate) struct Frame<K, V> {
    pub(crate) node: Node<K, V>,
    pub(crate) side: Side,
}

impl<K, V> Frame<K, V> {
    /// Fills the hole with `link` and publishes the node.
    pub(crate) fn fill(mut self, link: Link<K, V>) -> ReferenceCounter<Node<K, V>> {
        self.node.set_child(self.side, link);
        ReferenceCounter::new(self.node)
    }

    /// The child on the other side of the hole.
    pub(crate) const fn sibling(&self) -> &Link<K, V> {
        self.node.child(self.side.opposite())
    }

    /// Recomputes `count` as if the hole held `hole`.
    pub(crate) fn recount_with(&mut self, hole: &Link<K, V>) {
        self.node.count = 1 + count_of(hole) + count_of(self.sibling());
    }
}

/// A stack of owned frames from the root (bottom of the stack) downwards.
pub(crate) struct Spine<K, V> {
    frames: Vec<Frame<K, V>>,
}

impl<K, V> Spine<K, V> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            frames: Vec::with_capacity(capacity),
        }
    }

    /// Pushes an owned node whose path continues through `side`.
    ///
    /// The shared child on `side` is released; it is about to be replaced by
    /// a rebuilt one.
    pub(crate) fn push(&mut self, mut node: Node<K, V>, side: Side) {
        node.set_child(side, None);
        self.frames.push(Frame { node, side });
    }

    pub(crate) fn push_frame(&mut self, frame: Frame<K, V>) {
        self.frames.push(frame);
    }

    pub(crate) fn pop(&mut self) -> Option<Frame<K, V>> {
        self.frames.pop()
    }

    #[cfg(test)]
    pub(crate) fn last(&self) -> Option<&Frame<K, V>> {
        self.frames.last()
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Frame<K, V>> {
        self.frames.get_mut(index)
    }

    pub(crate) fn len(&self) -> usize {
        self.frames.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Adds `delta` (+1 for insert, -1 for remove) to every frame's count.
    pub(crate) fn adjust_counts(&mut self, delta: isize) {
        for frame in &mut self.frames {
            frame.node.count = frame.node.count.saturating_add_signed(delta);
        }
    }

    /// Fills every hole bottom-up, starting with `focus`, and returns the root.
    pub(crate) fn seal(mut self, focus: Link<K, V>) -> Link<K, V> {
        let mut link = focus;
        while let Some(frame) = self.frames.pop() {
            link = Some(frame.fill(link));
        }
        link
    }
}
