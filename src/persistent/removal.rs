//! Removal with path copying and double-black repair.
//!
//! A removal copies the located path into a [`Spine`], swaps a node with two
//! children for its in-order predecessor, and then physically deletes a node
//! with at most one child:
//!
//! - a red leaf is simply dropped;
//! - a black node with one (necessarily red) child is replaced by that child,
//!   recolored black;
//! - a black leaf leaves its parent one black short on that side. The
//!   deficiency is repaired bottom-up by [`repair_double_black`].

use super::ReferenceCounter;
use super::comparator::Comparator;
use super::node::{Color, Link, Node, Side, blacken, count_of, into_owned, is_red, share};
use super::redblack::{DEPTH_HINT, PersistentRedBlackTree};
use super::spine::Spine;

impl<K: Clone, V: Clone, C: Comparator<K>> PersistentRedBlackTree<K, V, C> {
    /// Removes the first entry found for `key` and returns the new version.
    ///
    /// Equivalent to `self.find(key).remove()`. Removing an absent key
    /// returns this version unchanged.
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
    /// let tree = PersistentRedBlackTree::new()
    ///     .insert(1, "one")
    ///     .insert(2, "two");
    /// let removed = tree.remove(&1);
    ///
    /// assert_eq!(tree.len(), 2);     // Original unchanged
    /// assert_eq!(removed.len(), 1);  // New version
    /// assert_eq!(removed.get(&1), None);
    /// ```
    #[must_use]
    pub fn remove(&self, key: &K) -> Self {
        self.find(key).remove()
    }
}

impl<K: Clone, V: Clone, C> PersistentRedBlackTree<K, V, C> {
    /// Removes the last node of `path`, a root-to-node path of this version.
    pub(crate) fn remove_along(&self, path: &[ReferenceCounter<Node<K, V>>]) -> Self {
        let Some((target, ancestors)) = path.split_last() else {
            tracing::trace!("remove: key not found, returning the same version");
            return self.clone();
        };

        let mut spine = Spine::with_capacity(DEPTH_HINT);
        for (ancestor, next) in ancestors.iter().zip(&path[1..]) {
            spine.push((**ancestor).clone(), side_towards(ancestor, next));
        }

        let mut element = (**target).clone();
        if element.left.is_some() && element.right.is_some() {
            element = swap_with_predecessor(&mut spine, element);
        }
        self.with_root(delete(spine, element))
    }
}

/// Which side of `parent` holds `child`.
fn side_towards<K, V>(parent: &Node<K, V>, child: &ReferenceCounter<Node<K, V>>) -> Side {
    match &parent.left {
        Some(left) if ReferenceCounter::ptr_eq(left, child) => Side::Left,
        _ => Side::Right,
    }
}

/// Moves the in-order predecessor's entry into `target` and returns a copy
/// of the predecessor carrying `target`'s old entry, which is then deleted.
///
/// The path down to the predecessor is copied onto `spine`.
fn swap_with_predecessor<K: Clone, V: Clone>(
    spine: &mut Spine<K, V>,
    target: Node<K, V>,
) -> Node<K, V> {
    let Some(mut cursor) = target.left.clone() else {
        return target;
    };
    let split = spine.len();
    spine.push(target, Side::Left);
    while let Some(next) = cursor.right.clone() {
        spine.push((*cursor).clone(), Side::Right);
        cursor = next;
    }

    let mut predecessor = (*cursor).clone();
    if let Some(frame) = spine.get_mut(split) {
        std::mem::swap(&mut frame.node.key, &mut predecessor.key);
        std::mem::swap(&mut frame.node.value, &mut predecessor.value);
    }
    predecessor
}

/// Physically deletes `element`, a node with at most one child hanging in
/// the hole of the spine's last frame, and returns the new root.
fn delete<K: Clone, V: Clone>(mut spine: Spine<K, V>, element: Node<K, V>) -> Link<K, V> {
    if element.is_red() {
        debug_assert!(element.left.is_none() && element.right.is_none());
        spine.adjust_counts(-1);
        return spine.seal(None);
    }

    if let Some(child) = element.left.as_ref().or(element.right.as_ref()) {
        // The lone child is red; painting it black restores the height.
        let replacement = child.with_color(Color::Black);
        spine.adjust_counts(-1);
        return spine.seal(share(replacement));
    }

    if spine.is_empty() {
        tracing::trace!("remove: deleted the only entry");
        return None;
    }

    spine.adjust_counts(-1);
    repair_double_black(spine, None)
}

/// Restores the black height after a black leaf was deleted.
///
/// The deficient subtree is `focus`, hanging in the hole of the spine's last
/// frame (the parent). Each pass looks at the parent, the sibling on the far
/// side of the hole, and the sibling's children (the nephews):
///
/// 1. far nephew red: rotate the sibling up, done;
/// 2. near nephew red: rotate the near nephew up twice, done;
/// 3. black sibling, red parent: swap their colors, done;
/// 4. black sibling, black parent: paint the sibling red and move the
///    deficiency up to the parent;
/// 5. red sibling: rotate it above the parent and retry at the same
///    deficient node, which now has a black sibling.
///
/// When the deficiency reaches the root the root is painted black.
fn repair_double_black<K: Clone, V: Clone>(
    mut spine: Spine<K, V>,
    mut focus: Link<K, V>,
) -> Link<K, V> {
    loop {
        debug_assert!(!is_red(&focus));
        let Some(mut parent) = spine.pop() else {
            tracing::trace!("remove: double-black deficiency reached the root");
            return blacken(focus);
        };
        let near = parent.side;
        let far = near.opposite();

        debug_assert!(parent.sibling().is_some(), "a deficient side has a sibling");
        let Some(sibling) = parent.node.take_child(far) else {
            focus = Some(parent.fill(focus));
            continue;
        };

        if is_red(sibling.child(far)) {
            let mut sibling = into_owned(sibling);
            let nephew = sibling
                .take_child(far)
                .map(|nephew| ReferenceCounter::new(nephew.with_color(Color::Black)));
            let parent_color = parent.node.color;
            parent.node.set_child(far, sibling.take_child(near));
            parent.node.set_child(near, focus);
            parent.node.color = Color::Black;
            parent.node.recount();
            sibling.set_child(near, share(parent.node));
            sibling.set_child(far, nephew);
            sibling.color = parent_color;
            sibling.recount();
            return spine.seal(share(sibling));
        }

        if let Some(nephew) = sibling
            .child(near)
            .as_ref()
            .filter(|nephew| nephew.is_red())
            .cloned()
        {
            let mut sibling = into_owned(sibling);
            sibling.take_child(near);
            let mut nephew = into_owned(nephew);
            sibling.set_child(near, nephew.take_child(far));
            sibling.color = Color::Black;
            sibling.recount();
            let parent_color = parent.node.color;
            parent.node.set_child(far, nephew.take_child(near));
            parent.node.set_child(near, focus);
            parent.node.color = Color::Black;
            parent.node.recount();
            nephew.set_child(near, share(parent.node));
            nephew.set_child(far, share(sibling));
            nephew.color = parent_color;
            nephew.recount();
            return spine.seal(share(nephew));
        }

        if !sibling.is_red() {
            parent
                .node
                .set_child(far, share(sibling.with_color(Color::Red)));
            if parent.node.is_red() {
                parent.node.color = Color::Black;
                return spine.seal(Some(parent.fill(focus)));
            }
            focus = Some(parent.fill(focus));
            continue;
        }

        // Red sibling: rotate it above the parent. The parent turns red and
        // keeps the deficient hole; its new sibling is the old near nephew.
        let mut sibling = into_owned(sibling);
        parent.node.set_child(far, sibling.take_child(near));
        sibling.color = parent.node.color;
        parent.node.color = Color::Red;
        parent.recount_with(&focus);
        sibling.count = 1 + parent.node.count + count_of(sibling.child(far));
        spine.push(sibling, near);
        spine.push_frame(parent);
    }
}
