//! Shared helpers for integration tests.

#![allow(dead_code)]

use persistent_rbtree::persistent::{Color, NodeRef, PersistentRedBlackTree};
use std::fmt::Debug;

/// Checks every red-black invariant of `tree` and panics with a description
/// of the first violation found.
///
/// - the root is black
/// - no red node has a red child
/// - every path to an empty slot has the same number of black nodes
/// - every node's length equals its actual subtree size
/// - keys are in non-decreasing order
pub fn assert_red_black_invariants<K: Ord + Debug, V>(tree: &PersistentRedBlackTree<K, V>) {
    if let Some(root) = tree.root() {
        assert_eq!(root.color(), Color::Black, "root must be black");
        let (size, _) = check_subtree(root);
        assert_eq!(size, tree.len(), "tree length must equal root count");
    } else {
        assert_eq!(tree.len(), 0);
    }

    let keys: Vec<&K> = tree.keys().collect();
    for pair in keys.windows(2) {
        assert!(pair[0] <= pair[1], "keys out of order: {:?} > {:?}", pair[0], pair[1]);
    }
}

/// Returns (actual size, black height) of the subtree.
fn check_subtree<K: Ord + Debug, V>(node: NodeRef<'_, K, V>) -> (usize, usize) {
    let left = node.left();
    let right = node.right();

    if node.color() == Color::Red {
        for child in [left, right].into_iter().flatten() {
            assert_eq!(
                child.color(),
                Color::Black,
                "red node {:?} has red child {:?}",
                node.key(),
                child.key()
            );
        }
    }
    if let Some(left) = left {
        assert!(left.key() <= node.key(), "left child {:?} > {:?}", left.key(), node.key());
    }
    if let Some(right) = right {
        // Rotations can lift an equal key above its duplicate.
        assert!(right.key() >= node.key(), "right child {:?} < {:?}", right.key(), node.key());
    }

    let (left_size, left_height) = left.map_or((0, 1), check_subtree);
    let (right_size, right_height) = right.map_or((0, 1), check_subtree);
    assert_eq!(
        left_height,
        right_height,
        "black heights differ under {:?}",
        node.key()
    );
    let size = 1 + left_size + right_size;
    assert_eq!(node.len(), size, "count mismatch at {:?}", node.key());
    (size, left_height + usize::from(node.color() == Color::Black))
}

/// Collects the in-order (key, value) sequence of a tree.
pub fn entries<K: Clone, V: Clone>(tree: &PersistentRedBlackTree<K, V>) -> Vec<(K, V)> {
    tree.iter()
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
