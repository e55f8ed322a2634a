//! Property-based tests for PersistentRedBlackTree.
//!
//! These tests check the balancing invariants after every mutation and the
//! observable laws of a versioned multimap against a sorted `Vec` model.

mod common;

use common::{assert_red_black_invariants, entries};
use persistent_rbtree::persistent::PersistentRedBlackTree;
use proptest::prelude::*;

// =============================================================================
// Strategies for Generating Test Data
// =============================================================================

#[derive(Clone, Debug)]
enum Operation {
    Insert(i16, i32),
    Remove(i16),
}

/// Small key range so that removals and duplicates actually hit.
fn arbitrary_operation() -> impl Strategy<Value = Operation> {
    prop_oneof![
        3 => (-64_i16..64, any::<i32>()).prop_map(|(key, value)| Operation::Insert(key, value)),
        2 => (-64_i16..64).prop_map(Operation::Remove),
    ]
}

fn arbitrary_tree(max_size: usize) -> impl Strategy<Value = PersistentRedBlackTree<i16, i32>> {
    prop::collection::vec((-64_i16..64, any::<i32>()), 0..max_size)
        .prop_map(|entries| entries.into_iter().collect())
}

fn count_key(tree: &PersistentRedBlackTree<i16, i32>, key: i16) -> usize {
    tree.keys().filter(|candidate| **candidate == key).count()
}

// =============================================================================
// Invariant Laws
// =============================================================================

proptest! {
    /// Every version produced by a random operation sequence is a valid
    /// red-black tree holding the same key multiset as the model.
    #[test]
    fn prop_invariants_hold_after_every_operation(
        operations in prop::collection::vec(arbitrary_operation(), 0..200)
    ) {
        let mut tree = PersistentRedBlackTree::new();
        let mut model: Vec<i16> = Vec::new();
        for operation in operations {
            match operation {
                Operation::Insert(key, value) => {
                    tree = tree.insert(key, value);
                    let position = model.partition_point(|candidate| *candidate < key);
                    model.insert(position, key);
                }
                Operation::Remove(key) => {
                    tree = tree.remove(&key);
                    if let Ok(position) = model.binary_search(&key) {
                        model.remove(position);
                    }
                }
            }
            assert_red_black_invariants(&tree);
            let keys: Vec<i16> = tree.keys().copied().collect();
            prop_assert_eq!(keys, model.clone());
        }
    }

    /// Law: traversal order is sorted and visits every entry once.
    #[test]
    fn prop_iteration_is_sorted(tree in arbitrary_tree(100)) {
        let keys: Vec<i16> = tree.keys().copied().collect();
        let mut sorted = keys.clone();
        sorted.sort_unstable();
        prop_assert_eq!(keys.len(), tree.len());
        prop_assert_eq!(keys, sorted);
    }
}

// =============================================================================
// Insert and Remove Laws
// =============================================================================

proptest! {
    /// Law: a key is found after it is inserted.
    #[test]
    fn prop_find_after_insert(tree in arbitrary_tree(50), key in -64_i16..64, value: i32) {
        let updated = tree.insert(key, value);
        prop_assert!(updated.find(&key).is_found());
        prop_assert_eq!(updated.len(), tree.len() + 1);
        prop_assert_eq!(count_key(&updated, key), count_key(&tree, key) + 1);
    }

    /// Law: removing an absent key yields an equal tree.
    #[test]
    fn prop_remove_absent_is_identity(tree in arbitrary_tree(50), key in 64_i16..128) {
        let removed = tree.remove(&key);
        prop_assert_eq!(&removed, &tree);
        prop_assert_eq!(removed.len(), tree.len());
    }

    /// Law: remove drops exactly one entry for a present key.
    #[test]
    fn prop_remove_present_drops_one(tree in arbitrary_tree(50), key in -64_i16..64) {
        let before = count_key(&tree, key);
        let removed = tree.remove(&key);
        prop_assert_eq!(count_key(&removed, key), before.saturating_sub(1));
        prop_assert_eq!(removed.len(), tree.len() - usize::from(before > 0));
    }

    /// Law: inserting a fresh key and removing it again restores the entries.
    #[test]
    fn prop_insert_remove_round_trip(tree in arbitrary_tree(50), key in 64_i16..128, value: i32) {
        let round_trip = tree.insert(key, value).remove(&key);
        prop_assert_eq!(entries(&round_trip), entries(&tree));
    }

    /// Law: mutations never change a version that is still held.
    #[test]
    fn prop_versions_are_persistent(
        tree in arbitrary_tree(50),
        operations in prop::collection::vec(arbitrary_operation(), 0..50)
    ) {
        let snapshot = entries(&tree);
        let mut current = tree.clone();
        for operation in operations {
            current = match operation {
                Operation::Insert(key, value) => current.insert(key, value),
                Operation::Remove(key) => current.remove(&key),
            };
        }
        prop_assert_eq!(entries(&tree), snapshot);
        assert_red_black_invariants(&tree);
    }
}

// =============================================================================
// Locator Laws
// =============================================================================

proptest! {
    /// Law: removing through a locator equals removing by key.
    #[test]
    fn prop_locator_remove_matches_remove(tree in arbitrary_tree(50), key in -64_i16..64) {
        let by_locator = tree.find(&key).remove();
        prop_assert_eq!(entries(&by_locator), entries(&tree.remove(&key)));
    }

    /// Law: the locator path length equals the depth of the node found.
    #[test]
    fn prop_locator_depth_bounded(tree in arbitrary_tree(100), key in -64_i16..64) {
        let locator = tree.find(&key);
        if locator.is_found() {
            // A red-black tree is at most twice as deep as a perfect one.
            let bound = 2 * (usize::BITS - tree.len().leading_zeros()) as usize;
            prop_assert!(locator.depth() <= bound.max(1));
        } else {
            prop_assert_eq!(locator.depth(), 0);
        }
    }

    /// Law: a locator taken from another version is rejected.
    #[test]
    fn prop_remove_at_rejects_other_version(
        tree in arbitrary_tree(50),
        key in -64_i16..64,
        value: i32
    ) {
        let locator = tree.find(&key);
        let later = tree.insert(key, value);
        prop_assert!(later.remove_at(&locator).is_err());
        prop_assert!(tree.remove_at(&locator).is_ok());
    }
}

// =============================================================================
// Order Statistics Laws
// =============================================================================

proptest! {
    /// Law: nth(rank(key)) is the first entry not less than key.
    #[test]
    fn prop_nth_rank_consistent(tree in arbitrary_tree(100), key in -70_i16..70) {
        let rank = tree.rank(&key);
        prop_assert_eq!(rank, tree.keys().filter(|candidate| **candidate < key).count());
        let expected = tree.iter().find(|(candidate, _)| **candidate >= key);
        prop_assert_eq!(tree.nth(rank), expected);
    }

    /// Law: first and last are the extremes of the iteration.
    #[test]
    fn prop_first_last(tree in arbitrary_tree(100)) {
        prop_assert_eq!(tree.first(), tree.iter().next());
        prop_assert_eq!(tree.last(), tree.iter().last());
    }
}
