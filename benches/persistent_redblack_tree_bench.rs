//! Benchmark for PersistentRedBlackTree vs standard BTreeMap.
//!
//! Compares the versioned red-black tree against Rust's standard BTreeMap
//! for common operations. The BTreeMap numbers are the cost floor of an
//! ephemeral map; the gap is the price of keeping every version alive.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use persistent_rbtree::persistent::PersistentRedBlackTree;
use std::collections::BTreeMap;
use std::hint::black_box;
use std::ops::ControlFlow;

const SIZES: [i32; 3] = [100, 1000, 10000];

// =============================================================================
// insert Benchmark
// =============================================================================

fn benchmark_insert(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("insert");

    for size in SIZES {
        group.bench_with_input(
            BenchmarkId::new("PersistentRedBlackTree", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut tree = PersistentRedBlackTree::new();
                    for index in 0..size {
                        tree = tree.insert(black_box(index), black_box(index * 2));
                    }
                    black_box(tree)
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("BTreeMap", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut map = BTreeMap::new();
                    for index in 0..size {
                        map.insert(black_box(index), black_box(index * 2));
                    }
                    black_box(map)
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// get Benchmark
// =============================================================================

fn benchmark_get(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("get");

    for size in SIZES {
        let tree: PersistentRedBlackTree<i32, i32> =
            (0..size).map(|index| (index, index * 2)).collect();
        let standard_map: BTreeMap<i32, i32> = (0..size).map(|index| (index, index * 2)).collect();

        group.bench_with_input(
            BenchmarkId::new("PersistentRedBlackTree", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut sum = 0;
                    for key in 0..size {
                        if let Some(&value) = tree.get(&black_box(key)) {
                            sum += value;
                        }
                    }
                    black_box(sum)
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("BTreeMap", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut sum = 0;
                    for key in 0..size {
                        if let Some(&value) = standard_map.get(&black_box(key)) {
                            sum += value;
                        }
                    }
                    black_box(sum)
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// remove Benchmark
// =============================================================================

fn benchmark_remove(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("remove");

    for size in SIZES {
        let tree: PersistentRedBlackTree<i32, i32> =
            (0..size).map(|index| (index, index * 2)).collect();
        let standard_map: BTreeMap<i32, i32> = (0..size).map(|index| (index, index * 2)).collect();

        group.bench_with_input(
            BenchmarkId::new("PersistentRedBlackTree", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut current = tree.clone();
                    for key in 0..size {
                        current = current.remove(&black_box(key));
                    }
                    black_box(current)
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("BTreeMap", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut map = standard_map.clone();
                    for key in 0..size {
                        map.remove(&black_box(key));
                    }
                    black_box(map)
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// find + remove Benchmark
// =============================================================================

fn benchmark_locator_remove(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("locator_remove");

    for size in SIZES {
        let tree: PersistentRedBlackTree<i32, i32> =
            (0..size).map(|index| (index, index * 2)).collect();

        group.bench_with_input(
            BenchmarkId::new("find_then_remove", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let locator = tree.find(&black_box(size / 2));
                    black_box(locator.remove())
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("remove_at", size),
            &size,
            |bencher, &size| {
                let locator = tree.find(&(size / 2));
                bencher.iter(|| black_box(tree.remove_at(black_box(&locator))));
            },
        );
    }

    group.finish();
}

// =============================================================================
// traversal Benchmark
// =============================================================================

fn benchmark_traversal(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("traversal");

    for size in SIZES {
        let tree: PersistentRedBlackTree<i32, i32> =
            (0..size).map(|index| (index, index * 2)).collect();
        let standard_map: BTreeMap<i32, i32> = (0..size).map(|index| (index, index * 2)).collect();

        group.bench_with_input(BenchmarkId::new("for_each", size), &size, |bencher, _| {
            bencher.iter(|| {
                let mut sum = 0;
                tree.for_each(|node| {
                    sum += *node.value();
                    ControlFlow::<()>::Continue(())
                });
                black_box(sum)
            });
        });

        group.bench_with_input(BenchmarkId::new("iter", size), &size, |bencher, _| {
            bencher.iter(|| {
                let sum: i32 = tree.values().sum();
                black_box(sum)
            });
        });

        group.bench_with_input(BenchmarkId::new("BTreeMap", size), &size, |bencher, _| {
            bencher.iter(|| {
                let sum: i32 = standard_map.values().sum();
                black_box(sum)
            });
        });
    }

    group.finish();
}

// =============================================================================
// Criterion Group and Main
// =============================================================================

criterion_group!(
    benches,
    benchmark_insert,
    benchmark_get,
    benchmark_remove,
    benchmark_locator_remove,
    benchmark_traversal
);

criterion_main!(benches);
