//! End-to-end tests for parallel aggregation jobs

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use keyfold::{combine_fn, map_fn, run, Job, Partitioner, ShardedStore};

/// Counting combine over a small fixed key set: the classic lost-update
/// detector. Every record contributes exactly 1, so per-key totals must be
/// exact for any worker count.
#[test]
fn test_no_lost_updates_under_contention() {
    let mut rng = StdRng::seed_from_u64(7);
    let records: Vec<u8> = (0..20_000).map(|_| rng.random_range(0..5u8)).collect();

    let mut expected = [0u64; 5];
    for &key in &records {
        expected[key as usize] += 1;
    }

    let mapper = map_fn(|key: &u8| (*key, 1u64));
    for workers in [1, 2, 7, 32, 128] {
        let counts = run(&records, &mapper, workers).unwrap();
        for key in 0..5u8 {
            assert_eq!(
                counts[&key], expected[key as usize],
                "count for key {key} with {workers} workers"
            );
        }
    }
}

#[test]
fn test_single_worker_matches_sequential_fold() {
    let records: Vec<u32> = (0..1000).rev().collect();

    let mut expected = std::collections::HashMap::new();
    for record in &records {
        *expected.entry(record % 13).or_insert(0u64) += u64::from(*record);
    }

    let mapper = map_fn(|n: &u32| (n % 13, u64::from(*n)));
    let counts = run(&records, &mapper, 1).unwrap();
    assert_eq!(counts, expected);
}

#[test]
fn test_worker_counts_agree() {
    let records: Vec<u32> = (0..5000).collect();
    let mapper = map_fn(|n: &u32| (n % 100, u64::from(*n)));

    let baseline = run(&records, &mapper, 1).unwrap();
    for workers in [2, 16, records.len()] {
        assert_eq!(run(&records, &mapper, workers).unwrap(), baseline);
    }
}

#[test]
fn test_more_workers_than_records() {
    // chunk truncates to 0; the last worker carries the whole dataset.
    let records = vec![1u32, 2, 3];
    let counts = run(&records, &map_fn(|n: &u32| (*n, 1u64)), 50).unwrap();
    assert_eq!(counts.len(), 3);
    assert!(counts.values().all(|&c| c == 1));
}

#[test]
fn test_empty_dataset_with_many_workers() {
    let records: Vec<u32> = Vec::new();
    let counts = run(&records, &map_fn(|n: &u32| (*n, 1u64)), 16).unwrap();
    assert!(counts.is_empty());
}

#[test]
fn test_custom_combine_tracks_maximum() {
    let mut rng = StdRng::seed_from_u64(99);
    // Readings are strictly positive so the store's default 0 acts as the
    // identity for the max combine.
    let records: Vec<(u8, i64)> = (0..2000)
        .map(|_| (rng.random_range(0..8u8), rng.random_range(1..4000i64)))
        .collect();

    let mut expected = [0i64; 8];
    for &(group, reading) in &records {
        expected[group as usize] = expected[group as usize].max(reading);
    }

    let store: ShardedStore<u8, i64> = ShardedStore::new();
    let mapper = map_fn(|r: &(u8, i64)| (r.0, r.1));
    let max = combine_fn(|into: &mut i64, incoming: i64| {
        if incoming > *into {
            *into = incoming;
        }
    });
    Job::new(&store, &records).exec(&mapper, &max, 8).unwrap();

    for group in 0..8u8 {
        assert_eq!(store.get(&group), Some(expected[group as usize]));
    }
}

#[test]
fn test_custom_partitioner_bucketing() {
    /// Routes even and odd keys to different shard groups.
    struct ParityPartitioner;

    impl Partitioner<u32> for ParityPartitioner {
        fn slot(&self, key: &u32) -> u64 {
            u64::from(*key) << 1 | u64::from(key % 2)
        }
    }

    let records: Vec<u32> = (0..100).collect();
    let store = ShardedStore::with_partitioner(8, ParityPartitioner);
    Job::new(&store, &records)
        .exec(
            &map_fn(|n: &u32| (*n % 10, 1u64)),
            &keyfold::AddCombine,
            4,
        )
        .unwrap();

    assert_eq!(store.len(), 10);
    for key in 0..10u32 {
        assert_eq!(store.get(&key), Some(10));
    }
}

#[test]
fn test_entry_equality_is_key_equality_under_custom_partitioner() {
    /// Slots by string length, so distinct keys of equal length share a
    /// shard. Which entry a value folds into must still follow the key's
    /// `Eq`, not the slot.
    struct LenPartitioner;

    impl Partitioner<String> for LenPartitioner {
        fn slot(&self, key: &String) -> u64 {
            key.len() as u64
        }
    }

    let records = vec![
        "spam".to_string(),
        "eggs".to_string(),
        "spam".to_string(),
        "spam".to_string(),
    ];
    let store: ShardedStore<String, u64, LenPartitioner> =
        ShardedStore::with_partitioner(4, LenPartitioner);
    Job::new(&store, &records)
        .exec_with_defaults(&map_fn(|w: &String| (w.clone(), 1u64)), 2)
        .unwrap();

    // "spam" and "eggs" collide on slot but stay separate entries; the
    // three separately-allocated "spam" instances collapse into one.
    assert_eq!(store.len(), 2);
    assert_eq!(store.get(&"spam".to_string()), Some(3));
    assert_eq!(store.get(&"eggs".to_string()), Some(1));
}

#[test]
fn test_results_survive_two_jobs_into_one_store() {
    // The store belongs to the caller; a second exec keeps folding into
    // whatever already accumulated.
    let store: ShardedStore<u32, u64> = ShardedStore::new();
    let first: Vec<u32> = (0..50).collect();
    let second: Vec<u32> = (0..50).collect();
    let mapper = map_fn(|n: &u32| (n % 5, 1u64));

    Job::new(&store, &first)
        .exec(&mapper, &keyfold::AddCombine, 4)
        .unwrap();
    Job::new(&store, &second)
        .exec(&mapper, &keyfold::AddCombine, 4)
        .unwrap();

    for key in 0..5u32 {
        assert_eq!(store.get(&key), Some(20));
    }
}
