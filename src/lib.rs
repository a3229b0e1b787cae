//! # Keyfold
//!
//! An in-process, single-machine parallel aggregation engine: the in-memory
//! analogue of MapReduce, without distributed scheduling or disk-backed
//! shuffling. A fixed dataset is split into contiguous ranges, one per
//! worker thread; each worker maps its records to (key, value) pairs and
//! folds the values into a shared keyed store, synchronizing only at the
//! granularity of an individual key.
//!
//! ## Usage
//!
//! ```
//! use keyfold::{map_fn, run};
//!
//! let lines = vec!["to be", "or not", "to be"];
//! let counts = run(&lines, &map_fn(|line: &&str| (line.to_string(), 1u64)), 3)?;
//! assert_eq!(counts["to be"], 2);
//! # Ok::<(), keyfold::KeyfoldError>(())
//! ```
//!
//! For customized combining or storage, assemble a [`Job`] by hand:
//!
//! ```
//! use keyfold::{combine_fn, map_fn, Job, ShardedStore};
//!
//! let readings = vec![3i64, 9, 4, 7];
//! let store: ShardedStore<&'static str, i64> = ShardedStore::new();
//! let max = combine_fn(|into: &mut i64, incoming: i64| *into = (*into).max(incoming));
//! Job::new(&store, &readings).exec(&map_fn(|r: &i64| ("max", *r)), &max, 2)?;
//! assert_eq!(store.get(&"max"), Some(9));
//! # Ok::<(), keyfold::KeyfoldError>(())
//! ```
//!
//! ## Modules
//!
//! - `mapper` - The record-to-(key, value) transformation contract
//! - `combine` - Associative accumulators folding values that share a key
//! - `partition` - Key-to-slot derivation for the keyed store
//! - `store` - Shared keyed storage with per-key mutual exclusion
//! - `plan` - Pure partitioning of dataset indices into work ranges
//! - `worker` - The sequential map+fold loop over one range
//! - `job` - Coordination: partition, fork, join
//! - `dataset` - The read-only random-access input contract
//! - `error` - Structured error types for aggregation jobs
//!
//! ## Determinism
//!
//! Merges for one key coming from different workers are serialized but
//! applied in an unspecified order. The final value for a key is therefore
//! deterministic only when the combiner is commutative and associative over
//! that key's values; supplying one is a caller obligation the engine does
//! not check.

pub mod combine;
pub mod dataset;
pub mod error;
pub mod job;
pub mod mapper;
pub mod partition;
pub mod plan;
pub mod store;
pub mod worker;


pub use combine::{combine_fn, AddCombine, Combine, FnCombine};
pub use dataset::Dataset;
pub use error::{KeyfoldError, Result};
pub use job::{run, Job};
pub use mapper::{map_fn, FnMapper, Mapper};
pub use partition::{HashPartitioner, Partitioner};
pub use plan::{plan_ranges, WorkRange};
pub use store::{KeyedStore, ShardedStore};
pub use worker::Worker;
