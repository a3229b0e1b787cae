//! Job coordination: partition, fork, join
//!
//! A [`Job`] binds one output store and one dataset for a single run.
//! [`Job::exec`] plans the static split, spawns one scoped thread per
//! range, and joins every worker before returning — the fork-join barrier
//! is an explicit step, not a side effect of object teardown. Threads are
//! created fresh per call; there is no pool, no cancellation, and no
//! timeout.

use std::any::Any;
use std::collections::HashMap;
use std::hash::Hash;
use std::ops::AddAssign;
use std::thread;

use tracing::{debug, warn};

use crate::combine::{AddCombine, Combine};
use crate::dataset::Dataset;
use crate::error::{KeyfoldError, Result};
use crate::mapper::Mapper;
use crate::plan::plan_ranges;
use crate::store::{KeyedStore, ShardedStore};
use crate::worker::Worker;

/// One aggregation run: an output store, a dataset, and the behaviors to
/// apply over it.
///
/// The store is owned by the caller and outlives the job; the dataset is
/// borrowed read-only and must not be mutated while `exec` is running.
pub struct Job<'a, D: ?Sized, S> {
    store: &'a S,
    dataset: &'a D,
}

impl<'a, D, S> Job<'a, D, S>
where
    D: Dataset + ?Sized,
{
    pub fn new(store: &'a S, dataset: &'a D) -> Self {
        Job { store, dataset }
    }

    /// Run the aggregation with `worker_count` concurrent workers.
    ///
    /// Blocks until every worker has completed. On success the store holds
    /// the final accumulated value for every key observed anywhere in the
    /// dataset. On failure — a worker panic or a thread that could not be
    /// spawned — the first failure is reported after all started workers
    /// have been joined, and the store contents are partial and
    /// unspecified.
    pub fn exec<M, C>(&self, mapper: &M, combine: &C, worker_count: usize) -> Result<()>
    where
        M: Mapper<D::Record> + Sync,
        S: KeyedStore<M::Key, M::Value> + Sync,
        C: Combine<M::Value> + Sync,
    {
        if worker_count == 0 {
            return Err(KeyfoldError::InvalidWorkerCount {
                requested: worker_count,
            });
        }

        let ranges = plan_ranges(self.dataset.len(), worker_count);
        debug!(
            "executing job: {} records across {} workers",
            self.dataset.len(),
            worker_count
        );

        thread::scope(|scope| {
            let mut handles = Vec::with_capacity(ranges.len());
            let mut spawn_error = None;
            for (index, range) in ranges.into_iter().enumerate() {
                let worker = Worker::new(self.store, self.dataset, mapper, combine, range);
                let spawned = thread::Builder::new()
                    .name(format!("keyfold-worker-{index}"))
                    .spawn_scoped(scope, move || worker.run());
                match spawned {
                    Ok(handle) => handles.push(handle),
                    Err(source) => {
                        spawn_error = Some(KeyfoldError::WorkerSpawn {
                            worker: index,
                            source,
                        });
                        break;
                    }
                }
            }

            // Join every started worker in order. The barrier holds even
            // when one of them failed: later workers run to completion
            // before the error surfaces.
            let mut first_panic = None;
            for (index, handle) in handles.into_iter().enumerate() {
                if let Err(payload) = handle.join() {
                    warn!("worker {index} panicked");
                    if first_panic.is_none() {
                        first_panic = Some(KeyfoldError::WorkerPanicked {
                            worker: index,
                            message: panic_message(payload.as_ref()),
                        });
                    }
                }
            }

            match spawn_error.or(first_panic) {
                Some(err) => Err(err),
                None => Ok(()),
            }
        })
    }

    /// Run the aggregation with the default `+=` combiner.
    ///
    /// The typical job shape: the caller keeps ownership of the store and
    /// customizes only the mapping, accumulation stays `AddAssign`.
    ///
    /// ```
    /// use keyfold::{map_fn, Job, ShardedStore};
    ///
    /// let records = vec![3u32, 1, 3, 7];
    /// let store: ShardedStore<u32, u64> = ShardedStore::new();
    /// Job::new(&store, &records).exec_with_defaults(&map_fn(|n: &u32| (*n, 1u64)), 2)?;
    /// assert_eq!(store.get(&3), Some(2));
    /// # Ok::<(), keyfold::KeyfoldError>(())
    /// ```
    pub fn exec_with_defaults<M>(&self, mapper: &M, worker_count: usize) -> Result<()>
    where
        M: Mapper<D::Record> + Sync,
        S: KeyedStore<M::Key, M::Value> + Sync,
        M::Value: AddAssign,
    {
        self.exec(mapper, &AddCombine, worker_count)
    }
}

/// Run the typical job: hash-sharded store, `+=` accumulation, results
/// collected into a plain map.
///
/// ```
/// use keyfold::{map_fn, run};
///
/// let words = vec!["the", "quick", "the", "fox"];
/// let counts = run(&words, &map_fn(|w: &&str| (w.to_string(), 1u64)), 2)?;
/// assert_eq!(counts["the"], 2);
/// assert_eq!(counts["fox"], 1);
/// # Ok::<(), keyfold::KeyfoldError>(())
/// ```
pub fn run<D, M>(
    dataset: &D,
    mapper: &M,
    worker_count: usize,
) -> Result<HashMap<M::Key, M::Value>>
where
    D: Dataset + ?Sized,
    M: Mapper<D::Record> + Sync,
    M::Key: Hash + Eq + Send,
    M::Value: Default + AddAssign + Send,
{
    let store = ShardedStore::new();
    Job::new(&store, dataset).exec_with_defaults(mapper, worker_count)?;
    Ok(store.into_map())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
