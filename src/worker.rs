//! The per-range worker loop
//!
//! One worker owns one contiguous slice of the dataset. Its whole life is a
//! single pass over that slice: map the record, then merge the mapped value
//! into the shared store under that key's exclusion. Nothing else is ever
//! touched, so two workers only meet at the store, and only when they hit
//! the same key.

use tracing::debug;

use crate::combine::Combine;
use crate::dataset::Dataset;
use crate::mapper::Mapper;
use crate::plan::WorkRange;
use crate::store::KeyedStore;

/// A unit of sequential execution over one [`WorkRange`].
pub struct Worker<'a, D: ?Sized, S, M, C> {
    store: &'a S,
    dataset: &'a D,
    mapper: &'a M,
    combine: &'a C,
    range: WorkRange,
}

impl<'a, D, S, M, C> Worker<'a, D, S, M, C>
where
    D: Dataset + ?Sized,
    M: Mapper<D::Record>,
    S: KeyedStore<M::Key, M::Value>,
    C: Combine<M::Value>,
{
    pub fn new(store: &'a S, dataset: &'a D, mapper: &'a M, combine: &'a C, range: WorkRange) -> Self {
        Worker {
            store,
            dataset,
            mapper,
            combine,
            range,
        }
    }

    /// Process the assigned range in dataset order.
    ///
    /// No internal retry: a panic in the mapper or combiner unwinds out of
    /// the worker thread and leaves the rest of this range unprocessed.
    pub fn run(&self) {
        debug!(
            "worker processing records {}..{} ({} records)",
            self.range.start,
            self.range.end,
            self.range.len()
        );
        for index in self.range.start..self.range.end {
            let record = self.dataset.record(index);
            let key = self.mapper.key(record);
            let value = self.mapper.value(record);
            self.store.update(key, |slot| self.combine.merge(slot, value));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combine::AddCombine;
    use crate::mapper::map_fn;
    use crate::store::ShardedStore;

    #[test]
    fn test_worker_folds_its_range() {
        let records: Vec<u32> = (0..10).collect();
        let store: ShardedStore<u32, u32> = ShardedStore::new();
        let mapper = map_fn(|n: &u32| (n % 2, 1u32));

        let worker = Worker::new(
            &store,
            &records,
            &mapper,
            &AddCombine,
            WorkRange { start: 0, end: 10 },
        );
        worker.run();

        assert_eq!(store.get(&0), Some(5));
        assert_eq!(store.get(&1), Some(5));
    }

    #[test]
    fn test_worker_ignores_records_outside_range() {
        let records: Vec<u32> = (0..10).collect();
        let store: ShardedStore<u32, u32> = ShardedStore::new();
        let mapper = map_fn(|n: &u32| (*n, 1u32));

        let worker = Worker::new(
            &store,
            &records,
            &mapper,
            &AddCombine,
            WorkRange { start: 3, end: 6 },
        );
        worker.run();

        assert_eq!(store.len(), 3);
        assert_eq!(store.get(&3), Some(1));
        assert_eq!(store.get(&9), None);
    }

    #[test]
    fn test_empty_range_touches_nothing() {
        let records: Vec<u32> = (0..10).collect();
        let store: ShardedStore<u32, u32> = ShardedStore::new();
        let mapper = map_fn(|n: &u32| (*n, 1u32));

        let worker = Worker::new(
            &store,
            &records,
            &mapper,
            &AddCombine,
            WorkRange { start: 4, end: 4 },
        );
        worker.run();

        assert!(store.is_empty());
    }
}
