//! The dataset collaborator
//!
//! The engine needs nothing from its input beyond a size and ordered random
//! access, so any contiguous in-memory collection qualifies. The dataset is
//! borrowed read-only for the duration of a job and must not be mutated
//! while workers are traversing it.

/// Read-only, random-access input to an aggregation job.
///
/// `Sync` is a supertrait because multiple workers traverse disjoint ranges
/// of the same dataset concurrently.
pub trait Dataset: Sync {
    type Record;

    /// Total record count.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The record at `index`. Callers only pass indices inside a planned
    /// work range, which is always within `0..len()`.
    fn record(&self, index: usize) -> &Self::Record;
}

impl<R: Sync> Dataset for [R] {
    type Record = R;

    fn len(&self) -> usize {
        <[R]>::len(self)
    }

    fn record(&self, index: usize) -> &R {
        &self[index]
    }
}

impl<R: Sync> Dataset for Vec<R> {
    type Record = R;

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn record(&self, index: usize) -> &R {
        &self[index]
    }
}
