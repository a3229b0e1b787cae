//! Pure work-partitioning logic
//!
//! These functions decide which slice of the dataset each worker owns without
//! performing any I/O or touching any shared state, so they are directly
//! unit-testable.

use tracing::trace;

/// A half-open index interval `[start, end)` over the dataset, owned by
/// exactly one worker for the duration of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkRange {
    pub start: usize,
    pub end: usize,
}

impl WorkRange {
    /// Number of records in the range.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Split `[0, dataset_len)` into `worker_count` contiguous ranges.
///
/// Every worker except the last receives exactly `dataset_len / worker_count`
/// records; the last worker receives the remainder on top of its share. The
/// split is static and assumes roughly uniform per-record cost — there is no
/// rebalancing once workers start.
///
/// When `worker_count` exceeds `dataset_len` the division truncates to zero,
/// every leading range is empty, and the last worker processes the whole
/// dataset alone. That collapses parallelism but loses nothing.
///
/// Returns an empty plan for `worker_count == 0`; callers validate the count
/// before planning.
pub fn plan_ranges(dataset_len: usize, worker_count: usize) -> Vec<WorkRange> {
    if worker_count == 0 {
        return Vec::new();
    }

    let chunk = dataset_len / worker_count;
    let mut ranges = Vec::with_capacity(worker_count);
    for i in 0..worker_count - 1 {
        ranges.push(WorkRange {
            start: chunk * i,
            end: chunk * (i + 1),
        });
    }
    ranges.push(WorkRange {
        start: chunk * (worker_count - 1),
        end: dataset_len,
    });

    trace!(
        "planned {} ranges over {} records (chunk size {})",
        ranges.len(),
        dataset_len,
        chunk
    );
    ranges
}
