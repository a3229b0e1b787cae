//! Shared keyed storage with per-key mutual exclusion
//!
//! Workers fold values into one store concurrently; the store's only job is
//! to hand each caller exclusive access to the accumulated value for one
//! key, while callers working on unrelated keys proceed in parallel. The
//! raw lock/unlock pair of classic designs is expressed here as a scoped
//! critical section ([`KeyedStore::update`]) so a lock can never leak.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::partition::{HashPartitioner, Partitioner};

/// Capability the engine requires of its output store.
pub trait KeyedStore<K, V> {
    /// Run `apply` with exclusive access to the accumulated value for `key`,
    /// default-creating the entry on first access.
    ///
    /// Calls for the same key are serialized; calls for different keys must
    /// be able to proceed in parallel without contending on a global lock.
    fn update(&self, key: K, apply: impl FnOnce(&mut V));
}

const DEFAULT_SHARD_COUNT: usize = 64;

/// A fixed array of hash-map shards, each behind its own mutex.
///
/// The partitioner's slot derivation picks the shard, so two keys contend
/// only when they land in the same shard. Within a shard, entry identity is
/// the key's `Eq` implementation: keys that compare equal fold into one
/// entry no matter which partitioner routed them there. Shard count is
/// rounded up to a power of two and fixed for the lifetime of the store.
///
/// The read-side accessors ([`get`](Self::get), [`len`](Self::len),
/// [`for_each`](Self::for_each), [`into_map`](Self::into_map)) also take
/// shard locks; they are meant for the quiescent phase after a job returns.
pub struct ShardedStore<K, V, P = HashPartitioner> {
    shards: Box<[Mutex<HashMap<K, V>>]>,
    mask: u64,
    partitioner: P,
}

impl<K: Hash + Eq, V> ShardedStore<K, V> {
    pub fn new() -> Self {
        Self::with_shards(DEFAULT_SHARD_COUNT)
    }

    pub fn with_shards(shard_count: usize) -> Self {
        Self::with_partitioner(shard_count, HashPartitioner)
    }
}

impl<K: Hash + Eq, V> Default for ShardedStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, P> ShardedStore<K, V, P>
where
    K: Hash + Eq,
    P: Partitioner<K>,
{
    pub fn with_partitioner(shard_count: usize, partitioner: P) -> Self {
        let count = shard_count.next_power_of_two();
        let shards: Vec<Mutex<HashMap<K, V>>> =
            (0..count).map(|_| Mutex::new(HashMap::new())).collect();
        ShardedStore {
            shards: shards.into_boxed_slice(),
            mask: (count - 1) as u64,
            partitioner,
        }
    }

    /// Lock the shard owning `key`.
    ///
    /// A poisoned shard means some worker panicked mid-merge; the store is
    /// already documented as unspecified after such a failure, so we keep
    /// serving whatever state the shard holds.
    fn shard(&self, key: &K) -> MutexGuard<'_, HashMap<K, V>> {
        let index = (self.partitioner.slot(key) & self.mask) as usize;
        self.shards[index]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Clone out the accumulated value for `key`, if the key has been seen.
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.shard(key).get(key).cloned()
    }

    /// Number of distinct keys observed so far.
    pub fn len(&self) -> usize {
        self.shards
            .iter()
            .map(|shard| shard.lock().unwrap_or_else(PoisonError::into_inner).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Visit every (key, accumulated value) pair, one shard at a time.
    /// Iteration order is unspecified.
    pub fn for_each(&self, mut f: impl FnMut(&K, &V)) {
        for shard in self.shards.iter() {
            let guard = shard.lock().unwrap_or_else(PoisonError::into_inner);
            for (key, value) in guard.iter() {
                f(key, value);
            }
        }
    }

    /// Consume the store and collect the final result into one map.
    pub fn into_map(self) -> HashMap<K, V> {
        let mut map = HashMap::with_capacity(self.len());
        for shard in self.shards.into_vec() {
            map.extend(shard.into_inner().unwrap_or_else(PoisonError::into_inner));
        }
        map
    }
}

impl<K, V, P> KeyedStore<K, V> for ShardedStore<K, V, P>
where
    K: Hash + Eq,
    V: Default,
    P: Partitioner<K>,
{
    fn update(&self, key: K, apply: impl FnOnce(&mut V)) {
        let mut shard = self.shard(&key);
        apply(shard.entry(key).or_default());
    }
}
