//! Key-to-slot derivation for the keyed store
//!
//! A [`Partitioner`] turns an intermediate key into a well-distributed slot
//! number. Only the store consumes the slot value — the engine itself never
//! interprets it. Key equality is the key type's own `Eq` implementation:
//! a partitioner chooses where entries live, never which keys collapse into
//! one entry.

use std::hash::{DefaultHasher, Hash, Hasher};

/// Places keys into storage slots.
///
/// `slot` must be a pure, deterministic function of the key: the same key
/// must always resolve to the same slot within one process, or repeated
/// lookups would land in different buckets. Equal keys (per the key's `Eq`)
/// must therefore derive equal slots.
pub trait Partitioner<K> {
    /// Derive a well-mixed slot number from the key.
    fn slot(&self, key: &K) -> u64;
}

/// Default partitioner for any hashable key type.
///
/// Hashes the key with a fixed-state hasher, then runs the result through a
/// 64-bit avalanche finisher so that sequential or otherwise low-entropy
/// keys still spread evenly across slots.
#[derive(Debug, Clone, Copy, Default)]
pub struct HashPartitioner;

impl<K: Hash> Partitioner<K> for HashPartitioner {
    fn slot(&self, key: &K) -> u64 {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        mix64(hasher.finish())
    }
}

/// splitmix64 finalizer: full-avalanche bit mix of a 64-bit value.
fn mix64(mut z: u64) -> u64 {
    z ^= z >> 30;
    z = z.wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z ^= z >> 27;
    z = z.wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^= z >> 31;
    z
}
