//! The record-to-(key, value) transformation
//!
//! A [`Mapper`] turns one input record into one intermediate key and one
//! intermediate value. Both operations must be pure: deterministic functions
//! of the record alone, with no side effects and no dependency on which
//! worker calls them or in what order. Mapping cannot fail — a mapper whose
//! underlying computation can fail must fold the failure into a sentinel
//! value the combiner knows how to ignore.

use std::marker::PhantomData;

/// Derives the intermediate key and value for a single record.
///
/// `key` and `value` may each be called any number of times per record, so
/// both must be cheap or memoized by the implementor.
pub trait Mapper<R> {
    type Key;
    type Value;

    /// Compute the intermediate key of a record.
    fn key(&self, record: &R) -> Self::Key;

    /// Compute the intermediate value of a record.
    fn value(&self, record: &R) -> Self::Value;
}

/// Adapter that lifts a plain `Fn(&R) -> (K, V)` closure into a [`Mapper`].
pub struct FnMapper<F, R, K, V> {
    f: F,
    _marker: PhantomData<fn(&R) -> (K, V)>,
}

/// Build a [`Mapper`] from a closure producing the whole (key, value) pair.
///
/// ```
/// use keyfold::{map_fn, Mapper};
///
/// let mapper = map_fn(|word: &&str| (word.len(), 1usize));
/// assert_eq!(mapper.key(&"hello"), 5);
/// assert_eq!(mapper.value(&"hello"), 1);
/// ```
pub fn map_fn<F, R, K, V>(f: F) -> FnMapper<F, R, K, V>
where
    F: Fn(&R) -> (K, V),
{
    FnMapper {
        f,
        _marker: PhantomData,
    }
}

impl<F, R, K, V> Mapper<R> for FnMapper<F, R, K, V>
where
    F: Fn(&R) -> (K, V),
{
    type Key = K;
    type Value = V;

    fn key(&self, record: &R) -> K {
        (self.f)(record).0
    }

    fn value(&self, record: &R) -> V {
        (self.f)(record).1
    }
}
