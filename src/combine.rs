//! The associative accumulator
//!
//! A [`Combine`] folds an incoming intermediate value into the value already
//! stored for the same key. The engine serializes all merges for one key, so
//! an implementation never needs interior synchronization — it only has to
//! be correct under sequential application.
//!
//! For the final result to be independent of thread scheduling, the merge
//! operation must be commutative and associative over the values contributed
//! to a key: two workers touching the same key apply their merges in an
//! unspecified order. This is a caller obligation, not something the engine
//! checks at runtime.

use std::marker::PhantomData;
use std::ops::AddAssign;

/// Folds one incoming value into the accumulated value for a key, in place.
pub trait Combine<V> {
    fn merge(&self, into: &mut V, incoming: V);
}

/// The default combiner: accumulation via `+=`.
///
/// Covers counting and summing for every numeric type, and any user type
/// that implements [`AddAssign`] with commutative-associative semantics.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddCombine;

impl<V: AddAssign> Combine<V> for AddCombine {
    fn merge(&self, into: &mut V, incoming: V) {
        *into += incoming;
    }
}

/// Adapter that lifts a plain `Fn(&mut V, V)` closure into a [`Combine`].
pub struct FnCombine<F, V> {
    f: F,
    _marker: PhantomData<fn(&mut V, V)>,
}

/// Build a [`Combine`] from a closure.
///
/// ```
/// use keyfold::{combine_fn, Combine};
///
/// let max = combine_fn(|into: &mut u32, incoming: u32| {
///     if incoming > *into {
///         *into = incoming;
///     }
/// });
/// let mut acc = 3;
/// max.merge(&mut acc, 7);
/// max.merge(&mut acc, 5);
/// assert_eq!(acc, 7);
/// ```
pub fn combine_fn<F, V>(f: F) -> FnCombine<F, V>
where
    F: Fn(&mut V, V),
{
    FnCombine {
        f,
        _marker: PhantomData,
    }
}

impl<F, V> Combine<V> for FnCombine<F, V>
where
    F: Fn(&mut V, V),
{
    fn merge(&self, into: &mut V, incoming: V) {
        (self.f)(into, incoming)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_combine_sums() {
        let combine = AddCombine;
        let mut acc = 0u64;
        for v in 1..=10 {
            combine.merge(&mut acc, v);
        }
        assert_eq!(acc, 55);
    }

    #[test]
    fn test_add_combine_on_string() {
        // String's += appends; order-dependent, but still a valid fold for a
        // single-worker run.
        let combine = AddCombine;
        let mut acc = String::from("map");
        combine.merge(&mut acc, "reduce");
        assert_eq!(acc, "mapreduce");
    }

    #[test]
    fn test_closure_combine_min() {
        let min = combine_fn(|into: &mut i64, incoming: i64| {
            if incoming < *into {
                *into = incoming;
            }
        });
        let mut acc = 100;
        min.merge(&mut acc, 42);
        min.merge(&mut acc, 77);
        assert_eq!(acc, 42);
    }

    #[test]
    fn test_chained_merges_match_sequential_fold() {
        let combine = AddCombine;
        let values = [3u32, 1, 4, 1, 5, 9, 2, 6];
        let mut acc = u32::default();
        for v in values {
            combine.merge(&mut acc, v);
        }
        assert_eq!(acc, values.iter().sum());
    }
}
