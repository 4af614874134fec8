use alloc::vec::Vec;
use core::mem;

use crate::{NonEmpty, Outcome, accumulation};

/// Extension methods for iterators of accumulating outcomes.
///
/// These are the iterator-adaptor spelling of
/// [`accumulation::combined`]: collect every `Good` value into a container,
/// or every error from every `Bad` into one [`NonEmpty`], rather than
/// stopping at the first failure the way collecting into a
/// `Result<_, E>` does.
///
/// # Examples
///
/// ```
/// use accrue::prelude::*;
///
/// let inputs = vec!["1", "2", "invalid", "4", "bad"];
///
/// // Collecting into a `Result` stops at the first error.
/// let standard: Result<Vec<u8>, _> = inputs.iter().map(|s| s.parse::<u8>()).collect();
/// assert!(standard.is_err()); // stopped at "invalid", never saw "bad"
///
/// // collect_combined_vec keeps going and reports every error.
/// let all: Outcome<Vec<u8>, NonEmpty<_>> = inputs
///     .iter()
///     .map(|s| Outcome::from_result(s.parse::<u8>()).accumulating())
///     .collect_combined_vec();
///
/// let errors = all.unwrap_bad();
/// assert_eq!(errors.len(), 2); // both "invalid" and "bad" collected
/// ```
///
/// [`accumulation::combined`]: crate::accumulation::combined
pub trait IteratorExt<G, E>: Sized + Iterator<Item = Outcome<G, NonEmpty<E>>> {
    /// Collects `Good` values into a container, or all errors into a
    /// [`NonEmpty`].
    ///
    /// Equivalent to [`accumulation::combined`] over this iterator: single
    /// pass, iteration order, every failing element's errors flattened in
    /// their own order. The container can be anything implementing
    /// [`FromIterator`].
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::BTreeSet;
    ///
    /// use accrue::prelude::*;
    ///
    /// let outcomes: [Outcome<u8, NonEmpty<&str>>; 3] =
    ///     [Outcome::Good(2), Outcome::Good(1), Outcome::Good(2)];
    ///
    /// let set: Outcome<BTreeSet<u8>, _> = outcomes.into_iter().collect_combined();
    /// assert_eq!(set, Outcome::Good(BTreeSet::from([1u8, 2])));
    /// ```
    ///
    /// [`accumulation::combined`]: crate::accumulation::combined
    fn collect_combined<C>(self) -> Outcome<C, NonEmpty<E>>
    where
        C: FromIterator<G>;

    /// Collects `Good` values into a `Vec`, or all errors into a
    /// [`NonEmpty`].
    ///
    /// A `Vec`-specialized sibling of
    /// [`collect_combined`](IteratorExt::collect_combined) that helps type
    /// inference and skips the generic container plumbing.
    ///
    /// # Examples
    ///
    /// ```
    /// use accrue::{nonempty, prelude::*};
    ///
    /// let outcomes: [Outcome<u8, NonEmpty<&str>>; 3] = [
    ///     Outcome::Good(1),
    ///     Outcome::Bad(nonempty!["no"]),
    ///     Outcome::Bad(nonempty!["still no"]),
    /// ];
    ///
    /// assert_eq!(
    ///     outcomes.into_iter().collect_combined_vec(),
    ///     Outcome::Bad(nonempty!["no", "still no"]),
    /// );
    /// ```
    fn collect_combined_vec(self) -> Outcome<Vec<G>, NonEmpty<E>>;
}

impl<G, E, I> IteratorExt<G, E> for I
where
    I: Iterator<Item = Outcome<G, NonEmpty<E>>>,
{
    #[inline]
    fn collect_combined<C>(self) -> Outcome<C, NonEmpty<E>>
    where
        C: FromIterator<G>,
    {
        accumulation::combined(self)
    }

    #[inline]
    fn collect_combined_vec(mut self) -> Outcome<Vec<G>, NonEmpty<E>> {
        let mut out = Vec::new();
        while let Some(outcome) = self.next() {
            match outcome {
                Outcome::Good(value) => out.push(value),
                Outcome::Bad(first_failed) => {
                    mem::drop(out);
                    let rest = self.filter_map(Outcome::bad).flatten().collect();
                    return Outcome::Bad(first_failed.extend_from_vec(rest));
                }
            }
        }
        Outcome::Good(out)
    }
}
