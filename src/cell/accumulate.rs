//! Asynchronous mirrors of the [`accumulation`](crate::accumulation)
//! combinators, over [`CompletionCell`]s.
//!
//! Each function here registers completion callbacks on its input cells and
//! immediately returns a new, not-yet-complete output cell; the combining
//! work happens later, on whichever thread the execution context hands the
//! final input's completion to. The inputs may complete in any order and in
//! any interleaving — the *content* of a [`with_good`](WithGoodCells),
//! [`zipped`](WithGoodCells::zipped) or [`combined`] result depends only on
//! argument/iteration order, never on completion order, because every
//! barrier waits for all of its inputs and then reuses the synchronous merge
//! verbatim.
//!
//! The one deliberate exception is [`sequence`]: it fails fast with the
//! first failure *observed*, which makes both when it completes and (under
//! multiple failures) what it carries completion-order-dependent. That is
//! its contract, not an accident — callers pick [`combined`] to diagnose
//! everything and [`sequence`] to stop early.
//!
//! The barriers are counting barriers: one write-once slot per input plus an
//! atomic countdown. A slot is only read by the callback that drives the
//! countdown to zero, and the release/acquire ordering of the final
//! decrement is what publishes every other slot's write to it.
//!
//! # Examples
//!
//! ```
//! use std::{sync::Arc, time::Duration};
//!
//! use accrue::{
//!     cell::{CompletionCell, accumulate},
//!     executor::CallingThread,
//!     prelude::*,
//! };
//!
//! let ctx: accrue::executor::SharedContext = Arc::new(CallingThread);
//!
//! let a: CompletionCell<i32, NonEmpty<String>> = CompletionCell::new(ctx.clone());
//! let b: CompletionCell<i32, NonEmpty<String>> = CompletionCell::new(ctx.clone());
//!
//! let merged: CompletionCell<Vec<i32>, _> =
//!     accumulate::combined(ctx.clone(), [a.clone(), b.clone()]);
//!
//! // Completion order does not matter for the content; the merge runs
//! // when the last input arrives.
//! b.try_complete(Outcome::Good(2));
//! a.try_complete(Outcome::Good(1));
//!
//! let result = merged.get(Duration::ZERO).unwrap();
//! assert_eq!(*result, Outcome::Good(vec![1, 2]));
//! ```

use alloc::vec::Vec;
use core::sync::atomic::{AtomicUsize, Ordering};

use accrue_executor::SharedContext;
use parking_lot::Mutex;
use triomphe::Arc;

use crate::{
    NonEmpty, Outcome, Validation, accumulation,
    accumulation::WithGood,
    cell::CompletionCell,
};

/// Fixed-arity asynchronous accumulation over a tuple of cells with
/// unrelated success types.
///
/// Implemented for tuples of `&CompletionCell<Gi, NonEmpty<E>>` from arity 2
/// through 8. The returned cell completes once every input has completed,
/// with exactly the outcome the synchronous
/// [`WithGood`](crate::accumulation::WithGood) merge would produce over the
/// resolved values: all-good applies the combining function in position
/// order, anything else concatenates every failure in position order.
///
/// # Examples
///
/// ```
/// use std::{sync::Arc, time::Duration};
///
/// use accrue::{
///     cell::{CompletionCell, accumulate::WithGoodCells},
///     executor::CallingThread,
///     nonempty,
///     prelude::*,
/// };
///
/// let ctx: accrue::executor::SharedContext = Arc::new(CallingThread);
///
/// let age: CompletionCell<i32, NonEmpty<String>> = CompletionCell::new(ctx.clone());
/// let name: CompletionCell<String, NonEmpty<String>> = CompletionCell::new(ctx.clone());
///
/// let pair = (&age, &name).zipped(ctx.clone());
///
/// name.try_complete(Outcome::Bad(nonempty!["no name given".to_string()]));
/// age.try_complete(Outcome::Good(29));
///
/// let result = pair.get(Duration::ZERO).unwrap();
/// assert_eq!(*result, Outcome::Bad(nonempty!["no name given".to_string()]));
/// ```
pub trait WithGoodCells<E>: Sized {
    /// The tuple of success types, one per position.
    type Goods;

    /// Completes the returned cell with `f` applied to the success values
    /// once every input completed good, or with every input's failures
    /// merged in position order.
    fn with_good<R, F>(self, context: SharedContext, f: F) -> CompletionCell<R, NonEmpty<E>>
    where
        R: Send + Sync + 'static,
        F: FnOnce(Self::Goods) -> R + Send + 'static;

    /// [`with_good`](Self::with_good) with a tuple-building combining
    /// function.
    fn zipped(self, context: SharedContext) -> CompletionCell<Self::Goods, NonEmpty<E>>
    where
        Self::Goods: Send + Sync + 'static,
    {
        self.with_good(context, |goods| goods)
    }
}

macro_rules! impl_with_good_cells {
    ($($cell:ident, $slot:ident: $good:ident),+ $(,)?) => {
        impl<'a, E, $($good,)+> WithGoodCells<E> for ($(&'a CompletionCell<$good, NonEmpty<E>>,)+)
        where
            E: Clone + Send + Sync + 'static,
            $($good: Clone + Send + Sync + 'static,)+
        {
            type Goods = ($($good,)+);

            fn with_good<R, F>(
                self,
                context: SharedContext,
                f: F,
            ) -> CompletionCell<R, NonEmpty<E>>
            where
                R: Send + Sync + 'static,
                F: FnOnce(Self::Goods) -> R + Send + 'static,
            {
                struct Slots<F, E, $($good,)+> {
                    $($slot: Mutex<Option<Outcome<$good, NonEmpty<E>>>>,)+
                    combine: Mutex<Option<F>>,
                    remaining: AtomicUsize,
                }

                impl<F, E, $($good,)+> Slots<F, E, $($good,)+>
                where
                    E: Send + Sync + 'static,
                    $($good: Send + Sync + 'static,)+
                {
                    /// Counts one input as arrived; the arrival that empties
                    /// the countdown reads every slot and completes the
                    /// output. The `AcqRel` decrement publishes the other
                    /// slots' writes to that final reader.
                    fn arrive<R>(&self, output: &CompletionCell<R, NonEmpty<E>>)
                    where
                        R: Send + Sync + 'static,
                        F: FnOnce(($($good,)+)) -> R,
                    {
                        if self.remaining.fetch_sub(1, Ordering::AcqRel) != 1 {
                            return;
                        }
                        let combine = self.combine.lock().take();
                        $(let $slot = self.$slot.lock().take();)+
                        if let (Some(combine), $(Some($slot),)+) = (combine, $($slot,)+) {
                            let _ = output.try_complete(($($slot,)+).with_good(combine));
                        }
                    }
                }

                let ($($cell,)+) = self;
                let output = CompletionCell::new(context);
                let arity = [$(stringify!($slot),)+].len();
                let slots = Arc::new(Slots {
                    $($slot: Mutex::new(None),)+
                    combine: Mutex::new(Some(f)),
                    remaining: AtomicUsize::new(arity),
                });

                $(
                    {
                        let slots = slots.clone();
                        let output = output.clone();
                        $cell.on_complete(move |outcome| {
                            *slots.$slot.lock() = Some(outcome.clone());
                            slots.arrive(&output);
                        });
                    }
                )+

                output
            }
        }
    };
}

impl_with_good_cells!(c0, s0: G0, c1, s1: G1);
impl_with_good_cells!(c0, s0: G0, c1, s1: G1, c2, s2: G2);
impl_with_good_cells!(c0, s0: G0, c1, s1: G1, c2, s2: G2, c3, s3: G3);
impl_with_good_cells!(c0, s0: G0, c1, s1: G1, c2, s2: G2, c3, s3: G3, c4, s4: G4);
impl_with_good_cells!(c0, s0: G0, c1, s1: G1, c2, s2: G2, c3, s3: G3, c4, s4: G4, c5, s5: G5);
impl_with_good_cells!(
    c0, s0: G0, c1, s1: G1, c2, s2: G2, c3, s3: G3, c4, s4: G4, c5, s5: G5, c6, s6: G6
);
impl_with_good_cells!(
    c0, s0: G0, c1, s1: G1, c2, s2: G2, c3, s3: G3, c4, s4: G4, c5, s5: G5, c6, s6: G6,
    c7, s7: G7
);

struct CombinedSlots<G, E> {
    results: Vec<Mutex<Option<Outcome<G, NonEmpty<E>>>>>,
    remaining: AtomicUsize,
}

/// Waits for every cell, then merges exactly as the synchronous
/// [`accumulation::combined`] does.
///
/// The input iterator is consumed exactly once, up front, into a replayable
/// buffer; callbacks are registered against that buffer so the later merge
/// can revisit every input's position. The returned cell completes only
/// after *all* inputs completed — even when an early input already failed —
/// and its content is deterministic in input order regardless of completion
/// order. An empty input completes immediately with the empty collector.
///
/// For stopping at the first failure instead, see [`sequence`].
///
/// # Examples
///
/// ```
/// use std::{sync::Arc, time::Duration};
///
/// use accrue::{
///     cell::{CompletionCell, accumulate},
///     executor::CallingThread,
///     nonempty,
///     prelude::*,
/// };
///
/// let ctx: accrue::executor::SharedContext = Arc::new(CallingThread);
///
/// let cells: Vec<CompletionCell<i32, NonEmpty<String>>> =
///     (0..3).map(|_| CompletionCell::new(ctx.clone())).collect();
/// let merged: CompletionCell<Vec<i32>, _> =
///     accumulate::combined(ctx.clone(), cells.iter().cloned());
///
/// // Completions arrive out of input order.
/// cells[2].try_complete(Outcome::Good(31));
/// cells[0].try_complete(Outcome::Good(29));
/// cells[1].try_complete(Outcome::Bad(nonempty!["\"-30\" is not a valid age".to_string()]));
///
/// let result = merged.get(Duration::ZERO).unwrap();
/// assert_eq!(
///     *result,
///     Outcome::Bad(nonempty!["\"-30\" is not a valid age".to_string()]),
/// );
/// ```
pub fn combined<G, E, C, I>(context: SharedContext, cells: I) -> CompletionCell<C, NonEmpty<E>>
where
    G: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
    C: FromIterator<G> + Send + Sync + 'static,
    I: IntoIterator<Item = CompletionCell<G, NonEmpty<E>>>,
{
    let cells: Vec<_> = cells.into_iter().collect();
    let output = CompletionCell::new(context);
    if cells.is_empty() {
        let _ = output.try_complete(Outcome::Good(core::iter::empty().collect()));
        return output;
    }

    let slots = Arc::new(CombinedSlots {
        results: cells.iter().map(|_| Mutex::new(None)).collect(),
        remaining: AtomicUsize::new(cells.len()),
    });

    for (index, cell) in cells.iter().enumerate() {
        let slots = slots.clone();
        let output = output.clone();
        cell.on_complete(move |outcome| {
            *slots.results[index].lock() = Some(outcome.clone());
            if slots.remaining.fetch_sub(1, Ordering::AcqRel) == 1 {
                let resolved: Vec<_> = slots
                    .results
                    .iter()
                    .filter_map(|slot| slot.lock().take())
                    .collect();
                let _ = output.try_complete(accumulation::combined(resolved));
            }
        });
    }

    output
}

struct SequenceSlots<G> {
    goods: Vec<Mutex<Option<G>>>,
    remaining: AtomicUsize,
}

/// The fail-fast sibling of [`combined`].
///
/// The first `Bad` *observed* — in completion order, not input order —
/// immediately completes the output with that single input's failures,
/// without waiting for the remaining cells. When every input completes
/// good, the content is the same as [`combined`]'s: the good values
/// collected in input order.
///
/// This is the one combinator whose behavior is completion-order-dependent
/// by design: under all-success only *when* the result becomes available
/// varies, but under multiple failures *which* failure is reported is
/// whichever completed first. Callers choose between `sequence` ("stop on
/// first failure") and [`combined`] ("diagnose everything") deliberately.
///
/// # Examples
///
/// ```
/// use std::{sync::Arc, time::Duration};
///
/// use accrue::{
///     cell::{CompletionCell, accumulate},
///     executor::CallingThread,
///     nonempty,
///     prelude::*,
/// };
///
/// let ctx: accrue::executor::SharedContext = Arc::new(CallingThread);
///
/// let cells: Vec<CompletionCell<i32, NonEmpty<String>>> =
///     (0..3).map(|_| CompletionCell::new(ctx.clone())).collect();
/// let sequenced: CompletionCell<Vec<i32>, _> =
///     accumulate::sequence(ctx.clone(), cells.iter().cloned());
///
/// // One failure completes the output; cells[2] is still pending.
/// cells[0].try_complete(Outcome::Good(29));
/// cells[1].try_complete(Outcome::Bad(nonempty!["rejected".to_string()]));
///
/// assert!(sequenced.is_completed());
/// assert!(!cells[2].is_completed());
///
/// let result = sequenced.get(Duration::ZERO).unwrap();
/// assert_eq!(*result, Outcome::Bad(nonempty!["rejected".to_string()]));
/// ```
pub fn sequence<G, E, C, I>(context: SharedContext, cells: I) -> CompletionCell<C, NonEmpty<E>>
where
    G: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
    C: FromIterator<G> + Send + Sync + 'static,
    I: IntoIterator<Item = CompletionCell<G, NonEmpty<E>>>,
{
    let cells: Vec<_> = cells.into_iter().collect();
    let output = CompletionCell::new(context);
    if cells.is_empty() {
        let _ = output.try_complete(Outcome::Good(core::iter::empty().collect()));
        return output;
    }

    let slots = Arc::new(SequenceSlots {
        goods: cells.iter().map(|_| Mutex::new(None)).collect(),
        remaining: AtomicUsize::new(cells.len()),
    });

    for (index, cell) in cells.iter().enumerate() {
        let slots = slots.clone();
        let output = output.clone();
        cell.on_complete(move |outcome| match outcome {
            Outcome::Bad(errors) => {
                let _ = output.try_complete(Outcome::Bad(errors.clone()));
            }
            Outcome::Good(value) => {
                *slots.goods[index].lock() = Some(value.clone());
                if slots.remaining.fetch_sub(1, Ordering::AcqRel) == 1 {
                    let goods: C = slots
                        .goods
                        .iter()
                        .filter_map(|slot| slot.lock().take())
                        .collect();
                    let _ = output.try_complete(Outcome::Good(goods));
                }
            }
        });
    }

    output
}

/// Races the cells: the first completed outcome, good or bad, is copied
/// verbatim into the output.
///
/// With an empty input the output can never complete; callers own that
/// edge, the same way an empty `select` would.
///
/// # Examples
///
/// ```
/// use std::{sync::Arc, time::Duration};
///
/// use accrue::{
///     cell::{CompletionCell, accumulate},
///     executor::CallingThread,
///     prelude::*,
/// };
///
/// let ctx: accrue::executor::SharedContext = Arc::new(CallingThread);
///
/// let fast: CompletionCell<i32, String> = CompletionCell::new(ctx.clone());
/// let slow: CompletionCell<i32, String> = CompletionCell::new(ctx.clone());
///
/// let winner = accumulate::first_completed_of(ctx.clone(), [fast.clone(), slow.clone()]);
///
/// fast.try_complete(Outcome::Good(1));
/// slow.try_complete(Outcome::Good(2));
///
/// assert_eq!(*winner.get(Duration::ZERO).unwrap(), Outcome::Good(1));
/// ```
pub fn first_completed_of<G, B, I>(context: SharedContext, cells: I) -> CompletionCell<G, B>
where
    G: Clone + Send + Sync + 'static,
    B: Clone + Send + Sync + 'static,
    I: IntoIterator<Item = CompletionCell<G, B>>,
{
    let output = CompletionCell::new(context);
    for cell in cells {
        let output = output.clone();
        cell.on_complete(move |outcome| {
            let _ = output.try_complete(outcome.clone());
        });
    }
    output
}

/// Waits for the cell, then applies the synchronous
/// [`accumulation::when`] to its outcome.
///
/// A `Bad` passes through untouched and no validator runs; a `Good` value
/// is checked against *every* validator, all failures collected in
/// validator order.
///
/// # Examples
///
/// ```
/// use std::{sync::Arc, time::Duration};
///
/// use accrue::{
///     cell::{CompletionCell, accumulate},
///     executor::CallingThread,
///     nonempty,
///     prelude::*,
/// };
///
/// fn positive(i: &i32) -> Validation<String> {
///     if *i > 0 { Validation::Pass } else { Validation::Fail(format!("{i} is not positive")) }
/// }
///
/// let ctx: accrue::executor::SharedContext = Arc::new(CallingThread);
///
/// let cell: CompletionCell<i32, NonEmpty<String>> = CompletionCell::new(ctx.clone());
/// let checked =
///     accumulate::when(ctx.clone(), &cell, [positive as fn(&i32) -> Validation<String>]);
///
/// cell.try_complete(Outcome::Good(-3));
///
/// let result = checked.get(Duration::ZERO).unwrap();
/// assert_eq!(*result, Outcome::Bad(nonempty!["-3 is not positive".to_string()]));
/// ```
pub fn when<G, E, I, V>(
    context: SharedContext,
    cell: &CompletionCell<G, NonEmpty<E>>,
    validations: I,
) -> CompletionCell<G, NonEmpty<E>>
where
    G: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
    I: IntoIterator<Item = V>,
    V: FnOnce(&G) -> Validation<E> + Send + 'static,
{
    let output = CompletionCell::new(context);
    let validators: Vec<V> = validations.into_iter().collect();
    let completer = output.clone();
    cell.on_complete(move |outcome| {
        let _ = completer.try_complete(accumulation::when(outcome.clone(), validators));
    });
    output
}
