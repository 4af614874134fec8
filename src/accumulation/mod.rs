//! Combinators that merge *every* failure from a batch of outcomes.
//!
//! Everything in this module works on the accumulating shape
//! `Outcome<G, NonEmpty<E>>`: a success, or one-or-more errors. Individual
//! computations usually fail with a single error and are lifted into this
//! shape with [`Outcome::accumulating`]; the combinators here then fan out
//! over several of them and either produce one combined success or a single
//! [`NonEmpty`] holding the errors of *all* the inputs that failed.
//!
//! Three entry points cover the common shapes:
//!
//! - a fixed number of outcomes with unrelated success types: the
//!   [`WithGood`] tuple trait ([`with_good`](WithGood::with_good),
//!   [`zipped`](WithGood::zipped));
//! - any number of outcomes sharing one success type: [`combined`], or its
//!   traverse form [`validated_by`];
//! - one outcome checked against many validators: [`when`].
//!
//! # Error ordering
//!
//! Every combinator merges errors "outer-to-inner, left-to-right": across
//! inputs in their argument or iteration order, and within each failing
//! input's own collection in its stored order. No error is deduplicated or
//! reordered, and the combining logic never builds an empty failure
//! collection.
//!
//! # Examples
//!
//! ```
//! use accrue::{nonempty, prelude::*};
//!
//! fn parse_age(input: &str) -> Outcome<i32, NonEmpty<String>> {
//!     match input.parse::<i32>() {
//!         Ok(age) if age >= 0 => Outcome::Good(age),
//!         _ => Outcome::Bad(format!("{input:?} is not a valid age")).accumulating(),
//!     }
//! }
//!
//! let ages: Outcome<Vec<i32>, _> = combined(["29", "30", "31"].map(parse_age));
//! assert_eq!(ages, Outcome::Good(vec![29, 30, 31]));
//!
//! let ages: Outcome<Vec<i32>, _> = combined(["29", "-30", "-31"].map(parse_age));
//! assert_eq!(
//!     ages,
//!     Outcome::Bad(nonempty![
//!         "\"-30\" is not a valid age".to_string(),
//!         "\"-31\" is not a valid age".to_string(),
//!     ]),
//! );
//! ```
//!
//! [`Outcome::accumulating`]: crate::Outcome::accumulating

use alloc::vec::Vec;

use crate::{NonEmpty, Outcome, Validation};

mod tuple;

pub use self::tuple::WithGood;

/// Combines any number of accumulating outcomes into one.
///
/// The input is consumed in a single pass, in iteration order. Every `Good`
/// value feeds the collector `C` (any [`FromIterator`] target: `Vec`, a set,
/// a map of pairs, ...); every `Bad` flattens its errors, in their stored
/// order, onto the merged error sequence. If no error was seen the finished
/// collector is returned as `Good`; otherwise the partially-built collector
/// is discarded and all the errors come back as one `Bad`, input order
/// preserved.
///
/// An input that failed with `k` errors contributes exactly those `k`
/// errors, contiguously; inputs that succeeded contribute nothing. With an
/// empty input, the result is `Good` of the empty collector.
///
/// The fail-fast sibling of this operation lives on the asynchronous side as
/// [`sequence`](crate::cell::accumulate::sequence): callers choose between
/// "diagnose everything" and "stop at the first failure" explicitly.
///
/// # Examples
///
/// ```
/// use accrue::{nonempty, prelude::*};
///
/// let inputs: [Outcome<i32, NonEmpty<&str>>; 3] = [
///     Outcome::Good(1),
///     Outcome::Bad(nonempty!["two was rejected"]),
///     Outcome::Bad(nonempty!["three was rejected", "three was also odd"]),
/// ];
///
/// let merged: Outcome<Vec<i32>, _> = combined(inputs);
/// assert_eq!(
///     merged,
///     Outcome::Bad(nonempty![
///         "two was rejected",
///         "three was rejected",
///         "three was also odd",
///     ]),
/// );
/// ```
pub fn combined<G, E, C, I>(inputs: I) -> Outcome<C, NonEmpty<E>>
where
    I: IntoIterator<Item = Outcome<G, NonEmpty<E>>>,
    C: FromIterator<G>,
{
    let mut errors: Vec<E> = Vec::new();
    let goods: C = inputs
        .into_iter()
        .filter_map(|outcome| match outcome {
            Outcome::Good(value) => Some(value),
            Outcome::Bad(failed) => {
                errors.extend(failed);
                None
            }
        })
        .collect();
    match NonEmpty::from_vec(errors) {
        None => Outcome::Good(goods),
        Some(errors) => Outcome::Bad(errors),
    }
}

/// Maps every element through a fallible `f`, then merges as [`combined`].
///
/// This is the traverse operation: `validated_by(inputs, f)` is equivalent
/// to `combined(inputs.into_iter().map(f))`, with identical failure content
/// and order.
///
/// # Examples
///
/// ```
/// use accrue::{nonempty, prelude::*};
///
/// fn parse_age(input: &str) -> Outcome<i32, NonEmpty<String>> {
///     match input.parse::<i32>() {
///         Ok(age) if age >= 0 => Outcome::Good(age),
///         _ => Outcome::Bad(format!("{input:?} is not a valid age")).accumulating(),
///     }
/// }
///
/// let ages: Outcome<Vec<i32>, _> = validated_by(["29", "-30", "31"], parse_age);
/// assert_eq!(ages, Outcome::Bad(nonempty!["\"-30\" is not a valid age".to_string()]));
/// ```
pub fn validated_by<T, G, E, C, I, F>(inputs: I, f: F) -> Outcome<C, NonEmpty<E>>
where
    I: IntoIterator<Item = T>,
    F: FnMut(T) -> Outcome<G, NonEmpty<E>>,
    C: FromIterator<G>,
{
    combined(inputs.into_iter().map(f))
}

/// Checks a `Good` value against every validator, collecting every `Fail`.
///
/// A `Bad` input passes through unchanged and no validator runs. For a
/// `Good(v)`, *all* validators run against `v`, in list order — deliberately
/// not short-circuiting, unlike [`Validation::and`] — and every
/// [`Fail`](Validation::Fail) reason is collected. No failures leaves the
/// `Good(v)` unchanged; otherwise the reasons come back as one `Bad`, in
/// validator-list order.
///
/// Validators of differing types can be passed as function pointers or boxed
/// closures, as with any homogeneous Rust collection.
///
/// # Examples
///
/// ```
/// use accrue::{nonempty, prelude::*};
///
/// fn positive(i: &i32) -> Validation<String> {
///     if *i > 0 { Validation::Pass } else { Validation::Fail(format!("{i} is not positive")) }
/// }
/// fn even(i: &i32) -> Validation<String> {
///     if i % 2 == 0 { Validation::Pass } else { Validation::Fail(format!("{i} is odd")) }
/// }
///
/// let validators = [positive as fn(&i32) -> Validation<String>, even];
///
/// let good: Outcome<i32, NonEmpty<String>> = Outcome::Good(12);
/// assert_eq!(when(good, validators), Outcome::Good(12));
///
/// // Both violations are reported, in validator order.
/// let good: Outcome<i32, NonEmpty<String>> = Outcome::Good(-7);
/// assert_eq!(
///     when(good, validators),
///     Outcome::Bad(nonempty!["-7 is not positive".to_string(), "-7 is odd".to_string()]),
/// );
/// ```
pub fn when<G, E, I, V>(outcome: Outcome<G, NonEmpty<E>>, validations: I) -> Outcome<G, NonEmpty<E>>
where
    I: IntoIterator<Item = V>,
    V: FnOnce(&G) -> Validation<E>,
{
    let value = match outcome {
        Outcome::Good(value) => value,
        bad @ Outcome::Bad(_) => return bad,
    };
    let reasons: Vec<E> = validations
        .into_iter()
        .filter_map(|validation| match validation(&value) {
            Validation::Pass => None,
            Validation::Fail(reason) => Some(reason),
        })
        .collect();
    match NonEmpty::from_vec(reasons) {
        None => Outcome::Good(value),
        Some(reasons) => Outcome::Bad(reasons),
    }
}

impl<G, E> Outcome<G, NonEmpty<E>> {
    /// Method form of [`when`]: checks a `Good` value against every
    /// validator, accumulating every failure.
    ///
    /// # Examples
    ///
    /// ```
    /// use accrue::{nonempty, prelude::*};
    ///
    /// fn round(i: &i32) -> Validation<&'static str> {
    ///     if i % 10 == 0 { Validation::Pass } else { Validation::Fail("not round") }
    /// }
    ///
    /// let outcome: Outcome<i32, NonEmpty<&str>> = Outcome::Good(42);
    /// assert_eq!(outcome.when([round]), Outcome::Bad(nonempty!["not round"]));
    /// ```
    pub fn when<I, V>(self, validations: I) -> Outcome<G, NonEmpty<E>>
    where
        I: IntoIterator<Item = V>,
        V: FnOnce(&G) -> Validation<E>,
    {
        when(self, validations)
    }
}
