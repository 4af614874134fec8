//! The success-or-failure disjunction at the heart of the crate.
//!
//! [`Outcome<G, B>`] holds either a [`Good`](Outcome::Good) value or a
//! [`Bad`](Outcome::Bad) value, exactly one of the two, fixed at
//! construction. It is isomorphic to [`Result`] (and converts to and from it
//! losslessly), but its vocabulary is deliberately neutral: the `Bad` side is
//! ordinary domain data — a validation message, a rejected field — not
//! necessarily something implementing an error trait.
//!
//! The method that sets `Outcome` apart from `Result` is
//! [`accumulating`](Outcome::accumulating), which widens the failure side to
//! a [`NonEmpty`] collection of failures. That widened shape,
//! `Outcome<G, NonEmpty<B>>`, is what the combinators in
//! [`accumulation`](crate::accumulation) consume and produce to report
//! *every* failure from a batch of computations rather than the first one.
//!
//! # Examples
//!
//! Ordinary, short-circuiting composition works like `Result`:
//!
//! ```
//! use accrue::prelude::*;
//!
//! fn parse_name(input: &str) -> Outcome<&str, String> {
//!     let trimmed = input.trim();
//!     if trimmed.is_empty() {
//!         Outcome::Bad(format!("{input:?} is not a valid name"))
//!     } else {
//!         Outcome::Good(trimmed)
//!     }
//! }
//!
//! assert_eq!(parse_name("  Ada  "), Outcome::Good("Ada"));
//! assert!(parse_name("   ").is_bad());
//! ```
//!
//! [`NonEmpty`]: crate::NonEmpty

use crate::validation::Validation;

/// A value that is either `Good` or `Bad`, never both, never neither.
///
/// Equality, ordering of variants, and hashing are structural per variant: a
/// `Good` never equals a `Bad`, even when the payloads would compare equal.
///
/// # Examples
///
/// ```
/// use accrue::prelude::*;
///
/// let good: Outcome<i32, &str> = Outcome::Good(3);
/// let bad: Outcome<i32, &str> = Outcome::Bad("out of range");
///
/// assert_eq!(good.map(|i| i + 1), Outcome::Good(4));
/// assert_eq!(bad.map(|i| i + 1), Outcome::Bad("out of range"));
/// ```
#[must_use = "this `Outcome` may be `Bad`, which should be handled"]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome<G, B> {
    /// The success side, owning its payload.
    Good(G),
    /// The failure side, owning its payload.
    Bad(B),
}

use Outcome::{Bad, Good};

impl<G, B> Outcome<G, B> {
    /// Returns `true` if this is [`Good`](Outcome::Good).
    pub fn is_good(&self) -> bool {
        matches!(self, Good(_))
    }

    /// Returns `true` if this is [`Bad`](Outcome::Bad).
    pub fn is_bad(&self) -> bool {
        matches!(self, Bad(_))
    }

    /// Transforms the `Good` payload with `f`, leaving a `Bad` untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use accrue::prelude::*;
    ///
    /// let outcome: Outcome<i32, &str> = Outcome::Good(20);
    /// assert_eq!(outcome.map(|i| i * 2), Outcome::Good(40));
    /// ```
    pub fn map<H, F>(self, f: F) -> Outcome<H, B>
    where
        F: FnOnce(G) -> H,
    {
        match self {
            Good(value) => Good(f(value)),
            Bad(error) => Bad(error),
        }
    }

    /// Transforms the `Bad` payload with `f`, leaving a `Good` untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use accrue::prelude::*;
    ///
    /// let outcome: Outcome<i32, &str> = Outcome::Bad("oops");
    /// assert_eq!(outcome.map_bad(str::len), Outcome::Bad(4));
    /// ```
    pub fn map_bad<C, F>(self, f: F) -> Outcome<G, C>
    where
        F: FnOnce(B) -> C,
    {
        match self {
            Good(value) => Good(value),
            Bad(error) => Bad(f(error)),
        }
    }

    /// Chains a computation that may itself fail with the same `Bad` type.
    ///
    /// The `Good` payload is handed to `f`, whose result — possibly with a
    /// different `Good` type — becomes the overall outcome. A `Bad`
    /// short-circuits and `f` never runs.
    ///
    /// # Examples
    ///
    /// ```
    /// use accrue::prelude::*;
    ///
    /// fn halve(i: i32) -> Outcome<i32, String> {
    ///     if i % 2 == 0 {
    ///         Outcome::Good(i / 2)
    ///     } else {
    ///         Outcome::Bad(format!("{i} is odd"))
    ///     }
    /// }
    ///
    /// let outcome: Outcome<i32, String> = Outcome::Good(12);
    /// assert_eq!(outcome.and_then(halve), Outcome::Good(6));
    ///
    /// let outcome: Outcome<i32, String> = Outcome::Good(7);
    /// assert_eq!(outcome.and_then(halve), Outcome::Bad("7 is odd".to_string()));
    /// ```
    pub fn and_then<H, F>(self, f: F) -> Outcome<H, B>
    where
        F: FnOnce(G) -> Outcome<H, B>,
    {
        match self {
            Good(value) => f(value),
            Bad(error) => Bad(error),
        }
    }

    /// Eliminates the outcome: exactly one of the two branches runs.
    ///
    /// # Examples
    ///
    /// ```
    /// use accrue::prelude::*;
    ///
    /// let outcome: Outcome<i32, &str> = Outcome::Good(3);
    /// assert_eq!(outcome.fold(|i| i * 10, |_| 0), 30);
    ///
    /// let outcome: Outcome<i32, &str> = Outcome::Bad("nope");
    /// assert_eq!(outcome.fold(|i| i * 10, |e| e.len() as i32), 4);
    /// ```
    pub fn fold<R, FG, FB>(self, on_good: FG, on_bad: FB) -> R
    where
        FG: FnOnce(G) -> R,
        FB: FnOnce(B) -> R,
    {
        match self {
            Good(value) => on_good(value),
            Bad(error) => on_bad(error),
        }
    }

    /// Filters the `Good` payload through a validator.
    ///
    /// A [`Pass`](Validation::Pass) keeps the `Good`; a
    /// [`Fail`](Validation::Fail) converts the outcome to a `Bad` holding the
    /// reason. A `Bad` passes through and the validator never runs.
    ///
    /// # Examples
    ///
    /// ```
    /// use accrue::prelude::*;
    ///
    /// fn positive(i: &i32) -> Validation<String> {
    ///     if *i > 0 {
    ///         Validation::Pass
    ///     } else {
    ///         Validation::Fail(format!("{i} is not positive"))
    ///     }
    /// }
    ///
    /// let outcome: Outcome<i32, String> = Outcome::Good(12);
    /// assert_eq!(outcome.filter(positive), Outcome::Good(12));
    ///
    /// let outcome: Outcome<i32, String> = Outcome::Good(-1);
    /// assert_eq!(outcome.filter(positive), Outcome::Bad("-1 is not positive".to_string()));
    /// ```
    pub fn filter<F>(self, validator: F) -> Outcome<G, B>
    where
        F: FnOnce(&G) -> Validation<B>,
    {
        match self {
            Good(value) => match validator(&value) {
                Validation::Pass => Good(value),
                Validation::Fail(reason) => Bad(reason),
            },
            bad @ Bad(_) => bad,
        }
    }

    /// Converts a `Bad` into a `Good` with `f`; identity on `Good`.
    ///
    /// # Examples
    ///
    /// ```
    /// use accrue::prelude::*;
    ///
    /// let outcome: Outcome<i32, &str> = Outcome::Bad("unparseable");
    /// assert_eq!(outcome.recover(|_| 0), Outcome::Good(0));
    /// ```
    pub fn recover<F>(self, f: F) -> Outcome<G, B>
    where
        F: FnOnce(B) -> G,
    {
        match self {
            good @ Good(_) => good,
            Bad(error) => Good(f(error)),
        }
    }

    /// Attempts to convert a `Bad` into another outcome; identity on `Good`.
    ///
    /// Unlike [`recover`](Self::recover), the handler may itself fail,
    /// possibly with a different `Bad` type.
    ///
    /// # Examples
    ///
    /// ```
    /// use accrue::prelude::*;
    ///
    /// fn retry(error: &str) -> Outcome<i32, usize> {
    ///     if error == "transient" {
    ///         Outcome::Good(42)
    ///     } else {
    ///         Outcome::Bad(error.len())
    ///     }
    /// }
    ///
    /// let outcome: Outcome<i32, &str> = Outcome::Bad("transient");
    /// assert_eq!(outcome.recover_with(retry), Outcome::Good(42));
    ///
    /// let outcome: Outcome<i32, &str> = Outcome::Bad("fatal");
    /// assert_eq!(outcome.recover_with(retry), Outcome::Bad(5));
    /// ```
    pub fn recover_with<C, F>(self, f: F) -> Outcome<G, C>
    where
        F: FnOnce(B) -> Outcome<G, C>,
    {
        match self {
            Good(value) => Good(value),
            Bad(error) => f(error),
        }
    }

    /// Widens the failure side to a one-element [`NonEmpty`], making this
    /// outcome ready for the accumulation combinators.
    ///
    /// A `Good` passes through with its value unchanged; a `Bad` payload is
    /// wrapped as the sole element of a [`NonEmpty`]. This is the canonical
    /// entry point into [`accumulation`](crate::accumulation): individual
    /// computations fail with a single `B`, and `accumulating` lifts them
    /// into the shape whose failures can be merged.
    ///
    /// # Examples
    ///
    /// ```
    /// use accrue::prelude::*;
    ///
    /// let good: Outcome<i32, &str> = Outcome::Good(3);
    /// assert_eq!(good.accumulating(), Outcome::Good(3));
    ///
    /// let bad: Outcome<i32, &str> = Outcome::Bad("out of range");
    /// assert_eq!(bad.accumulating(), Outcome::Bad(NonEmpty::One("out of range")));
    /// ```
    ///
    /// [`NonEmpty`]: crate::NonEmpty
    pub fn accumulating(self) -> Outcome<G, crate::NonEmpty<B>> {
        match self {
            Good(value) => Good(value),
            Bad(error) => Bad(crate::NonEmpty::One(error)),
        }
    }

    /// Exchanges the roles of the two sides.
    ///
    /// # Examples
    ///
    /// ```
    /// use accrue::prelude::*;
    ///
    /// let outcome: Outcome<i32, &str> = Outcome::Good(3);
    /// assert_eq!(outcome.swap(), Outcome::Bad(3));
    /// ```
    pub fn swap(self) -> Outcome<B, G> {
        match self {
            Good(value) => Bad(value),
            Bad(error) => Good(error),
        }
    }

    /// Converts from `&Outcome<G, B>` to `Outcome<&G, &B>`.
    pub fn as_ref(&self) -> Outcome<&G, &B> {
        match self {
            Good(value) => Good(value),
            Bad(error) => Bad(error),
        }
    }

    /// Returns the `Good` payload, discarding a `Bad`.
    ///
    /// # Examples
    ///
    /// ```
    /// use accrue::prelude::*;
    ///
    /// let outcome: Outcome<i32, &str> = Outcome::Good(3);
    /// assert_eq!(outcome.good(), Some(3));
    ///
    /// let outcome: Outcome<i32, &str> = Outcome::Bad("nope");
    /// assert_eq!(outcome.good(), None);
    /// ```
    pub fn good(self) -> Option<G> {
        match self {
            Good(value) => Some(value),
            Bad(_) => None,
        }
    }

    /// Returns the `Bad` payload, discarding a `Good`.
    pub fn bad(self) -> Option<B> {
        match self {
            Good(_) => None,
            Bad(error) => Some(error),
        }
    }

    /// Returns the `Good` payload.
    ///
    /// # Panics
    ///
    /// Panics if the outcome is `Bad`. Accessing the wrong variant is a
    /// contract violation, reported loudly rather than silently defaulted —
    /// the same stance as [`Result::unwrap`]. Use [`good`](Self::good) or
    /// [`good_or_else`](Self::good_or_else) for a total alternative.
    #[track_caller]
    pub fn unwrap_good(self) -> G {
        match self {
            Good(value) => value,
            Bad(_) => panic!("called `Outcome::unwrap_good()` on a `Bad` value"),
        }
    }

    /// Returns the `Bad` payload.
    ///
    /// # Panics
    ///
    /// Panics if the outcome is `Good`, for the same reason
    /// [`unwrap_good`](Self::unwrap_good) panics on `Bad`.
    #[track_caller]
    pub fn unwrap_bad(self) -> B {
        match self {
            Good(_) => panic!("called `Outcome::unwrap_bad()` on a `Good` value"),
            Bad(error) => error,
        }
    }

    /// Returns the `Good` payload or the supplied default. Never panics.
    pub fn good_or(self, default: G) -> G {
        match self {
            Good(value) => value,
            Bad(_) => default,
        }
    }

    /// Returns the `Good` payload or computes one from the `Bad` payload.
    /// Never panics.
    ///
    /// # Examples
    ///
    /// ```
    /// use accrue::prelude::*;
    ///
    /// let outcome: Outcome<usize, &str> = Outcome::Bad("four");
    /// assert_eq!(outcome.good_or_else(str::len), 4);
    /// ```
    pub fn good_or_else<F>(self, f: F) -> G
    where
        F: FnOnce(B) -> G,
    {
        match self {
            Good(value) => value,
            Bad(error) => f(error),
        }
    }

    /// Returns `true` if this is a `Good` whose payload satisfies `p`.
    ///
    /// A `Bad` yields `false`: there is no good value for `p` to hold of.
    pub fn exists<P>(&self, p: P) -> bool
    where
        P: FnOnce(&G) -> bool,
    {
        match self {
            Good(value) => p(value),
            Bad(_) => false,
        }
    }

    /// Returns `true` if every `Good` payload satisfies `p`.
    ///
    /// A `Bad` yields `true` vacuously, the universal-quantifier dual of
    /// [`exists`](Self::exists).
    pub fn for_all<P>(&self, p: P) -> bool
    where
        P: FnOnce(&G) -> bool,
    {
        match self {
            Good(value) => p(value),
            Bad(_) => true,
        }
    }

    /// Returns `true` if this is `Good(value)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use accrue::prelude::*;
    ///
    /// let outcome: Outcome<i32, &str> = Outcome::Good(3);
    /// assert!(outcome.contains(&3));
    /// assert!(!outcome.contains(&4));
    /// ```
    pub fn contains(&self, value: &G) -> bool
    where
        G: PartialEq,
    {
        matches!(self, Good(v) if v == value)
    }

    /// Returns `true` if this is `Bad(error)`.
    pub fn contains_bad(&self, error: &B) -> bool
    where
        B: PartialEq,
    {
        matches!(self, Bad(e) if e == error)
    }

    /// Converts a [`Result`] into an outcome, `Ok` to `Good` and `Err` to
    /// `Bad`.
    pub fn from_result(result: Result<G, B>) -> Outcome<G, B> {
        match result {
            Ok(value) => Good(value),
            Err(error) => Bad(error),
        }
    }

    /// Converts this outcome into a [`Result`], `Good` to `Ok` and `Bad` to
    /// `Err`.
    ///
    /// # Examples
    ///
    /// ```
    /// use accrue::prelude::*;
    ///
    /// let outcome: Outcome<i32, &str> = Outcome::Good(3);
    /// assert_eq!(outcome.into_result(), Ok(3));
    /// ```
    pub fn into_result(self) -> Result<G, B> {
        match self {
            Good(value) => Ok(value),
            Bad(error) => Err(error),
        }
    }

    /// Converts an [`Option`] into an outcome, with `bad` standing in for
    /// `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use accrue::prelude::*;
    ///
    /// assert_eq!(Outcome::from_option(Some(3), "missing"), Outcome::Good(3));
    /// assert_eq!(Outcome::<i32, _>::from_option(None, "missing"), Outcome::Bad("missing"));
    /// ```
    pub fn from_option(option: Option<G>, bad: B) -> Outcome<G, B> {
        match option {
            Some(value) => Good(value),
            None => Bad(bad),
        }
    }
}

impl<G, B> From<Result<G, B>> for Outcome<G, B> {
    fn from(result: Result<G, B>) -> Self {
        Outcome::from_result(result)
    }
}

impl<G, B> From<Outcome<G, B>> for Result<G, B> {
    fn from(outcome: Outcome<G, B>) -> Self {
        outcome.into_result()
    }
}
