//! Pass/fail results for user-supplied validator functions.
//!
//! A [`Validation`] is the answer a validator function gives about a single
//! value: either the value is acceptable ([`Pass`], no payload) or it is not
//! ([`Fail`], carrying the reason). Validators returning this type are
//! consumed by [`Outcome::filter`] and by the [`when`] combinator.
//!
//! Unlike the accumulation combinators, combining two `Validation`s with
//! [`and`](Validation::and) short-circuits: the first [`Fail`] wins,
//! left-to-right. When you want *every* violation reported, hand the
//! validators to [`when`] instead, which runs all of them.
//!
//! [`Pass`]: Validation::Pass
//! [`Fail`]: Validation::Fail
//! [`Outcome::filter`]: crate::Outcome::filter
//! [`when`]: crate::accumulation::when

/// The result of applying a validator function to a value.
///
/// # Examples
///
/// ```
/// use accrue::prelude::*;
///
/// fn is_round(i: &i32) -> Validation<String> {
///     if i % 10 == 0 {
///         Validation::Pass
///     } else {
///         Validation::Fail(format!("{i} was not a round number"))
///     }
/// }
///
/// assert!(is_round(&40).is_pass());
/// assert!(is_round(&42).is_fail());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Validation<E> {
    /// The value was acceptable.
    Pass,
    /// The value was rejected, with the reason why.
    Fail(E),
}

impl<E> Validation<E> {
    /// Returns `true` if this is [`Pass`](Validation::Pass).
    pub fn is_pass(&self) -> bool {
        matches!(self, Validation::Pass)
    }

    /// Returns `true` if this is [`Fail`](Validation::Fail).
    pub fn is_fail(&self) -> bool {
        matches!(self, Validation::Fail(_))
    }

    /// Combines two validations with logical-AND, short-circuit semantics.
    ///
    /// The first [`Fail`](Validation::Fail), left-to-right, wins; `other` is
    /// only consulted when `self` passed. This mirrors `&&` and is the right
    /// tool when one violation is enough. To report *every* violation, run
    /// the validators through [`when`](crate::accumulation::when) instead.
    ///
    /// # Examples
    ///
    /// ```
    /// use accrue::prelude::*;
    ///
    /// let pass: Validation<&str> = Validation::Pass;
    /// assert_eq!(pass.and(Validation::Pass), Validation::Pass);
    /// assert_eq!(pass.and(Validation::Fail("too small")), Validation::Fail("too small"));
    ///
    /// // The left failure wins; the right one is never seen.
    /// let fail: Validation<&str> = Validation::Fail("not even");
    /// assert_eq!(fail.and(Validation::Fail("too small")), Validation::Fail("not even"));
    /// ```
    #[must_use]
    pub fn and(self, other: Validation<E>) -> Validation<E> {
        match self {
            Validation::Pass => other,
            fail @ Validation::Fail(_) => fail,
        }
    }

    /// Converts a `Result<(), E>` into a validation.
    ///
    /// `Ok(())` becomes [`Pass`](Validation::Pass) and `Err(e)` becomes
    /// [`Fail(e)`](Validation::Fail). Handy when an existing fallible check
    /// is reused as a validator.
    ///
    /// # Examples
    ///
    /// ```
    /// use accrue::prelude::*;
    ///
    /// assert_eq!(Validation::<&str>::from_result(Ok(())), Validation::Pass);
    /// assert_eq!(Validation::from_result(Err("bad")), Validation::Fail("bad"));
    /// ```
    pub fn from_result(result: Result<(), E>) -> Validation<E> {
        match result {
            Ok(()) => Validation::Pass,
            Err(e) => Validation::Fail(e),
        }
    }

    /// Converts this validation into a `Result<(), E>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use accrue::prelude::*;
    ///
    /// assert_eq!(Validation::<&str>::Pass.into_result(), Ok(()));
    /// assert_eq!(Validation::Fail("bad").into_result(), Err("bad"));
    /// ```
    pub fn into_result(self) -> Result<(), E> {
        match self {
            Validation::Pass => Ok(()),
            Validation::Fail(e) => Err(e),
        }
    }
}

impl<E> From<Result<(), E>> for Validation<E> {
    fn from(result: Result<(), E>) -> Self {
        Validation::from_result(result)
    }
}
