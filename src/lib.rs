#![cfg_attr(not(doc), no_std)]
#![deny(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
#![forbid(unsafe_code)]
// Make docs.rs generate better docs
#![cfg_attr(docsrs, feature(doc_cfg))]

//! A success-or-failure type that accumulates every validation failure.
//!
//! ## Overview
//!
//! Rust's `Result` — and this crate's [`Outcome`] — short-circuits: the
//! first failure wins and everything after it goes unchecked. That is the
//! right default for plumbing, and exactly the wrong behavior for
//! validation, where the caller deserves to hear about *all* the problems
//! with their input at once, not one per attempt.
//!
//! This crate provides the accumulating alternative. An
//! `Outcome<G, NonEmpty<E>>` is a success or a non-empty collection of
//! errors, and the combinators in [`accumulation`] fan out over any number
//! of such outcomes, merging every failure into one collection under a
//! fixed, deterministic ordering: across inputs in their given order, within
//! each input in its own order, nothing deduplicated, nothing reordered.
//!
//! ## Quick Example
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
//! // Every invalid input is reported, not just the first.
//! let ages: Outcome<Vec<i32>, _> = validated_by(["29", "-30", "-31"], parse_age);
//! assert_eq!(
//!     ages,
//!     Outcome::Bad(nonempty![
//!         "\"-30\" is not a valid age".to_string(),
//!         "\"-31\" is not a valid age".to_string(),
//!     ]),
//! );
//! ```
//!
//! ## Core Concepts
//!
//! Four pieces compose into the whole:
//!
//! - **[`Outcome<G, B>`]** — the disjunction. Either [`Good`] or [`Bad`],
//!   exactly one, fixed at construction. Converts losslessly to and from
//!   `Result`. Its [`accumulating`] method widens a single failure into the
//!   accumulating shape.
//! - **[`NonEmpty<T>`]** — an ordered, immutable collection with at least
//!   one element, by construction. The failure side of every accumulating
//!   outcome, which is how "a failed batch carries at least one error"
//!   becomes a type-level fact instead of a runtime assertion.
//! - **[`Validation<E>`]** — the pass/fail answer of a validator function,
//!   consumed by [`Outcome::filter`] and [`when`].
//! - **The combinators** — [`WithGood`] over tuples of independently-typed
//!   outcomes, [`combined`]/[`validated_by`] over iterators of same-typed
//!   ones, [`when`] checking one value against many validators, and
//!   [`IteratorExt`] as adaptor sugar. All of them either produce one
//!   combined success or merge the failures of *every* failing input.
//!
//! With the `std` feature (on by default), the [`cell`] module adds the
//! asynchronous half: [`CompletionCell`], a write-once future/promise over
//! an [`Outcome`], and [`cell::accumulate`], which mirrors every combinator
//! across concurrently-running computations — fanning in N background
//! results and merging them with the exact semantics of the synchronous
//! engine, regardless of completion order. Execution happens on pluggable
//! contexts from the [`accrue-executor`] crate (re-exported as
//! [`executor`]): a [`ThreadPool`] for production, an inline
//! [`CallingThread`] for deterministic tests; there is deliberately no
//! process-wide default.
//!
//! ## Accumulating vs. fail-fast
//!
//! Short-circuiting and accumulating both exist on purpose, as separately
//! named operations, and callers pick one deliberately:
//!
//! | short-circuits | accumulates everything |
//! |---|---|
//! | [`Outcome::and_then`] | [`WithGood::with_good`] |
//! | [`Validation::and`] | [`when`] |
//! | [`cell::accumulate::sequence`] | [`cell::accumulate::combined`] |
//!
//! ## Feature Flags
//!
//! - **`std`** *(default)* — the [`cell`] module, the executor re-export,
//!   and everything else that needs threads and clocks. Disable it
//!   (`default-features = false`) for a `no_std + alloc` build of the
//!   synchronous core.
//!
//! [`Good`]: Outcome::Good
//! [`Bad`]: Outcome::Bad
//! [`accumulating`]: Outcome::accumulating
//! [`Outcome<G, B>`]: Outcome
//! [`NonEmpty<T>`]: NonEmpty
//! [`Validation<E>`]: Validation
//! [`combined`]: accumulation::combined
//! [`validated_by`]: accumulation::validated_by
//! [`when`]: accumulation::when
//! [`WithGood`]: accumulation::WithGood
//! [`WithGood::with_good`]: accumulation::WithGood::with_good
//! [`CompletionCell`]: cell::CompletionCell
//! [`ThreadPool`]: accrue_executor::ThreadPool
//! [`CallingThread`]: accrue_executor::CallingThread
//! [`accrue-executor`]: accrue_executor

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod macros;

pub mod accumulation;
pub mod non_empty;
pub mod outcome;
pub mod prelude;
pub mod validation;

#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
pub mod cell;

mod iterator_ext;

pub use self::{
    iterator_ext::IteratorExt, non_empty::NonEmpty, outcome::Outcome, validation::Validation,
};

/// The execution-context collaborator, re-exported from
/// [`accrue-executor`](accrue_executor).
#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
pub use accrue_executor as executor;

// Not public API. Referenced by macro-generated code.
#[doc(hidden)]
pub mod __private {
    #[doc(hidden)]
    pub use alloc::vec;
}
