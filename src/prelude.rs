//! Commonly used items for convenient importing.
//!
//! The prelude re-exports the types, traits, macros and combinators most
//! code touches, so a single `use` statement is enough:
//!
//! ```rust
//! use accrue::prelude::*;
//!
//! fn parse_age(input: &str) -> Outcome<i32, NonEmpty<String>> {
//!     match input.parse::<i32>() {
//!         Ok(age) if age >= 0 => Outcome::Good(age),
//!         _ => Outcome::Bad(format!("{input:?} is not a valid age")).accumulating(),
//!     }
//! }
//!
//! let ages: Outcome<Vec<i32>, _> = validated_by(["29", "30"], parse_age);
//! assert_eq!(ages, Outcome::Good(vec![29, 30]));
//! ```
//!
//! # What's Included
//!
//! - **[`Outcome`]**, **[`NonEmpty`]**, **[`Validation`]**: the three core
//!   types
//! - **[`combined`]**, **[`validated_by`]**, **[`when`]**: the synchronous
//!   accumulation combinators
//! - **[`WithGood`]**: fixed-arity accumulation over tuples of outcomes
//! - **[`IteratorExt`]**: `collect_combined` and friends on iterators
//! - **[`nonempty!`]**: the [`NonEmpty`] constructor macro
//! - With the `std` feature: **[`CompletionCell`]** and
//!   **[`WithGoodCells`]**, the asynchronous layer
//!
//! The asynchronous free functions stay behind their module —
//! `accrue::cell::accumulate::{combined, sequence, ...}` — because their
//! names mirror the synchronous ones.
//!
//! [`nonempty!`]: crate::nonempty
//! [`combined`]: crate::accumulation::combined
//! [`validated_by`]: crate::accumulation::validated_by
//! [`when`]: crate::accumulation::when
//! [`WithGood`]: crate::accumulation::WithGood
//! [`CompletionCell`]: crate::cell::CompletionCell
//! [`WithGoodCells`]: crate::cell::accumulate::WithGoodCells

pub use crate::{
    NonEmpty, Outcome, Validation,
    accumulation::{WithGood, combined, validated_by, when},
    iterator_ext::IteratorExt,
    nonempty,
};

#[cfg(feature = "std")]
pub use crate::cell::{CompletionCell, accumulate::WithGoodCells};
