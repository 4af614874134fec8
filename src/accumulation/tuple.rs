use alloc::vec::Vec;

use crate::{NonEmpty, Outcome};

/// Fixed-arity accumulation over a tuple of outcomes with unrelated success
/// types.
///
/// Implemented for tuples of `Outcome<Gi, NonEmpty<E>>` from arity 2 through
/// 8, sharing one error element type `E`. Where the iterator-based
/// [`combined`](crate::accumulation::combined) needs every success to have
/// the same type, a tuple keeps each position's type — so a parsed age, a
/// parsed name, and a parsed address can be combined into one record while
/// still reporting every parse failure together.
///
/// The merge policy is the module-wide one: if every element is `Good`, the
/// combining function receives the success values as a tuple, in position
/// order; otherwise the errors of every `Bad` element are concatenated in
/// position order — each element's own errors staying in their stored order
/// — and the combining function never runs.
///
/// # Examples
///
/// ```
/// use accrue::{nonempty, prelude::*};
///
/// struct Person {
///     name: String,
///     age: i32,
/// }
///
/// fn parse_name(input: &str) -> Outcome<String, NonEmpty<String>> {
///     if input.trim().is_empty() {
///         Outcome::Bad(format!("{input:?} is not a valid name")).accumulating()
///     } else {
///         Outcome::Good(input.trim().to_string())
///     }
/// }
///
/// fn parse_age(input: &str) -> Outcome<i32, NonEmpty<String>> {
///     match input.parse::<i32>() {
///         Ok(age) if age >= 0 => Outcome::Good(age),
///         _ => Outcome::Bad(format!("{input:?} is not a valid age")).accumulating(),
///     }
/// }
///
/// let person = (parse_name("Ada"), parse_age("36"))
///     .with_good(|(name, age)| Person { name, age });
/// assert!(person.exists(|p| p.name == "Ada" && p.age == 36));
///
/// // Both failures are reported, left to right.
/// let person = (parse_name("  "), parse_age("-1"))
///     .with_good(|(name, age)| Person { name, age });
/// assert_eq!(
///     person.map(|_| ()),
///     Outcome::Bad(nonempty![
///         "\"  \" is not a valid name".to_string(),
///         "\"-1\" is not a valid age".to_string(),
///     ]),
/// );
/// ```
pub trait WithGood<E>: Sized {
    /// The tuple of success types, one per position.
    type Goods;

    /// Applies `f` to the success values if every element is `Good`;
    /// otherwise merges every element's errors in position order.
    fn with_good<R, F>(self, f: F) -> Outcome<R, NonEmpty<E>>
    where
        F: FnOnce(Self::Goods) -> R;

    /// [`with_good`](Self::with_good) with a tuple-building combining
    /// function: the successes come back as a tuple, the failures merge
    /// exactly as in `with_good`.
    ///
    /// # Examples
    ///
    /// ```
    /// use accrue::prelude::*;
    ///
    /// let a: Outcome<i32, NonEmpty<&str>> = Outcome::Good(1);
    /// let b: Outcome<char, NonEmpty<&str>> = Outcome::Good('x');
    /// assert_eq!((a, b).zipped(), Outcome::Good((1, 'x')));
    /// ```
    fn zipped(self) -> Outcome<Self::Goods, NonEmpty<E>> {
        self.with_good(|goods| goods)
    }
}

macro_rules! impl_with_good {
    ($($slot:ident: $good:ident),+ $(,)?) => {
        impl<E, $($good,)+> WithGood<E> for ($(Outcome<$good, NonEmpty<E>>,)+) {
            type Goods = ($($good,)+);

            fn with_good<R, F>(self, f: F) -> Outcome<R, NonEmpty<E>>
            where
                F: FnOnce(Self::Goods) -> R,
            {
                match self {
                    ($(Outcome::Good($slot),)+) => Outcome::Good(f(($($slot,)+))),
                    ($($slot,)+) => {
                        let mut errors = Vec::new();
                        $(
                            if let Outcome::Bad(failed) = $slot {
                                errors.extend(failed);
                            }
                        )+
                        match NonEmpty::from_vec(errors) {
                            Some(errors) => Outcome::Bad(errors),
                            // This arm is only reached when at least one
                            // element was `Bad`.
                            None => unreachable!(),
                        }
                    }
                }
            }
        }
    };
}

impl_with_good!(g0: G0, g1: G1);
impl_with_good!(g0: G0, g1: G1, g2: G2);
impl_with_good!(g0: G0, g1: G1, g2: G2, g3: G3);
impl_with_good!(g0: G0, g1: G1, g2: G2, g3: G3, g4: G4);
impl_with_good!(g0: G0, g1: G1, g2: G2, g3: G3, g4: G4, g5: G5);
impl_with_good!(g0: G0, g1: G1, g2: G2, g3: G3, g4: G4, g5: G5, g6: G6);
impl_with_good!(g0: G0, g1: G1, g2: G2, g3: G3, g4: G4, g5: G5, g6: G6, g7: G7);
