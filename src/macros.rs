/// Macro to build a [`NonEmpty`] from one or more elements.
///
/// Works like `vec!`, except that the empty form does not exist: at least
/// one element is required, which is what makes the result a [`NonEmpty`]
/// rather than a `Vec`. One element produces the
/// [`One`](crate::NonEmpty::One) variant, more produce
/// [`Many`](crate::NonEmpty::Many), in the order written.
///
/// # Examples
///
/// ```
/// use accrue::{nonempty, prelude::*};
///
/// let single = nonempty!["just this"];
/// assert_eq!(single, NonEmpty::One("just this"));
///
/// let several = nonempty![1, 2, 3];
/// assert_eq!(several.len(), 3);
/// assert_eq!(several.head(), &1);
/// ```
///
/// ```compile_fail
/// // There is no empty NonEmpty.
/// let nothing: accrue::NonEmpty<i32> = accrue::nonempty![];
/// ```
///
/// [`NonEmpty`]: crate::NonEmpty
#[macro_export]
macro_rules! nonempty {
    ($first:expr $(,)?) => {
        $crate::NonEmpty::One($first)
    };
    ($first:expr, $($rest:expr),+ $(,)?) => {
        $crate::NonEmpty::Many($first, $crate::__private::vec![$($rest),+])
    };
}
