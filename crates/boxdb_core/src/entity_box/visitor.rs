//! Visitor protocols for box scans.

use crate::error::StoreError;
use std::ops::ControlFlow;

/// Receives the items of a box scan one at a time.
///
/// Returning `ControlFlow::Break(())` ends the scan after the current item;
/// returning an error ends it and propagates the error unchanged. Store
/// errors raised by the scan itself reach the caller through
/// `From<StoreError>` on [`Visitor::Error`].
///
/// Closures are adapted with [`ShortCircuit`], [`Fallible`] and
/// [`FallibleShortCircuit`]; implement the trait directly for stateful
/// visitors.
///
/// # Example
///
/// ```rust
/// use boxdb_core::{StoreError, Visitor};
/// use std::ops::ControlFlow;
///
/// /// Sums values until the total exceeds a budget.
/// struct Budget {
///     total: u64,
///     limit: u64,
/// }
///
/// impl Visitor<u64> for Budget {
///     type Error = StoreError;
///
///     fn visit(&mut self, value: u64) -> Result<ControlFlow<()>, StoreError> {
///         self.total += value;
///         if self.total > self.limit {
///             Ok(ControlFlow::Break(()))
///         } else {
///             Ok(ControlFlow::Continue(()))
///         }
///     }
/// }
///
/// let mut budget = Budget { total: 0, limit: 5 };
/// assert!(budget.visit(3).unwrap().is_continue());
/// assert!(budget.visit(3).unwrap().is_break());
/// ```
pub trait Visitor<T> {
    /// Error type of the visitor.
    type Error;

    /// Visits one item.
    ///
    /// # Errors
    ///
    /// Any error ends the scan and is returned by it unchanged.
    fn visit(&mut self, item: T) -> Result<ControlFlow<()>, Self::Error>;
}

impl<T, V: Visitor<T> + ?Sized> Visitor<T> for &mut V {
    type Error = V::Error;

    fn visit(&mut self, item: T) -> Result<ControlFlow<()>, Self::Error> {
        (**self).visit(item)
    }
}

/// Adapts `FnMut(T) -> bool`: the scan continues while the closure returns
/// `true`.
#[derive(Debug, Clone, Copy)]
pub struct ShortCircuit<F>(pub F);

impl<T, F> Visitor<T> for ShortCircuit<F>
where
    F: FnMut(T) -> bool,
{
    type Error = StoreError;

    fn visit(&mut self, item: T) -> Result<ControlFlow<()>, StoreError> {
        Ok(continue_if((self.0)(item)))
    }
}

/// Adapts `FnMut(T) -> Result<(), Err>`: the scan visits every item unless
/// the closure fails.
#[derive(Debug, Clone, Copy)]
pub struct Fallible<F>(pub F);

impl<T, Err, F> Visitor<T> for Fallible<F>
where
    F: FnMut(T) -> Result<(), Err>,
{
    type Error = Err;

    fn visit(&mut self, item: T) -> Result<ControlFlow<()>, Err> {
        (self.0)(item).map(ControlFlow::Continue)
    }
}

/// Adapts `FnMut(T) -> Result<bool, Err>`: the scan ends at the first `false`
/// or the first error, whichever comes first.
#[derive(Debug, Clone, Copy)]
pub struct FallibleShortCircuit<F>(pub F);

impl<T, Err, F> Visitor<T> for FallibleShortCircuit<F>
where
    F: FnMut(T) -> Result<bool, Err>,
{
    type Error = Err;

    fn visit(&mut self, item: T) -> Result<ControlFlow<()>, Err> {
        (self.0)(item).map(continue_if)
    }
}

fn continue_if(keep_going: bool) -> ControlFlow<()> {
    if keep_going {
        ControlFlow::Continue(())
    } else {
        ControlFlow::Break(())
    }
}
