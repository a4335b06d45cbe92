//! Functions tabulated into memory.

use crate::domain::{Arguments, Value};

/// A pure function evaluated at every point of its input domain.
///
/// Implemented for closures taking [`Arguments`], so ad hoc functions need
/// no wrapper type:
///
/// ```
/// # use std::convert::Infallible;
/// # use memgen::domain::{Arguments, Value};
/// # use memgen::function::TableFunction;
/// #
/// let double = |args: &Arguments| -> Result<Value, Infallible> {
///     Ok(Value::from(2.0 * args[0].to_f64()))
/// };
///
/// let args: Arguments = [("x", Value::from(1.5))].into_iter().collect();
///
/// assert_eq!(double.evaluate(&args), Ok(Value::from(3.0)));
/// ```
pub trait TableFunction {
    type Error;

    fn evaluate(&self, args: &Arguments) -> Result<Value, Self::Error>;
}

impl<F, E> TableFunction for F
where
    F: Fn(&Arguments) -> Result<Value, E>,
{
    type Error = E;

    fn evaluate(&self, args: &Arguments) -> Result<Value, E> {
        self(args)
    }
}
