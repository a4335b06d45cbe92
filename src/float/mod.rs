//! Custom-width floating-point formats.

mod codec;
mod layout;
mod real;

pub use layout::{FloatLayout, LayoutError, LayoutErrorKind, MAX_EXPONENT_WIDTH};
pub use real::Real;
