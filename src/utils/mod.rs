pub mod diagnostics;
pub mod integer;
pub mod rational;

pub use diagnostics::{Diagnostic, Reporter};
