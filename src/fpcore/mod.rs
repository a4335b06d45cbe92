//! FPCore front end.

pub mod ast;
mod bind;
mod constants;
mod eval;
mod parser;

pub use bind::bind;
pub use eval::{CompiledFunction, EvalError};
pub use parser::FPCoreParser;
