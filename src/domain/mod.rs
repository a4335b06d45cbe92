//! Function signatures and enumeration of their input domains.

mod argument;
mod enumerator;
mod spec;
mod value;

pub use argument::ArgumentDomain;
pub use enumerator::{Arguments, DomainEnumerator, DomainError};
pub use spec::{ArgumentSpec, FunctionSpec, SpecError, MAX_ADDRESS_WIDTH};
pub use value::Value;
