//! Encoding function results and distributing them over memory banks.

mod distributor;
mod encoder;
mod planner;

pub use distributor::{
    BankDistributor, EvaluationError, MemoryBank, Overflow, PlanError,
};
pub use encoder::{mask, EncodeError, Encoded, OutputEncoder};
pub use planner::{CapacityError, MemoryGeometry, DEFAULT_BANK_CAPACITY};
