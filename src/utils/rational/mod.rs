mod rounding;

pub use rounding::RoundBinary;
