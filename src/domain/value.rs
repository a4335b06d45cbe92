use std::fmt;

use malachite::{Integer, Natural};

use crate::float::Real;

/// An argument or result value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    Integer(Integer),
    Real(Real),
}

impl Value {
    pub fn as_integer(&self) -> Option<&Integer> {
        match self {
            Value::Integer(value) => Some(value),
            Value::Real(_) => None,
        }
    }

    pub fn as_real(&self) -> Option<&Real> {
        match self {
            Value::Real(value) => Some(value),
            Value::Integer(_) => None,
        }
    }

    /// Converts to the nearest `f64`.
    pub fn to_f64(&self) -> f64 {
        match self {
            Value::Integer(value) => Real::from(value.clone()).to_f64(),
            Value::Real(value) => value.to_f64(),
        }
    }
}

impl From<Integer> for Value {
    fn from(value: Integer) -> Self {
        Value::Integer(value)
    }
}

impl From<Natural> for Value {
    fn from(value: Natural) -> Self {
        Value::Integer(Integer::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(Integer::from(value))
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Integer(Integer::from(value))
    }
}

impl From<Real> for Value {
    fn from(value: Real) -> Self {
        Value::Real(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Real(Real::from(value))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Integer(value) => write!(f, "{}", value),
            Value::Real(value) => write!(f, "{}", value),
        }
    }
}
