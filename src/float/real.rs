use std::fmt;

use malachite::num::arithmetic::traits::Sign;
use malachite::num::conversion::traits::RoundingFrom;
use malachite::rounding_modes::RoundingMode;
use malachite::{Integer, Rational};

/// An exact real number extended with signed zeros, signed infinities and
/// NaN.
///
/// The `Finite` variant never holds zero; zeros are always represented by
/// `Zero` so that their sign is explicit. Structural equality treats NaN as
/// equal to itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Real {
    Zero { negative: bool },
    Finite(Rational),
    Infinite { negative: bool },
    NaN,
}

impl Real {
    pub const ZERO: Real = Real::Zero { negative: false };
    pub const NEG_ZERO: Real = Real::Zero { negative: true };
    pub const INFINITY: Real = Real::Infinite { negative: false };
    pub const NEG_INFINITY: Real = Real::Infinite { negative: true };

    pub fn is_zero(&self) -> bool {
        matches!(self, Real::Zero { .. })
    }

    pub fn is_nan(&self) -> bool {
        matches!(self, Real::NaN)
    }

    /// Returns `true` for values carrying a negative sign, including `-0`
    /// and `-inf`.
    pub fn is_sign_negative(&self) -> bool {
        match self {
            Real::Zero { negative } | Real::Infinite { negative } => *negative,
            Real::Finite(value) => value.sign().is_lt(),
            Real::NaN => false,
        }
    }

    /// Rounds to the nearest `f64`.
    pub fn to_f64(&self) -> f64 {
        match self {
            Real::Zero { negative: false } => 0.0,
            Real::Zero { negative: true } => -0.0,
            Real::Finite(value) => {
                f64::rounding_from(value, RoundingMode::Nearest).0
            }
            Real::Infinite { negative: false } => f64::INFINITY,
            Real::Infinite { negative: true } => f64::NEG_INFINITY,
            Real::NaN => f64::NAN,
        }
    }

    /// Returns the exact value as an integer, if it is one.
    pub fn to_integer(&self) -> Option<Integer> {
        match self {
            Real::Zero { .. } => Some(Integer::from(0)),
            Real::Finite(value) => Integer::try_from(value).ok(),
            _ => None,
        }
    }
}

impl From<Rational> for Real {
    fn from(value: Rational) -> Self {
        if value == 0u32 {
            Real::ZERO
        } else {
            Real::Finite(value)
        }
    }
}

impl From<Integer> for Real {
    fn from(value: Integer) -> Self {
        Real::from(Rational::from(value))
    }
}

impl From<f64> for Real {
    fn from(value: f64) -> Self {
        if value.is_nan() {
            Real::NaN
        } else if value.is_infinite() {
            Real::Infinite {
                negative: value.is_sign_negative(),
            }
        } else if value == 0.0 {
            Real::Zero {
                negative: value.is_sign_negative(),
            }
        } else {
            Rational::try_from(value).map_or(Real::NaN, Real::Finite)
        }
    }
}

impl fmt::Display for Real {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Real::Zero { negative: false } => write!(f, "0"),
            Real::Zero { negative: true } => write!(f, "-0"),
            Real::Finite(value) => write!(f, "{}", value),
            Real::Infinite { negative: false } => write!(f, "inf"),
            Real::Infinite { negative: true } => write!(f, "-inf"),
            Real::NaN => write!(f, "nan"),
        }
    }
}
