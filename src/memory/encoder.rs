use std::fmt;

use malachite::num::arithmetic::traits::ModPowerOf2;
use malachite::num::logic::traits::LowMask;
use malachite::{Integer, Natural};

use crate::domain::Value;
use crate::float::{FloatLayout, LayoutError, Real};
use crate::format::{Format, Kind};

/// Reduces `value` modulo `2^width`, the two's-complement truncation of
/// negative values.
///
/// # Examples
///
/// ```
/// # use malachite::{Integer, Natural};
/// # use memgen::memory::mask;
/// #
/// assert_eq!(mask(&Integer::from(300), 8), 44u32);
/// assert_eq!(mask(&Integer::from(-1), 8), 255u32);
/// assert_eq!(mask(&Integer::from(-256), 8), 0u32);
/// ```
pub fn mask(value: &Integer, width: u32) -> Natural {
    value.mod_power_of_2(u64::from(width))
}

/// An encoded result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Encoded {
    /// The masked word.
    pub bits: Natural,
    /// The unmasked value, when it exceeded the mask.
    pub overflow: Option<Integer>,
}

/// Converts function results into words of the output format.
#[derive(Clone, Debug)]
pub struct OutputEncoder {
    kind: Kind,
    width: u32,
    layout: Option<FloatLayout>,
    limit: Integer,
}

impl OutputEncoder {
    pub fn new(format: &Format) -> Result<OutputEncoder, LayoutError> {
        Ok(OutputEncoder {
            kind: format.kind,
            width: format.width,
            layout: format.layout()?,
            limit: Integer::from(Natural::low_mask(u64::from(format.width))),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    /// The largest word, `2^width - 1`.
    pub fn max_word(&self) -> Natural {
        Natural::low_mask(u64::from(self.width))
    }

    /// Encodes one result.
    ///
    /// Values above `2^width - 1` are reported as overflowing and then
    /// masked. Negative integers are masked without being reported.
    ///
    /// # Examples
    ///
    /// ```
    /// # use malachite::Integer;
    /// # use memgen::domain::Value;
    /// # use memgen::format::Format;
    /// # use memgen::memory::OutputEncoder;
    /// #
    /// let encoder = OutputEncoder::new(&Format::uint(8)).unwrap();
    ///
    /// let word = encoder.encode(&Value::from(300i64)).unwrap();
    ///
    /// assert_eq!(word.bits, 44u32);
    /// assert_eq!(word.overflow, Some(Integer::from(300)));
    /// ```
    pub fn encode(&self, value: &Value) -> Result<Encoded, EncodeError> {
        let raw = match (&self.layout, value) {
            (Some(layout), Value::Integer(value)) => {
                Integer::from(layout.encode(&Real::from(value.clone())))
            }
            (Some(layout), Value::Real(value)) => {
                Integer::from(layout.encode(value))
            }
            (None, Value::Integer(value)) => value.clone(),
            (None, Value::Real(value)) => {
                value.to_integer().ok_or_else(|| EncodeError::NotAnInteger {
                    kind: self.kind,
                    value: value.clone(),
                })?
            }
        };

        let bits = mask(&raw, self.width);
        let overflow = (raw > self.limit).then_some(raw);

        Ok(Encoded { bits, overflow })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EncodeError {
    NotAnInteger { kind: Kind, value: Real },
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EncodeError::NotAnInteger { kind, value } => write!(
                f,
                "result {value} is not an integer and cannot be stored as \
                 {kind}"
            ),
        }
    }
}

impl std::error::Error for EncodeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masking_is_idempotent() {
        for value in [-1000i64, -129, -1, 0, 1, 255, 256, 70000] {
            let value = Integer::from(value);

            for width in [1, 3, 8, 17] {
                let once = mask(&value, width);
                let twice = mask(&Integer::from(once.clone()), width);

                assert_eq!(once, twice);
            }
        }
    }

    #[test]
    fn negative_integers_wrap_silently() {
        let encoder = OutputEncoder::new(&Format::int(8)).unwrap();
        let word = encoder.encode(&Value::from(-3i64)).unwrap();

        assert_eq!(word.bits, 253u32);
        assert_eq!(word.overflow, None);

        let word = encoder.encode(&Value::from(-1000i64)).unwrap();

        assert_eq!(word.bits, 24u32);
        assert_eq!(word.overflow, None);
    }

    #[test]
    fn integral_reals_are_accepted() {
        let encoder = OutputEncoder::new(&Format::uint(4)).unwrap();

        let word = encoder.encode(&Value::from(6.0)).unwrap();

        assert_eq!(word.bits, 6u32);
        assert_eq!(
            encoder.encode(&Value::from(-0.0)).unwrap().bits,
            0u32
        );
    }

    #[test]
    fn fractional_reals_are_rejected() {
        let encoder = OutputEncoder::new(&Format::uint(4)).unwrap();

        assert_eq!(
            encoder.encode(&Value::from(0.5)),
            Err(EncodeError::NotAnInteger {
                kind: Kind::UInt,
                value: Real::from(0.5),
            })
        );
        assert!(encoder.encode(&Value::from(f64::NAN)).is_err());
    }

    #[test]
    fn float_outputs_go_through_the_codec() {
        let encoder = OutputEncoder::new(&Format::float(8, 4)).unwrap();

        assert_eq!(encoder.encode(&Value::from(2i64)).unwrap().bits, 64u32);
        assert_eq!(encoder.encode(&Value::from(-2.0)).unwrap().bits, 192u32);

        let word = encoder.encode(&Value::from(2f64.powi(25))).unwrap();

        assert_eq!(word.bits, 0u32);
        assert_eq!(word.overflow, Some(Integer::from(256)));
    }
}
