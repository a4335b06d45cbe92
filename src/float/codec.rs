//! Conversion between reals and custom-width floating-point bit patterns.

use malachite::num::arithmetic::traits::{Abs, FloorLogBase2, PowerOf2, Sign};
use malachite::num::basic::traits::{One, Zero};
use malachite::num::logic::traits::BitAccess;
use malachite::{Natural, Rational};

use super::{FloatLayout, Real};
use crate::utils::rational::RoundBinary;

impl FloatLayout {
    /// Encodes `value` as a bit pattern of this layout.
    ///
    /// The magnitude is first rounded to nearest at `precision` significant
    /// bits; the mantissa is then extracted by truncation. Zero of either
    /// sign encodes as all zeros, so `-0` never survives encoding. The
    /// exponent field is not clamped: magnitudes beyond the largest finite
    /// value produce patterns wider than the layout.
    ///
    /// # Examples
    ///
    /// ```
    /// # use memgen::float::{FloatLayout, Real};
    /// #
    /// let layout = FloatLayout::new(8, 4).unwrap();
    ///
    /// assert_eq!(layout.encode(&Real::from(2.0)), 64u32);
    /// assert_eq!(layout.encode(&Real::from(-2.0)), 192u32);
    /// assert_eq!(layout.encode(&Real::NEG_ZERO), 0u32);
    /// ```
    pub fn encode(&self, value: &Real) -> Natural {
        match value {
            Real::Zero { .. } => Natural::ZERO,
            Real::Infinite { negative } => self.infinity(*negative),
            Real::NaN => self.quiet_nan(),
            Real::Finite(value) => self.encode_finite(value),
        }
    }

    fn encode_finite(&self, value: &Rational) -> Natural {
        let negative = value.sign().is_lt();
        let magnitude = value.abs();

        // Keep `precision` significant bits.
        let lsb =
            (&magnitude).floor_log_base_2() - i64::from(self.precision) + 1;
        let magnitude = magnitude.round_nearest(lsb);

        // Significand in [0.5, 1).
        let mut exponent = (&magnitude).floor_log_base_2() + 1;
        let mut significand = magnitude * Rational::power_of_2(-exponent);

        if exponent <= self.min_exponent {
            let shift = self.min_exponent - exponent + 1;

            significand = significand * Rational::power_of_2(-shift)
                + Rational::power_of_2(-1i64);
            exponent = self.min_exponent;
        }

        let field = exponent + self.bias - 1;
        let mut bits = Natural::from(field.unsigned_abs())
            << u64::from(self.mantissa_width());

        let mut remainder = significand * Rational::from(2u32);

        for i in 1..self.precision {
            let step = Rational::power_of_2(-i64::from(i));
            let reduced = &remainder - step;

            if reduced >= Rational::ONE {
                bits.set_bit(u64::from(self.precision - i - 1));
                remainder = reduced;
            }
        }

        if negative {
            bits += &self.sign_mask;
        }

        bits
    }

    /// Decodes a bit pattern of this layout.
    ///
    /// # Examples
    ///
    /// ```
    /// # use memgen::float::{FloatLayout, Real};
    /// #
    /// let layout = FloatLayout::new(8, 4).unwrap();
    ///
    /// assert_eq!(layout.decode(&64u32.into()), Real::from(2.0));
    /// assert_eq!(layout.decode(&128u32.into()), Real::NEG_ZERO);
    /// assert!(layout.decode(&0x79u32.into()).is_nan());
    /// ```
    pub fn decode(&self, bits: &Natural) -> Real {
        if *bits == 0u32 {
            return Real::ZERO;
        }

        if *bits == self.sign_mask {
            return Real::NEG_ZERO;
        }

        let negative = bits.get_bit(u64::from(self.width - 1));
        let exponent_bits = bits & &self.exponent_mask;
        let mantissa_bits = bits & &self.mantissa_mask;

        if exponent_bits == self.exponent_mask {
            return if mantissa_bits == 0u32 {
                Real::Infinite { negative }
            } else {
                Real::NaN
            };
        }

        let mut mantissa = Rational::ZERO;

        for i in 1..self.precision {
            if mantissa_bits.get_bit(u64::from(self.precision - 1 - i)) {
                mantissa += Rational::power_of_2(-i64::from(i));
            }
        }

        let field = exponent_bits >> u64::from(self.mantissa_width());
        let field = exponent_field(&field);

        let scale = if field > 0 {
            mantissa += Rational::ONE;
            Rational::power_of_2(field - self.bias)
        } else {
            Rational::power_of_2(1 - self.bias)
        };

        let magnitude = scale * mantissa;

        Real::from(if negative { -magnitude } else { magnitude })
    }
}

// The exponent mask bounds the field to `MAX_EXPONENT_WIDTH` bits.
fn exponent_field(field: &Natural) -> i64 {
    u64::try_from(field)
        .ok()
        .and_then(|field| i64::try_from(field).ok())
        .unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::float::LayoutError;

    fn layout(width: u32, precision: u32) -> Result<FloatLayout, LayoutError> {
        FloatLayout::new(width, precision)
    }

    fn bits(layout: &FloatLayout, x: f64) -> Natural {
        layout.encode(&Real::from(x))
    }

    fn value(layout: &FloatLayout, bits: u32) -> f64 {
        layout.decode(&Natural::from(bits)).to_f64()
    }

    #[test]
    fn normal_values() -> Result<(), LayoutError> {
        let layout = layout(8, 4)?;

        assert_eq!(bits(&layout, 1.0), 0x38u32);
        assert_eq!(bits(&layout, 1.5), 0x3cu32);
        assert_eq!(bits(&layout, 2.0), 0x40u32);
        assert_eq!(bits(&layout, 3.75), 0x47u32);
        assert_eq!(bits(&layout, -1.0), 0xb8u32);

        assert_eq!(value(&layout, 0x38), 1.0);
        assert_eq!(value(&layout, 0x47), 3.75);
        assert_eq!(value(&layout, 0xb8), -1.0);

        Ok(())
    }

    #[test]
    fn half_precision_agrees_with_ieee() -> Result<(), LayoutError> {
        let layout = layout(16, 11)?;

        assert_eq!(bits(&layout, 1.0), 0x3c00u32);
        assert_eq!(bits(&layout, -2.5), 0xc100u32);
        assert_eq!(bits(&layout, 65504.0), 0x7bffu32);
        assert_eq!(value(&layout, 0x3555), 0.333251953125);
        assert_eq!(value(&layout, 0x7bff), 65504.0);

        Ok(())
    }

    #[test]
    fn subnormals() -> Result<(), LayoutError> {
        let layout = layout(8, 4)?;

        // Smallest subnormal is 2^-6 * 2^-3.
        assert_eq!(value(&layout, 0x01), 2f64.powi(-9));
        assert_eq!(value(&layout, 0x07), 7.0 * 2f64.powi(-9));
        assert_eq!(value(&layout, 0x08), 2f64.powi(-6));

        assert_eq!(bits(&layout, 2f64.powi(-9)), 0x01u32);
        assert_eq!(bits(&layout, 5.0 * 2f64.powi(-9)), 0x05u32);
        assert_eq!(bits(&layout, 2f64.powi(-6)), 0x08u32);

        Ok(())
    }

    #[test]
    fn rounds_to_precision_before_truncating() -> Result<(), LayoutError> {
        let layout = layout(8, 4)?;

        // 1.0625 is a tie between 1.0 and 1.125 and goes to even.
        assert_eq!(bits(&layout, 1.0625), 0x38u32);
        assert_eq!(bits(&layout, 1.1), 0x39u32);
        assert_eq!(bits(&layout, 1.99), 0x40u32);

        Ok(())
    }

    #[test]
    fn subnormal_mantissa_truncates() -> Result<(), LayoutError> {
        let layout = layout(8, 4)?;

        // 7 * 2^-11 lies between 2^-9 and 2 * 2^-9, closer to the latter.
        assert_eq!(bits(&layout, 7.0 * 2f64.powi(-11)), 0x01u32);
        assert_eq!(bits(&layout, -7.0 * 2f64.powi(-11)), 0x81u32);

        Ok(())
    }

    #[test]
    fn special_values() -> Result<(), LayoutError> {
        let layout = layout(8, 4)?;

        assert_eq!(layout.decode(&Natural::from(0u32)), Real::ZERO);
        assert_eq!(layout.decode(&Natural::from(0x80u32)), Real::NEG_ZERO);
        assert_eq!(layout.decode(&Natural::from(0x78u32)), Real::INFINITY);
        assert_eq!(layout.decode(&Natural::from(0xf8u32)), Real::NEG_INFINITY);
        assert!(layout.decode(&Natural::from(0x7fu32)).is_nan());
        assert!(layout.decode(&Natural::from(0xf9u32)).is_nan());

        assert_eq!(layout.encode(&Real::INFINITY), 0x78u32);
        assert_eq!(layout.encode(&Real::NEG_INFINITY), 0xf8u32);
        assert!(layout.decode(&layout.encode(&Real::NaN)).is_nan());

        Ok(())
    }

    #[test]
    fn negative_zero_does_not_survive_encoding() -> Result<(), LayoutError> {
        let layout = layout(8, 4)?;

        let decoded = layout.decode(&layout.sign_mask().clone());

        assert_eq!(decoded, Real::NEG_ZERO);
        assert_eq!(layout.encode(&decoded), 0u32);

        Ok(())
    }

    #[test]
    fn finite_patterns_round_trip() -> Result<(), LayoutError> {
        let layout = layout(8, 4)?;

        for pattern in 0u32..256 {
            let pattern = Natural::from(pattern);
            let decoded = layout.decode(&pattern);

            if matches!(decoded, Real::Finite(_)) {
                assert_eq!(layout.encode(&decoded), pattern);
            }
        }

        Ok(())
    }

    #[test]
    fn overflow_is_not_clamped() -> Result<(), LayoutError> {
        let layout = layout(8, 4)?;

        // Just past the largest finite value lands on infinity, further
        // out the exponent spills into the sign bit and beyond.
        assert_eq!(bits(&layout, 256.0), 0x78u32);
        assert_eq!(bits(&layout, 512.0), 0x80u32);
        assert_eq!(bits(&layout, 2f64.powi(25)), 0x100u32);

        Ok(())
    }
}
