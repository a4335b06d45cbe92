use std::fmt;

use malachite::num::arithmetic::traits::PowerOf2;
use malachite::num::logic::traits::LowMask;
use malachite::Natural;

/// The widest supported exponent field.
///
/// Decoding is exact, so a value at either end of the exponent range holds
/// a numerator or denominator of about `2^(exponent_width - 1)` bits. At
/// 16 bits that is 4 KiB per value; at 40 bits it would be 64 GiB.
pub const MAX_EXPONENT_WIDTH: u32 = 16;

/// Bit layout of a custom-width floating-point format.
///
/// A format with `width` total bits and `precision` significant bits (the
/// implicit leading one included) has one sign bit, `width - precision`
/// exponent bits and `precision - 1` explicit mantissa bits, most
/// significant first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FloatLayout {
    pub(super) width: u32,
    pub(super) precision: u32,
    pub(super) exponent_width: u32,
    pub(super) bias: i64,
    pub(super) min_exponent: i64,
    pub(super) sign_mask: Natural,
    pub(super) exponent_mask: Natural,
    pub(super) mantissa_mask: Natural,
}

impl FloatLayout {
    /// Constructs the layout for `width` bits with `precision` significant
    /// bits.
    ///
    /// # Examples
    ///
    /// ```
    /// # use memgen::float::FloatLayout;
    /// #
    /// let layout = FloatLayout::new(8, 4).unwrap();
    ///
    /// assert_eq!(layout.exponent_width(), 4);
    /// assert_eq!(layout.bias(), 7);
    /// assert_eq!(layout.min_exponent(), -6);
    ///
    /// assert!(FloatLayout::new(8, 8).is_err());
    /// ```
    pub fn new(width: u32, precision: u32) -> Result<FloatLayout, LayoutError> {
        let error = |kind| LayoutError {
            kind,
            width,
            precision,
        };

        if precision < 1 {
            return Err(error(LayoutErrorKind::NoPrecision));
        }

        if precision >= width {
            return Err(error(LayoutErrorKind::NoExponent));
        }

        let exponent_width = width - precision;

        if exponent_width > MAX_EXPONENT_WIDTH {
            return Err(error(LayoutErrorKind::ExponentTooWide));
        }

        let half_range = 1i64 << (exponent_width - 1);
        let mantissa_width = u64::from(precision - 1);

        Ok(FloatLayout {
            width,
            precision,
            exponent_width,
            bias: half_range - 1,
            min_exponent: -(half_range - 2),
            sign_mask: Natural::power_of_2(u64::from(width - 1)),
            exponent_mask: Natural::low_mask(u64::from(exponent_width))
                << mantissa_width,
            mantissa_mask: Natural::low_mask(mantissa_width),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    pub fn exponent_width(&self) -> u32 {
        self.exponent_width
    }

    pub fn mantissa_width(&self) -> u32 {
        self.precision - 1
    }

    pub fn bias(&self) -> i64 {
        self.bias
    }

    /// The smallest exponent of a normal value, with significands taken in
    /// `[0.5, 1)`.
    pub fn min_exponent(&self) -> i64 {
        self.min_exponent
    }

    pub fn sign_mask(&self) -> &Natural {
        &self.sign_mask
    }

    pub fn exponent_mask(&self) -> &Natural {
        &self.exponent_mask
    }

    pub fn mantissa_mask(&self) -> &Natural {
        &self.mantissa_mask
    }

    /// The bit pattern of an infinity.
    pub fn infinity(&self, negative: bool) -> Natural {
        if negative {
            &self.exponent_mask + &self.sign_mask
        } else {
            self.exponent_mask.clone()
        }
    }

    /// The canonical quiet NaN, with only the leading mantissa bit set.
    pub fn quiet_nan(&self) -> Natural {
        if self.precision > 1 {
            &self.exponent_mask
                + Natural::power_of_2(u64::from(self.precision - 2))
        } else {
            // No mantissa bits to distinguish NaN from infinity.
            self.exponent_mask.clone()
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutErrorKind {
    NoPrecision,
    NoExponent,
    ExponentTooWide,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayoutError {
    pub kind: LayoutErrorKind,
    pub width: u32,
    pub precision: u32,
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            LayoutErrorKind::NoPrecision => {
                write!(f, "precision must be at least 1")
            }
            LayoutErrorKind::NoExponent => write!(
                f,
                "precision ({}) must be less than width ({})",
                self.precision, self.width
            ),
            LayoutErrorKind::ExponentTooWide => write!(
                f,
                "exponent field of {} bits exceeds the supported maximum of \
                 {MAX_EXPONENT_WIDTH}",
                self.width - self.precision
            ),
        }
    }
}

impl std::error::Error for LayoutError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_partition_the_word() {
        let layout = FloatLayout::new(16, 11).unwrap();

        assert_eq!(*layout.sign_mask(), 0x8000u32);
        assert_eq!(*layout.exponent_mask(), 0x7c00u32);
        assert_eq!(*layout.mantissa_mask(), 0x03ffu32);
        assert_eq!(layout.bias(), 15);
        assert_eq!(layout.min_exponent(), -13);
    }

    #[test]
    fn single_bit_exponent() {
        let layout = FloatLayout::new(4, 3).unwrap();

        assert_eq!(layout.bias(), 0);
        assert_eq!(layout.min_exponent(), 1);
    }

    #[test]
    fn rejects_degenerate_layouts() {
        let kind = |w, p| FloatLayout::new(w, p).unwrap_err().kind;

        assert_eq!(kind(8, 0), LayoutErrorKind::NoPrecision);
        assert_eq!(kind(8, 8), LayoutErrorKind::NoExponent);
        assert_eq!(kind(8, 9), LayoutErrorKind::NoExponent);
        assert_eq!(kind(100, 10), LayoutErrorKind::ExponentTooWide);
        assert_eq!(kind(40, 8), LayoutErrorKind::ExponentTooWide);
        assert!(FloatLayout::new(24, 8).is_ok());
    }

    #[test]
    fn special_patterns() {
        let layout = FloatLayout::new(8, 4).unwrap();

        assert_eq!(layout.infinity(false), 0x78u32);
        assert_eq!(layout.infinity(true), 0xf8u32);
        assert_eq!(layout.quiet_nan(), 0x7cu32);
    }
}
