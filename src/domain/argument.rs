use malachite::num::arithmetic::traits::PowerOf2;
use malachite::{Integer, Natural};

use super::Value;
use crate::float::{FloatLayout, LayoutError};
use crate::format::{Format, Kind};

/// Decodes raw bit patterns of one argument into typed values.
#[derive(Clone, Debug)]
pub struct ArgumentDomain {
    kind: Kind,
    width: u32,
    layout: Option<FloatLayout>,
}

impl ArgumentDomain {
    pub fn new(format: &Format) -> Result<ArgumentDomain, LayoutError> {
        Ok(ArgumentDomain {
            kind: format.kind,
            width: format.width,
            layout: format.layout()?,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    /// The largest raw pattern, `2^width - 1`.
    pub fn max_raw(&self) -> u64 {
        u64::MAX.checked_shr(64 - self.width.min(64)).unwrap_or(0)
    }

    /// Interprets `raw`, a pattern in `[0, 2^width)`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use memgen::domain::{ArgumentDomain, Value};
    /// # use memgen::format::Format;
    /// #
    /// let domain = ArgumentDomain::new(&Format::int(4)).unwrap();
    ///
    /// assert_eq!(domain.value(0b0111), Value::from(7i64));
    /// assert_eq!(domain.value(0b1000), Value::from(-8i64));
    /// assert_eq!(domain.value(0b1111), Value::from(-1i64));
    /// ```
    pub fn value(&self, raw: u64) -> Value {
        match (&self.layout, self.kind) {
            (Some(layout), _) => {
                Value::Real(layout.decode(&Natural::from(raw)))
            }
            (None, Kind::Int) if raw > self.max_raw() >> 1 => {
                let modulus = Integer::power_of_2(u64::from(self.width));

                Value::Integer(Integer::from(raw) - modulus)
            }
            (None, _) => Value::from(raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::float::Real;

    #[test]
    fn unsigned_is_identity() {
        let domain = ArgumentDomain::new(&Format::uint(4)).unwrap();

        assert_eq!(domain.value(15), Value::from(15u64));
        assert_eq!(domain.max_raw(), 15);
    }

    #[test]
    fn floats_decode_through_layout() {
        let domain = ArgumentDomain::new(&Format::float(8, 4)).unwrap();

        assert_eq!(domain.value(64), Value::Real(Real::from(2.0)));
        assert_eq!(domain.value(128), Value::Real(Real::NEG_ZERO));
    }

    #[test]
    fn full_width_patterns() {
        let domain = ArgumentDomain::new(&Format::int(63)).unwrap();

        assert_eq!(domain.value(1 << 62), Value::from(-(1i64 << 62)));
    }

    #[test]
    fn invalid_layout_is_reported() {
        assert!(ArgumentDomain::new(&Format::float(4, 4)).is_err());
    }
}
