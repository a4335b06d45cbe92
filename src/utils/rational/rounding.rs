use malachite::num::arithmetic::traits::RoundToMultipleOfPowerOf2;
use malachite::rounding_modes::RoundingMode;

/// Rounding to a multiple of a power of two.
///
/// `position` names the weight of the least significant bit kept, so
/// `x.floor(-3)` rounds down to a multiple of 1/8.
pub trait RoundBinary: Sized {
    type Output;

    fn round(self, position: i64, mode: RoundingMode) -> Self::Output;

    #[inline]
    fn floor(self, position: i64) -> Self::Output {
        self.round(position, RoundingMode::Floor)
    }

    #[inline]
    fn round_towards_zero(self, position: i64) -> Self::Output {
        self.round(position, RoundingMode::Down)
    }

    /// Rounds to the nearest multiple, breaking ties towards an even
    /// multiple.
    #[inline]
    fn round_nearest(self, position: i64) -> Self::Output {
        self.round(position, RoundingMode::Nearest)
    }
}

impl<T> RoundBinary for T
where
    T: RoundToMultipleOfPowerOf2<i64>,
{
    type Output = T::Output;

    fn round(self, position: i64, mode: RoundingMode) -> Self::Output {
        self.round_to_multiple_of_power_of_2(position, mode).0
    }
}
