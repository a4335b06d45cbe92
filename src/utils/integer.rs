//! Integer functions.

/// Computes the floor of the base-2 log of `x`. Panics if `x` is zero.
///
/// # Examples
///
/// ```
/// # use memgen::utils::integer::floor_log2;
/// #
/// assert_eq!(floor_log2(1), 0);
/// assert_eq!(floor_log2(2304), 11);
/// ```
pub fn floor_log2(x: u64) -> u32 {
    assert!(x != 0);

    u64::BITS - 1 - x.leading_zeros()
}

/// Computes the ceiling of the base-2 log of `x`. Panics if `x` is zero.
///
/// # Examples
///
/// ```
/// # use memgen::utils::integer::ceil_log2;
/// #
/// assert_eq!(ceil_log2(1), 0);
/// assert_eq!(ceil_log2(2048), 11);
/// assert_eq!(ceil_log2(2049), 12);
/// ```
pub fn ceil_log2(x: u64) -> u32 {
    assert!(x != 0);

    u64::BITS - (x - 1).leading_zeros()
}
