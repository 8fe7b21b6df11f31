//! Rounding and fixed-precision formatting shared by readouts and results.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::MAX_DECIMAL_PLACES;

/// Rounds a decimal value to `places` decimal places using half-up rounding.
///
/// Values at exactly the midpoint are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tvm_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.455), 2), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455), 2), dec!(-123.46)); // Away from zero
/// assert_eq!(round_half_up(dec!(0.5), 0), dec!(1));
/// ```
pub fn round_half_up(
    value: Decimal,
    places: u32,
) -> Decimal {
    value.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats a float with exactly `places` decimals.
///
/// The float's exact binary value is rounded half-up, so `1628.894626…`
/// becomes `"1628.89"` and `2.5` with zero places becomes `"3"`. Results
/// that round to zero print unsigned. Values outside the `Decimal` range
/// (including NaN and infinities) fall back to scientific notation.
/// `places` is capped at [`MAX_DECIMAL_PLACES`].
///
/// # Examples
///
/// ```
/// use tvm_core::calculations::common::format_fixed;
///
/// assert_eq!(format_fixed(2.0, 2), "2.00");
/// assert_eq!(format_fixed(-0.001, 2), "0.00");
/// ```
pub fn format_fixed(
    value: f64,
    places: u32,
) -> String {
    let places = places.min(MAX_DECIMAL_PLACES);
    match Decimal::from_f64_retain(value) {
        Some(decimal) => {
            let mut rounded = round_half_up(decimal, places);
            if rounded.is_zero() {
                rounded = Decimal::ZERO;
            }
            format!("{:.*}", places as usize, rounded)
        }
        None => format!("{:.*e}", places as usize, value),
    }
}
