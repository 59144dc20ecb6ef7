use rust_decimal::{Decimal, RoundingStrategy};

pub mod discount;
pub mod product;
pub mod product_discount;

/// Amounts are stored as integer hundredths (cents, or hundredths of a percent).
pub(crate) fn decimal_from_hundredths(value: i64) -> Decimal {
    Decimal::new(value, 2)
}

/// Convert an amount to integer hundredths, rounding half-up.
///
/// Saturates outside the `i64` range.
pub(crate) fn hundredths_from_decimal(value: Decimal) -> i64 {
    let mut scaled = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    scaled.rescale(2);
    i64::try_from(scaled.mantissa()).unwrap_or(if scaled.is_sign_negative() {
        i64::MIN
    } else {
        i64::MAX
    })
}
