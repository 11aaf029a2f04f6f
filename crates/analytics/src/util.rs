use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub(crate) const HUNDRED: Decimal = dec!(100);

/// Arithmetic mean, or zero for an empty slice.
pub(crate) fn mean(values: &[Decimal]) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    values.iter().sum::<Decimal>() / Decimal::from(values.len())
}

/// `part / whole * 100`, or zero when `whole` is zero.
pub(crate) fn percentage(part: usize, whole: usize) -> Decimal {
    if whole == 0 {
        return Decimal::ZERO;
    }
    Decimal::from(part) / Decimal::from(whole) * HUNDRED
}
