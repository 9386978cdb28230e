//! Currency precision helpers.

use rust_decimal::Decimal;

/// Number of decimal places amounts are stored with for a currency.
///
/// Zero-decimal currencies are quoted in whole units; everything else uses
/// the conventional two decimal places.
pub fn decimal_places(currency: &str) -> u32 {
    match currency {
        "VND" | "JPY" | "KRW" => 0,
        _ => 2,
    }
}

/// Rounds an amount to the currency's precision.
///
/// `round_dp` uses midpoint-nearest-even (banker's rounding), which keeps
/// repeated aggregation from drifting in one direction.
pub fn round_currency(amount: Decimal, currency: &str) -> Decimal {
    amount.round_dp(decimal_places(currency))
}
