//! Monetary amounts and their display formatting.

use rust_decimal::{Decimal, RoundingStrategy};

/// Satoshis per bitcoin.
pub const SATS_PER_BTC: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 0);

/// Convert an integer satoshi amount to BTC.
#[must_use]
pub fn sats_to_btc(sats: Decimal) -> Decimal {
    sats / SATS_PER_BTC
}

/// Format with exactly `dp` decimal places, rounding half away from zero.
#[must_use]
pub fn fixed(amount: Decimal, dp: u32) -> String {
    let rounded = amount.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}", dp as usize, rounded)
}

/// Round to a whole number and group thousands with `,` (e.g. `60,123`).
#[must_use]
pub fn grouped_whole(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let digits = rounded.abs().trunc().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-{grouped}")
    } else {
        grouped
    }
}
