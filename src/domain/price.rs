//! Collection price data.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::money::fixed;

/// Floor price and 24h volume as returned by a price source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PriceQuote {
    pub floor_price_usd: Decimal,
    pub volume_24h_usd: Decimal,
}

/// A quote together with the wall-clock moment it was fetched.
///
/// `fetched_at` is informational; freshness is tracked on a monotonic clock
/// by the cache that owns the snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceSnapshot {
    pub quote: PriceQuote,
    pub fetched_at: DateTime<Utc>,
}

impl PriceSnapshot {
    #[must_use]
    pub fn new(quote: PriceQuote, fetched_at: DateTime<Utc>) -> Self {
        Self { quote, fetched_at }
    }

    /// Render the enrichment text appended to notifications.
    #[must_use]
    pub fn text(&self) -> String {
        format!(
            "💎 Floor Price: ${}\n♻️ 24h Vol: ${}",
            fixed(self.quote.floor_price_usd, 2),
            fixed(self.quote.volume_24h_usd, 2)
        )
    }
}
