//! Time-windowed cache in front of a [`PriceSource`].

use std::time::Duration;

use chrono::Utc;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::domain::PriceSnapshot;
use crate::error::{Error, Result};
use crate::port::PriceSource;

/// Caches the last successful price lookup for a freshness window.
///
/// Age is measured on the monotonic clock, so a wall-clock step cannot make
/// a stale snapshot look fresh. A failed refresh yields an empty enrichment
/// text and leaves the previous snapshot untouched, so the next call retries.
pub struct PriceCache {
    source: Box<dyn PriceSource>,
    window: Duration,
    timeout: Duration,
    snapshot: Option<PriceSnapshot>,
    refreshed_at: Option<Instant>,
}

impl PriceCache {
    pub fn new(source: Box<dyn PriceSource>, window: Duration, timeout: Duration) -> Self {
        Self {
            source,
            window,
            timeout,
            snapshot: None,
            refreshed_at: None,
        }
    }

    /// Last successful snapshot, fresh or not.
    #[must_use]
    pub fn snapshot(&self) -> Option<&PriceSnapshot> {
        self.snapshot.as_ref()
    }

    /// Enrichment text for the next notification, or `""` if unavailable.
    pub async fn price_text(&mut self) -> String {
        if let (Some(snapshot), Some(refreshed_at)) = (&self.snapshot, self.refreshed_at) {
            if refreshed_at.elapsed() < self.window {
                debug!(fetched_at = %snapshot.fetched_at, "Using cached price");
                return snapshot.text();
            }
        }

        match self.refresh().await {
            Ok(text) => text,
            Err(e) => {
                warn!(source = self.source.name(), error = %e, "Price lookup failed");
                String::new()
            }
        }
    }

    async fn refresh(&mut self) -> Result<String> {
        let quote = tokio::time::timeout(self.timeout, self.source.fetch())
            .await
            .map_err(|_| Error::Timeout {
                operation: "price lookup",
                after: self.timeout,
            })??;

        let snapshot = PriceSnapshot::new(quote, Utc::now());
        let text = snapshot.text();
        debug!(
            source = self.source.name(),
            floor_usd = %quote.floor_price_usd,
            volume_usd = %quote.volume_24h_usd,
            "Price refreshed"
        );
        self.snapshot = Some(snapshot);
        self.refreshed_at = Some(Instant::now());
        Ok(text)
    }
}
