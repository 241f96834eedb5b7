//! Notifier port for listing alerts.
//!
//! Unlike fire-and-forget event sinks, a listing notification is awaited to
//! completion so alerts leave in the same order listings arrived.

use async_trait::async_trait;
use tracing::info;

use crate::domain::{ChatTarget, Listing};
use crate::error::Result;

/// Trait for listing notification sinks.
///
/// # Implementation Notes
///
/// - Implementations must be thread-safe (`Send + Sync`)
/// - Return `Err` on any delivery failure; callers log it and move on
/// - Timeouts are enforced by the caller
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one listing alert to `chat`.
    ///
    /// `price_text` is the collection price enrichment and may be empty.
    async fn notify(&self, chat: &ChatTarget, listing: &Listing, price_text: &str) -> Result<()>;

    /// Notifier name used in logs.
    fn name(&self) -> &'static str;
}

/// A logging notifier that reports alerts via tracing instead of sending them.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, chat: &ChatTarget, listing: &Listing, price_text: &str) -> Result<()> {
        info!(
            chat = %chat,
            inscription = %listing.external_id(),
            name = %listing.name(),
            price_btc = %listing.price_btc(),
            price_usd = %listing.price_usd(),
            url = %listing.detail_url(),
            price_text = %price_text,
            "Listing alert"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
