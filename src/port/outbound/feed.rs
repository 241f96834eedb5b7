//! Marketplace feed port.
//!
//! A [`FeedStream`] is a single bidirectional connection to the marketplace
//! event feed. It knows how to connect and subscribe but does not reconnect
//! on its own; the watcher loop owns reconnection and heartbeat handling.

use async_trait::async_trait;

use crate::error::Result;

/// Parameters of the collection-scoped subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionSubscription {
    /// Chain identifier, e.g. `bitcoin`.
    pub chain: String,
    /// Marketplace collection symbol, e.g. `stones`.
    pub collection_symbol: String,
}

impl CollectionSubscription {
    pub fn new(chain: impl Into<String>, collection_symbol: impl Into<String>) -> Self {
        Self {
            chain: chain.into(),
            collection_symbol: collection_symbol.into(),
        }
    }
}

/// A frame received from the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedFrame {
    /// Text payload: either the literal heartbeat or a JSON document.
    Text(String),
    /// The connection ended (close frame, socket error, failed write).
    Closed {
        /// Human-readable reason for the closure.
        reason: String,
    },
}

/// Port for the long-lived marketplace subscription.
#[async_trait]
pub trait FeedStream: Send {
    /// Open a fresh connection, dropping any previous one.
    async fn connect(&mut self) -> Result<()>;

    /// Send the subscribe control frames for `subscription`.
    async fn subscribe(&mut self, subscription: &CollectionSubscription) -> Result<()>;

    /// Send a raw text frame (used for heartbeat replies).
    async fn send_text(&mut self, text: &str) -> Result<()>;

    /// Wait for the next frame.
    ///
    /// Returns `None` if there is no open connection or the stream ended.
    async fn next_frame(&mut self) -> Option<FeedFrame>;

    /// Close the connection gracefully.
    async fn close(&mut self) -> Result<()>;

    /// Short feed name used in logs.
    fn feed_name(&self) -> &'static str;
}
