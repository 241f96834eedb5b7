//! Marketplace feed configuration.

use serde::Deserialize;

use crate::application::parser::DEFAULT_ITEM_URL_BASE;
use crate::port::CollectionSubscription;

/// Magic Eden websocket feed settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeedConfig {
    /// Websocket endpoint.
    #[serde(default = "default_ws_url")]
    pub ws_url: String,
    /// Collection to watch.
    #[serde(default = "default_collection_symbol")]
    pub collection_symbol: String,
    #[serde(default = "default_chain")]
    pub chain: String,
    /// Item page prefix used for the buy button.
    #[serde(default = "default_item_url_base")]
    pub item_url_base: String,
}

fn default_ws_url() -> String {
    "wss://wss-mainnet.magiceden.io/".into()
}

fn default_collection_symbol() -> String {
    "stones".into()
}

fn default_chain() -> String {
    "bitcoin".into()
}

fn default_item_url_base() -> String {
    DEFAULT_ITEM_URL_BASE.into()
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            ws_url: default_ws_url(),
            collection_symbol: default_collection_symbol(),
            chain: default_chain(),
            item_url_base: default_item_url_base(),
        }
    }
}

impl FeedConfig {
    #[must_use]
    pub fn subscription(&self) -> CollectionSubscription {
        CollectionSubscription::new(&self.chain, &self.collection_symbol)
    }
}
