//! Collection price lookup configuration.

use std::time::Duration;

use serde::Deserialize;

use crate::adapter::outbound::coingecko::DEFAULT_API_BASE;

/// CoinGecko floor price settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PriceConfig {
    /// CoinGecko NFT collection id.
    #[serde(default = "default_nft_id")]
    pub nft_id: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// How long a fetched price is reused (seconds).
    #[serde(default = "default_cache_secs")]
    pub cache_secs: u64,
    /// Request timeout (seconds).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_nft_id() -> String {
    "stones".into()
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.into()
}

const fn default_cache_secs() -> u64 {
    60
}

const fn default_timeout_secs() -> u64 {
    10
}

impl Default for PriceConfig {
    fn default() -> Self {
        Self {
            nft_id: default_nft_id(),
            api_base: default_api_base(),
            cache_secs: default_cache_secs(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl PriceConfig {
    #[must_use]
    pub fn cache_window(&self) -> Duration {
        Duration::from_secs(self.cache_secs)
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
