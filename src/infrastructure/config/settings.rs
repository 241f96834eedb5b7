//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is read from an optional TOML file, then overridden by
//! environment variables (a `.env` file is honoured by the binary), then by
//! command-line flags, and finally validated.
//!
//! # Example
//!
//! ```no_run
//! use ordwatch::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("ordwatch.toml")?;
//!     config.validate()?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;

use super::feed::FeedConfig;
use super::logging::LoggingConfig;
use super::price::PriceConfig;
use super::reconnection::ReconnectionConfig;
use super::state::StateConfig;
use super::telegram::TelegramAppConfig;
use crate::domain::ChatTarget;
use crate::error::{ConfigError, Result};

pub const ENV_WS_URL: &str = "ME_WS_URL";
pub const ENV_COLLECTION_SYMBOL: &str = "COLLECTION_SYMBOL";
pub const ENV_BOT_TOKEN: &str = "TELEGRAM_BOT_TOKEN";
pub const ENV_GENERAL_CHAT_ID: &str = "TELEGRAM_GENERAL_CHAT_ID";
pub const ENV_TRAIT_CHAT_ID: &str = "TELEGRAM_TRAIT_CHAT_ID";
pub const ENV_RECONNECT_DELAY: &str = "RECONNECT_DELAY";
pub const ENV_SEEN_FILE: &str = "SEEN_FILE";
pub const ENV_TRAITS_FILTER_FILE: &str = "TRAITS_FILTER_FILE";
pub const ENV_COINGECKO_NFT_ID: &str = "COINGECKO_NFT_ID";
pub const ENV_PRICE_CACHE_SECONDS: &str = "PRICE_CACHE_SECONDS";
pub const ENV_MIN_PRICE_BTC: &str = "MIN_PRICE_BTC";
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";

/// Listing filter settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FilterConfig {
    /// Listings cheaper than this (BTC) are recorded but not announced.
    /// Zero disables the filter.
    #[serde(default)]
    pub min_price_btc: Decimal,
}

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub feed: FeedConfig,

    #[serde(default)]
    pub telegram: TelegramAppConfig,

    /// WebSocket reconnection settings.
    #[serde(default)]
    pub reconnection: ReconnectionConfig,

    #[serde(default)]
    pub state: StateConfig,

    #[serde(default)]
    pub price: PriceConfig,

    #[serde(default)]
    pub filter: FilterConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Log alerts instead of sending them. No credentials are required.
    #[serde(default)]
    pub dry_run: bool,

    /// Telegram bot token, from `TELEGRAM_BOT_TOKEN` only.
    #[serde(skip)]
    pub bot_token: Option<String>,
}

impl Config {
    /// Parse configuration from TOML content. No overrides, no validation.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e).into())
    }

    /// Load the TOML file at `path` and apply environment overrides.
    ///
    /// A missing file yields the defaults. The result is not validated;
    /// call [`Config::validate`] once all overrides are applied.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file exists but cannot be read
    /// - The TOML content is malformed
    /// - An environment variable holds an unparseable value
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = match fs::read_to_string(path) {
            Ok(content) => Self::parse_toml(&content)?,
            Err(e) if e.kind() == ErrorKind::NotFound => Self::default(),
            Err(e) => return Err(ConfigError::ReadFile(e).into()),
        };
        config.apply_env()?;
        Ok(config)
    }

    /// Apply overrides from the process environment.
    #[allow(clippy::result_large_err)]
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`. Empty values count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the variable if a numeric
    /// override cannot be parsed.
    #[allow(clippy::result_large_err)]
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(url) = get(ENV_WS_URL) {
            self.feed.ws_url = url;
        }
        if let Some(symbol) = get(ENV_COLLECTION_SYMBOL) {
            self.feed.collection_symbol = symbol;
        }
        if let Some(token) = get(ENV_BOT_TOKEN) {
            self.bot_token = Some(token);
        }
        if let Some(chat) = get(ENV_GENERAL_CHAT_ID) {
            self.telegram.general_chat_id = Some(ChatTarget::new(chat));
        }
        if let Some(chat) = get(ENV_TRAIT_CHAT_ID) {
            self.telegram.trait_chat_id = Some(ChatTarget::new(chat));
        }
        if let Some(delay) = get(ENV_RECONNECT_DELAY) {
            self.reconnection.delay_secs = parse_env(ENV_RECONNECT_DELAY, &delay)?;
        }
        if let Some(path) = get(ENV_SEEN_FILE) {
            self.state.seen_file = path.into();
        }
        if let Some(path) = get(ENV_TRAITS_FILTER_FILE) {
            self.state.traits_filter_file = path.into();
        }
        if let Some(id) = get(ENV_COINGECKO_NFT_ID) {
            self.price.nft_id = id;
        }
        if let Some(secs) = get(ENV_PRICE_CACHE_SECONDS) {
            self.price.cache_secs = parse_env(ENV_PRICE_CACHE_SECONDS, &secs)?;
        }
        if let Some(min) = get(ENV_MIN_PRICE_BTC) {
            self.filter.min_price_btc = parse_env(ENV_MIN_PRICE_BTC, &min)?;
        }
        if let Some(level) = get(ENV_LOG_LEVEL) {
            self.logging.level = level;
        }

        Ok(())
    }

    /// Validate configuration values.
    ///
    /// Outside dry-run mode every missing credential is reported at once.
    #[allow(clippy::result_large_err)]
    pub fn validate(&self) -> Result<()> {
        if self.feed.ws_url.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "feed.ws_url",
            }
            .into());
        }
        match url::Url::parse(&self.feed.ws_url) {
            Ok(url) if matches!(url.scheme(), "ws" | "wss") => {}
            Ok(url) => {
                return Err(ConfigError::InvalidValue {
                    field: "feed.ws_url",
                    reason: format!("unsupported scheme '{}'", url.scheme()),
                }
                .into());
            }
            Err(e) => {
                return Err(ConfigError::InvalidValue {
                    field: "feed.ws_url",
                    reason: e.to_string(),
                }
                .into());
            }
        }
        if self.feed.collection_symbol.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "feed.collection_symbol",
            }
            .into());
        }
        if self.feed.chain.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "feed.chain",
            }
            .into());
        }

        if self.reconnection.delay_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "reconnection.delay_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.reconnection.connect_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "reconnection.connect_timeout_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.reconnection.idle_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "reconnection.idle_timeout_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if !self.reconnection.backoff_multiplier.is_finite()
            || self.reconnection.backoff_multiplier < 1.0
        {
            return Err(ConfigError::InvalidValue {
                field: "reconnection.backoff_multiplier",
                reason: "must be >= 1.0".to_string(),
            }
            .into());
        }

        if self.price.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "price.timeout_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.telegram.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "telegram.timeout_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.filter.min_price_btc < Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "filter.min_price_btc",
                reason: "must be 0 or greater".to_string(),
            }
            .into());
        }

        if !self.dry_run {
            let mut missing = Vec::new();
            if self.bot_token.as_deref().map_or(true, str::is_empty) {
                missing.push(ENV_BOT_TOKEN);
            }
            if !has_chat(self.telegram.general_chat_id.as_ref()) {
                missing.push(ENV_GENERAL_CHAT_ID);
            }
            if !missing.is_empty() {
                return Err(ConfigError::MissingCredentials { vars: missing }.into());
            }
        }

        Ok(())
    }

    /// Minimum price filter, if enabled.
    #[must_use]
    pub fn min_price_btc(&self) -> Option<Decimal> {
        Some(self.filter.min_price_btc).filter(|min| *min > Decimal::ZERO)
    }

    /// Trait channel, if configured and non-empty.
    #[must_use]
    pub fn trait_chat(&self) -> Option<&ChatTarget> {
        self.telegram
            .trait_chat_id
            .as_ref()
            .filter(|chat| has_chat(Some(chat)))
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

fn has_chat(chat: Option<&ChatTarget>) -> bool {
    chat.is_some_and(|chat| !chat.as_str().is_empty())
}

#[allow(clippy::result_large_err)]
fn parse_env<T>(field: &'static str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| {
        ConfigError::InvalidValue {
            field,
            reason: format!("'{value}': {e}"),
        }
        .into()
    })
}
