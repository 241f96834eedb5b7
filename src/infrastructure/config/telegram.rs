//! Telegram notification configuration.
//!
//! The bot token is never read from the config file; it comes from the
//! `TELEGRAM_BOT_TOKEN` environment variable only.

use std::time::Duration;

use serde::Deserialize;

use crate::domain::ChatTarget;

/// Telegram routing and delivery settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TelegramAppConfig {
    /// Chat receiving every listing (numeric id or `@channel`).
    #[serde(default)]
    pub general_chat_id: Option<ChatTarget>,
    /// Chat receiving listings that match the trait rule.
    #[serde(default)]
    pub trait_chat_id: Option<ChatTarget>,
    /// Label of the inline link button.
    #[serde(default = "default_button_label")]
    pub button_label: String,
    /// Per-message delivery timeout in seconds (default: 15).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_button_label() -> String {
    "Buy".into()
}

const fn default_timeout_secs() -> u64 {
    15
}

impl Default for TelegramAppConfig {
    fn default() -> Self {
        Self {
            general_chat_id: None,
            trait_chat_id: None,
            button_label: default_button_label(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl TelegramAppConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
