//! Feed reconnection configuration.

use std::time::Duration;

use serde::Deserialize;

/// Delay policy between feed reconnection attempts.
///
/// The default is a fixed delay. A multiplier above 1.0 turns it into an
/// exponential backoff capped at `max_delay_secs`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReconnectionConfig {
    /// Delay before the first reconnection attempt (seconds).
    #[serde(default = "default_delay_secs")]
    pub delay_secs: u64,
    /// Multiplier applied to the delay after each failed session.
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
    /// Upper bound of the delay (seconds).
    #[serde(default = "default_max_delay_secs")]
    pub max_delay_secs: u64,
    /// Deadline for opening the socket and sending the subscribe frames (seconds).
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// A subscribed connection silent for this long is treated as dead (seconds).
    ///
    /// The server sends a text heartbeat well within this window.
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,
}

fn default_delay_secs() -> u64 {
    10
}

fn default_backoff_multiplier() -> f64 {
    1.0
}

fn default_max_delay_secs() -> u64 {
    300 // 5 minutes
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_idle_timeout_secs() -> u64 {
    60
}

impl Default for ReconnectionConfig {
    fn default() -> Self {
        Self {
            delay_secs: default_delay_secs(),
            backoff_multiplier: default_backoff_multiplier(),
            max_delay_secs: default_max_delay_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            idle_timeout_secs: default_idle_timeout_secs(),
        }
    }
}

impl ReconnectionConfig {
    #[must_use]
    pub fn initial_delay(&self) -> Duration {
        Duration::from_secs(self.delay_secs)
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    #[must_use]
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    /// Cap on the delay; never below the initial delay.
    #[must_use]
    pub fn max_delay(&self) -> Duration {
        Duration::from_secs(self.max_delay_secs.max(self.delay_secs))
    }
}
