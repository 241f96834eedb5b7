//! Logging configuration and initialization.

use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};

/// Logging configuration.
///
/// `RUST_LOG`, when set, takes precedence over `level`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`. Anything else falls back to `pretty`.
    pub format: String,
}

impl LoggingConfig {
    /// Install the global tracing subscriber.
    ///
    /// A second call is a no-op, the first subscriber stays in place.
    pub fn init(&self) {
        let filter = self.filter();
        let installed = if self.is_json() {
            fmt()
                .json()
                .with_current_span(false)
                .with_env_filter(filter)
                .try_init()
        } else {
            fmt().with_env_filter(filter).try_init()
        };

        if installed.is_ok() && !self.is_json() && !self.format.eq_ignore_ascii_case("pretty") {
            tracing::warn!(format = %self.format, "Unknown log format, using pretty");
        }
    }

    /// `RUST_LOG` if set and valid, the configured level otherwise.
    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    }

    #[must_use]
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}
