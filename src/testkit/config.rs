//! Canonical test configurations.

use std::path::Path;

use crate::infrastructure::config::reconnection::ReconnectionConfig;
use crate::infrastructure::config::settings::Config;

/// Reconnection config with zero delays, so no waiting in tests.
pub fn reconnection() -> ReconnectionConfig {
    ReconnectionConfig {
        delay_secs: 0,
        backoff_multiplier: 1.0,
        max_delay_secs: 0,
        ..ReconnectionConfig::default()
    }
}

/// A dry-run config whose state files live under `dir`.
pub fn dry_run(dir: &Path) -> Config {
    let mut config = Config {
        dry_run: true,
        ..Config::default()
    };
    config.state.seen_file = dir.join("seen_listings.txt");
    config.state.traits_filter_file = dir.join("traits_filter.json");
    config
}
