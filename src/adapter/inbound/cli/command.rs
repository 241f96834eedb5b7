//! Command-line interface definitions.

use clap::Parser;
use std::path::PathBuf;

use crate::infrastructure::config::settings::Config;

/// Default configuration file, resolved relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "ordwatch.toml";

/// Watch a Magic Eden ordinals collection and relay new listings to Telegram
#[derive(Parser, Debug)]
#[command(name = "ordwatch")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file (optional; defaults apply if absent).
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Log alerts instead of sending them; no Telegram credentials needed.
    #[arg(long)]
    pub dry_run: bool,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Use JSON log format instead of pretty-printed logs.
    #[arg(long)]
    pub json_logs: bool,
}

impl Cli {
    /// Apply flag overrides on top of file and environment settings.
    pub fn apply(&self, config: &mut Config) {
        if self.dry_run {
            config.dry_run = true;
        }
        if let Some(level) = &self.log_level {
            config.logging.level.clone_from(level);
        }
        if self.json_logs {
            config.logging.format = "json".into();
        }
    }
}
