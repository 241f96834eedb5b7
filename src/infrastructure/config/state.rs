//! Local state files.

use std::path::PathBuf;

use serde::Deserialize;

/// Paths of the seen-id log and the trait rule document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StateConfig {
    #[serde(default = "default_seen_file")]
    pub seen_file: PathBuf,
    #[serde(default = "default_traits_filter_file")]
    pub traits_filter_file: PathBuf,
}

fn default_seen_file() -> PathBuf {
    PathBuf::from("seen_listings.txt")
}

fn default_traits_filter_file() -> PathBuf {
    PathBuf::from("traits_filter.json")
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            seen_file: default_seen_file(),
            traits_filter_file: default_traits_filter_file(),
        }
    }
}
