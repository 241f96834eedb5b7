//! Trait rule document loader.
//!
//! The document is a JSON object mapping a trait type to its allowed values:
//!
//! ```json
//! {"Rarity Tier": ["V", "IV"], "Background": "Gold"}
//! ```
//!
//! Loading never fails. An absent file disables trait routing; an unreadable
//! or malformed one is reported and also disables it.

use std::io::ErrorKind;
use std::path::Path;

use serde_json::Value;
use tokio::fs;
use tracing::{info, warn};

use crate::domain::TraitRule;

/// Load the trait rule at `path`, falling back to an empty rule.
pub async fn load_trait_rule(path: &Path) -> TraitRule {
    let content = match fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!(path = %path.display(), "No trait filter file, trait routing disabled");
            return TraitRule::empty();
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Cannot read trait filter file");
            return TraitRule::empty();
        }
    };

    let document: Value = match serde_json::from_str(&content) {
        Ok(document) => document,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Invalid trait filter JSON");
            return TraitRule::empty();
        }
    };

    match TraitRule::from_json(&document) {
        Some(rule) => {
            info!(path = %path.display(), trait_types = rule.len(), "Loaded trait filter");
            rule
        }
        None => {
            warn!(path = %path.display(), "Trait filter must be a JSON object");
            TraitRule::empty()
        }
    }
}
