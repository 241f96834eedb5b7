//! Domain identifier types with proper encapsulation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Inscription identifier used as the deduplication key.
///
/// Derived from an on-chain location token of the form `<txid>:<index>`,
/// rewritten to `<txid>i<index>`. The inner String is private so every
/// construction goes through [`InscriptionId::from_location`] or the
/// explicit `new` constructor used when rehydrating persisted state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InscriptionId(String);

impl InscriptionId {
    /// Wrap an already-derived identifier (e.g. one read back from disk).
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derive the identifier from a location token.
    ///
    /// `"abc:3"` becomes `"abci3"`. Without a `:` the genesis transaction
    /// is used with output index zero, so `("", "xyz")` becomes `"xyzi0"`.
    #[must_use]
    pub fn from_location(location: &str, genesis_tx: &str) -> Self {
        match (location.split_once(':'), location.rsplit_once(':')) {
            (Some((txid, _)), Some((_, index))) => Self(format!("{txid}i{index}")),
            _ => Self(format!("{genesis_tx}i0")),
        }
    }

    /// Get the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for InscriptionId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Messaging destination: a numeric chat id or an `@channel` username.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatTarget(String);

impl ChatTarget {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into().trim().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric chat id, when the target is not a username.
    #[must_use]
    pub fn numeric_id(&self) -> Option<i64> {
        self.0.parse().ok()
    }
}

impl fmt::Display for ChatTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ChatTarget {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_with_index_is_rewritten() {
        assert_eq!(InscriptionId::from_location("abc:3", "").as_str(), "abci3");
    }

    #[test]
    fn location_without_colon_falls_back_to_genesis_tx() {
        assert_eq!(InscriptionId::from_location("", "xyz").as_str(), "xyzi0");
        assert_eq!(
            InscriptionId::from_location("no-index", "xyz").as_str(),
            "xyzi0"
        );
    }

    #[test]
    fn location_with_extra_segments_keeps_first_and_last() {
        // "<txid>:<vout>:<offset>" keeps the txid and the trailing segment.
        assert_eq!(
            InscriptionId::from_location("deadbeef:0:7", "").as_str(),
            "deadbeefi7"
        );
    }

    #[test]
    fn derivation_is_deterministic() {
        let a = InscriptionId::from_location("deadbeef:2", "ignored");
        let b = InscriptionId::from_location("deadbeef:2", "other");
        assert_eq!(a, b);
    }

    #[test]
    fn chat_target_numeric_and_username() {
        assert_eq!(ChatTarget::new("-1001234").numeric_id(), Some(-1_001_234));
        assert_eq!(ChatTarget::new("@stones_alerts").numeric_id(), None);
        assert_eq!(ChatTarget::new("  42 ").as_str(), "42");
    }
}
