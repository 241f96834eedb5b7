//! Trait-based routing rule.
//!
//! A rule maps a trait type to the set of values that qualify a listing for
//! the secondary notification channel. Entries are OR-combined: one matching
//! entry is enough.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

/// Flat trait mapping of a listing (trait type to value).
pub type Traits = BTreeMap<String, String>;

/// OR-combined allow-list over listing trait values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraitRule {
    allowed: BTreeMap<String, BTreeSet<String>>,
}

impl TraitRule {
    /// A rule that never matches.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a rule from `(trait_type, allowed values)` pairs.
    pub fn from_entries<I, K, V, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let allowed = entries
            .into_iter()
            .map(|(k, values)| (k.into(), values.into_iter().map(Into::into).collect()))
            .collect();
        Self { allowed }
    }

    /// Build a rule from a JSON document `{trait_type: [values...]}`.
    ///
    /// A scalar value is treated as a one-element list. Values that are not
    /// strings are stringified. Returns `None` if the document is not an
    /// object.
    #[must_use]
    pub fn from_json(document: &Value) -> Option<Self> {
        let object = document.as_object()?;
        let entries = object.iter().map(|(trait_type, values)| {
            let values: Vec<String> = match values {
                Value::Array(items) => items.iter().map(value_to_string).collect(),
                other => vec![value_to_string(other)],
            };
            (trait_type.clone(), values)
        });
        Some(Self::from_entries(entries))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }

    /// Number of trait types the rule inspects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.allowed.len()
    }

    /// True if any rule entry matches the listing's traits.
    ///
    /// Trait types the listing does not carry are skipped, not counted as
    /// a mismatch. An empty rule never matches.
    #[must_use]
    pub fn matches(&self, traits: &Traits) -> bool {
        self.allowed.iter().any(|(trait_type, allowed)| {
            traits
                .get(trait_type)
                .is_some_and(|value| allowed.contains(value))
        })
    }
}

/// Render a JSON scalar the way it is compared against rule values.
pub(crate) fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
