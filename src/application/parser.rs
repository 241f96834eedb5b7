//! Listing parser.
//!
//! Normalizes a decoded Magic Eden activity event into a [`Listing`]. The
//! parser never fails: every missing or malformed field falls back to a
//! default and is reported as a [`ParseWarning`] for the caller to log.
//!
//! Relevant event shape:
//!
//! ```json
//! {
//!   "kind": "list",
//!   "listedPrice": 150000000,
//!   "btcUsdPrice": 60000,
//!   "token": {
//!     "location": "<txid>:<vout>:<offset>",
//!     "genesisTransaction": "<txid>",
//!     "meta": {
//!       "name": "Rock #1",
//!       "collection_page_img_url": "https://...",
//!       "image": "https://...",
//!       "attributes": [{"trait_type": "Rarity Tier", "value": "V"}]
//!     }
//!   }
//! }
//! ```

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::{Number, Value};

use crate::domain::money::sats_to_btc;
use crate::domain::trait_rule::value_to_string;
use crate::domain::{InscriptionId, Listing, ParseWarning, ParsedListing, Traits};

/// Event discriminator value of new listings.
pub const LISTING_KIND: &str = "list";

/// Name used when the event carries none.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Default item page prefix; the inscription id is appended.
pub const DEFAULT_ITEM_URL_BASE: &str = "https://magiceden.io/ordinals/item-details/";

/// True if the event is a new listing (`"kind": "list"`).
#[must_use]
pub fn is_listing_event(event: &Value) -> bool {
    event.get("kind").and_then(Value::as_str) == Some(LISTING_KIND)
}

/// Converts raw listing events into [`Listing`] records.
#[derive(Debug, Clone)]
pub struct ListingParser {
    item_url_base: String,
}

impl Default for ListingParser {
    fn default() -> Self {
        Self::new(DEFAULT_ITEM_URL_BASE)
    }
}

impl ListingParser {
    pub fn new(item_url_base: impl Into<String>) -> Self {
        Self {
            item_url_base: item_url_base.into(),
        }
    }

    /// Parse a listing event. Never fails; see the module docs.
    #[must_use]
    pub fn parse(&self, event: &Value) -> ParsedListing {
        let mut warnings = Vec::new();

        let token = event.get("token").unwrap_or(&Value::Null);
        if !token.is_object() {
            warnings.push(ParseWarning::new("token", "missing or not an object"));
        }
        let meta = token.get("meta").unwrap_or(&Value::Null);

        // A blank name renders as an empty caption title, so it is treated
        // the same as a missing one.
        let name = match non_empty_str(meta.get("name")) {
            Some(name) => name.to_string(),
            None => {
                warnings.push(ParseWarning::new("token.meta.name", "missing name"));
                UNKNOWN_NAME.to_string()
            }
        };

        let sats = decimal_field(event.get("listedPrice"), "listedPrice", &mut warnings).trunc();
        let rate = decimal_field(event.get("btcUsdPrice"), "btcUsdPrice", &mut warnings);

        let image_url = non_empty_str(meta.get("collection_page_img_url"))
            .or_else(|| non_empty_str(meta.get("image")))
            .unwrap_or_default();

        let location = non_empty_str(token.get("location")).unwrap_or_default();
        let genesis_tx = non_empty_str(token.get("genesisTransaction")).unwrap_or_default();
        if !location.contains(':') {
            warnings.push(ParseWarning::new(
                "token.location",
                "no output index, falling back to genesis transaction",
            ));
            if genesis_tx.is_empty() {
                warnings.push(ParseWarning::new(
                    "token.genesisTransaction",
                    "missing, identifier is degenerate",
                ));
            }
        }
        let external_id = InscriptionId::from_location(location, genesis_tx);
        let detail_url = format!("{}{}", self.item_url_base, external_id);

        let traits = parse_traits(meta.get("attributes"), &mut warnings);

        ParsedListing {
            listing: Listing::new(
                name,
                sats_to_btc(sats),
                rate,
                image_url,
                detail_url,
                external_id,
                traits,
            ),
            warnings,
        }
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Read a number or numeric string, defaulting to zero.
fn decimal_field(
    value: Option<&Value>,
    field: &'static str,
    warnings: &mut Vec<ParseWarning>,
) -> Decimal {
    let parsed = match value {
        None | Some(Value::Null) => {
            warnings.push(ParseWarning::new(field, "missing"));
            return Decimal::ZERO;
        }
        Some(Value::Number(n)) => number_to_decimal(n),
        Some(Value::String(s)) => Decimal::from_str(s.trim()).ok(),
        Some(_) => None,
    };

    parsed.unwrap_or_else(|| {
        warnings.push(ParseWarning::new(field, "not a number"));
        Decimal::ZERO
    })
}

fn number_to_decimal(n: &Number) -> Option<Decimal> {
    if let Some(i) = n.as_i64() {
        Some(Decimal::from(i))
    } else if let Some(u) = n.as_u64() {
        Some(Decimal::from(u))
    } else {
        n.as_f64().and_then(|f| Decimal::try_from(f).ok())
    }
}

/// Flatten `[{trait_type, value}]` into a map. Later duplicates win.
fn parse_traits(attributes: Option<&Value>, warnings: &mut Vec<ParseWarning>) -> Traits {
    let mut traits = Traits::new();

    let items = match attributes {
        None | Some(Value::Null) => return traits,
        Some(Value::Array(items)) => items,
        Some(_) => {
            warnings.push(ParseWarning::new("token.meta.attributes", "not a list"));
            return traits;
        }
    };

    for item in items {
        let Some(attribute) = item.as_object() else {
            warnings.push(ParseWarning::new(
                "token.meta.attributes",
                "entry is not an object",
            ));
            continue;
        };

        let trait_type = match attribute.get("trait_type") {
            Some(Value::String(s)) if !s.is_empty() => s,
            None | Some(Value::Null) | Some(Value::String(_)) => continue,
            Some(_) => {
                warnings.push(ParseWarning::new(
                    "token.meta.attributes",
                    "trait_type is not a string",
                ));
                continue;
            }
        };

        match attribute.get("value") {
            None | Some(Value::Null) => continue,
            Some(value) => {
                traits.insert(trait_type.clone(), value_to_string(value));
            }
        }
    }

    traits
}
