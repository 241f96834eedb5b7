//! Builders for raw feed events used across tests.
//!
//! Events are plain [`serde_json::Value`]s shaped like Magic Eden activity
//! messages so tests exercise the real parser.

use serde_json::{json, Value};

/// Exchange rate carried by every built event.
pub const BTC_USD: u64 = 60_000;

/// A `list` event for `Rock #1` with `Rarity Tier = V`.
pub fn listing_event(location: &str, listed_price_sats: u64) -> Value {
    listing_event_with_traits(location, listed_price_sats, &[("Rarity Tier", "V")])
}

/// A `list` event with the given attributes.
pub fn listing_event_with_traits(
    location: &str,
    listed_price_sats: u64,
    traits: &[(&str, &str)],
) -> Value {
    let attributes: Vec<Value> = traits
        .iter()
        .map(|(trait_type, value)| json!({"trait_type": trait_type, "value": value}))
        .collect();

    json!({
        "kind": "list",
        "listedPrice": listed_price_sats,
        "btcUsdPrice": BTC_USD,
        "token": {
            "location": location,
            "meta": {
                "name": "Rock #1",
                "attributes": attributes
            }
        }
    })
}

/// The canonical example: 1.5 BTC at $60,000, id `deadbeefi2`.
pub fn sample_event() -> Value {
    listing_event("deadbeef:2", 150_000_000)
}

/// A non-listing activity event.
pub fn sale_event(location: &str) -> Value {
    json!({
        "kind": "buying_broadcasted",
        "listedPrice": 1000,
        "token": {"location": location}
    })
}
