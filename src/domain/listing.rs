//! Normalized marketplace listing.

use rust_decimal::Decimal;

use super::id::InscriptionId;
use super::trait_rule::Traits;

/// A sell order for one collection item, normalized from a feed event.
///
/// Immutable once constructed; the USD price is always derived from the BTC
/// price and the per-event exchange rate.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    name: String,
    price_btc: Decimal,
    price_usd: Decimal,
    btc_usd_rate: Decimal,
    image_url: String,
    detail_url: String,
    external_id: InscriptionId,
    traits: Traits,
}

impl Listing {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        price_btc: Decimal,
        btc_usd_rate: Decimal,
        image_url: impl Into<String>,
        detail_url: impl Into<String>,
        external_id: InscriptionId,
        traits: Traits,
    ) -> Self {
        Self {
            name: name.into(),
            price_btc,
            price_usd: price_btc * btc_usd_rate,
            btc_usd_rate,
            image_url: image_url.into(),
            detail_url: detail_url.into(),
            external_id,
            traits,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn price_btc(&self) -> Decimal {
        self.price_btc
    }

    #[must_use]
    pub fn price_usd(&self) -> Decimal {
        self.price_usd
    }

    #[must_use]
    pub fn btc_usd_rate(&self) -> Decimal {
        self.btc_usd_rate
    }

    /// Preview image URL; empty when the event carried none.
    #[must_use]
    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    #[must_use]
    pub fn detail_url(&self) -> &str {
        &self.detail_url
    }

    #[must_use]
    pub fn external_id(&self) -> &InscriptionId {
        &self.external_id
    }

    #[must_use]
    pub fn traits(&self) -> &Traits {
        &self.traits
    }
}

/// A field the parser had to default while normalizing an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    /// JSON path of the offending field, e.g. `token.meta.name`.
    pub field: &'static str,
    pub reason: String,
}

impl ParseWarning {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Parser output: the listing plus every defaulting decision made.
#[derive(Debug, Clone)]
pub struct ParsedListing {
    pub listing: Listing,
    pub warnings: Vec<ParseWarning>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn usd_price_is_derived_from_rate() {
        let listing = Listing::new(
            "Rock #1",
            dec!(1.5),
            dec!(60000),
            "",
            "https://magiceden.io/ordinals/item-details/deadbeefi2",
            InscriptionId::from_location("deadbeef:2", ""),
            Traits::new(),
        );

        assert_eq!(listing.price_usd(), dec!(90000));
        assert_eq!(listing.external_id().as_str(), "deadbeefi2");
        assert_eq!(listing.image_url(), "");
    }
}
