//! Exchange-agnostic domain types: listings, identifiers, trait rules, prices.

pub mod id;
pub mod listing;
pub mod money;
pub mod price;
pub mod trait_rule;

pub use id::{ChatTarget, InscriptionId};
pub use listing::{Listing, ParseWarning, ParsedListing};
pub use price::{PriceQuote, PriceSnapshot};
pub use trait_rule::{TraitRule, Traits};
