//! Application services (use cases).
//!
//! - [`parser`] normalizes raw feed events into listings
//! - [`price_cache`] keeps the collection price enrichment fresh
//! - [`dispatcher`] decides, notifies and records each listing

pub mod dispatcher;
pub mod parser;
pub mod price_cache;

pub use dispatcher::{Delivery, DispatchOutcome, Dispatcher, Routes};
pub use parser::{is_listing_event, ListingParser};
pub use price_cache::PriceCache;
