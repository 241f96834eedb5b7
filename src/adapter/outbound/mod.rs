//! Outbound adapters (driven side).

pub mod coingecko;
pub mod magiceden;
pub mod notifier;
pub mod store;
