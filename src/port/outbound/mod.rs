//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the watcher's infrastructure dependencies: the
//! marketplace feed, the price API, seen-id persistence and notifications.

pub mod feed;
pub mod notifier;
pub mod price;
pub mod store;
