//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports define the extension points of the watcher. They are traits that
//! adapters implement to integrate with external systems (the marketplace
//! feed, the price API, the messaging service and the seen-id log).
//!
//! # Architecture
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!                    │ (watcher + dispatcher)  │
//!     ┌──────────────┤   Domain + Port         ├──────────────┐
//!     │              └─────────────────────────┘              │
//!     │                 │                 │                   │
//!     ▼                 ▼                 ▼                   ▼
//! ┌─────────┐     ┌───────────┐     ┌───────────┐      ┌───────────┐
//! │  Feed   │     │   Price   │     │   Seen    │      │ Notifier  │
//! │ Adapter │     │  Adapter  │     │   Store   │      │  Adapter  │
//! └─────────┘     └───────────┘     └───────────┘      └───────────┘
//! ```
//!
//! # Available Ports
//!
//! - [`FeedStream`] - Long-lived marketplace subscription
//! - [`Notifier`] - Listing alerts (Telegram, logging)
//! - [`PriceSource`] - Collection floor price and volume lookup
//! - [`SeenStore`] - Persistent set of already-handled listings

pub mod outbound;

pub use outbound::feed::{CollectionSubscription, FeedFrame, FeedStream};
pub use outbound::notifier::{LogNotifier, Notifier};
pub use outbound::price::PriceSource;
pub use outbound::store::SeenStore;
