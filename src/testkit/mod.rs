//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`feed`] - Scripted [`FeedStream`](crate::port::FeedStream) with call counters.
//! - [`notifier`] - Recording, failing and slow notifiers.
//! - [`price`] - Scripted price source.
//! - [`store`] - In-memory seen store with shared handles.
//! - [`domain`] - Builders for raw listing events.
//! - [`config`] - Canonical test configurations.

pub mod config;
pub mod domain;
pub mod feed;
pub mod notifier;
pub mod price;
pub mod store;
