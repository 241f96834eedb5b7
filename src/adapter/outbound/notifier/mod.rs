//! Notification adapters.
//!
//! Implements the `port::Notifier` trait for messaging backends. The
//! logging notifier lives next to the port itself.

#[cfg(feature = "telegram")]
pub mod telegram;
