//! Telegram listing alerts.
//!
//! Sends each listing as a photo with an HTML caption and a single inline
//! button linking to the item page.

mod format;

pub mod notifier;

pub use format::format_caption;
pub use notifier::{TelegramConfig, TelegramNotifier};
