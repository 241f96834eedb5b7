//! Notifier doubles.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{ChatTarget, Listing};
use crate::error::{Error, Result};
use crate::port::Notifier;

/// One delivered alert.
#[derive(Debug, Clone)]
pub struct RecordedAlert {
    pub chat: ChatTarget,
    pub listing: Listing,
    pub price_text: String,
}

/// Thread-safe alert collector for notification assertions in tests.
///
/// Clones share the same log, so keep one handle and box the other.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    alerts: Arc<Mutex<Vec<RecordedAlert>>>,
    attempts: Arc<AtomicU32>,
    fail: bool,
    delay: Option<Duration>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A notifier whose every delivery fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// A notifier that waits `delay` before recording.
    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    /// Number of delivered alerts.
    pub fn len(&self) -> usize {
        self.alerts.lock().expect("lock notifier alerts").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of delivery attempts, including failed ones.
    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn alerts(&self) -> Vec<RecordedAlert> {
        self.alerts.lock().expect("lock notifier alerts").clone()
    }

    /// Destination chat of every delivered alert, in order.
    pub fn chats(&self) -> Vec<String> {
        self.alerts()
            .iter()
            .map(|alert| alert.chat.as_str().to_string())
            .collect()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, chat: &ChatTarget, listing: &Listing, price_text: &str) -> Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(Error::Notification(format!("delivery to {chat} refused")));
        }

        self.alerts
            .lock()
            .expect("lock notifier alerts")
            .push(RecordedAlert {
                chat: chat.clone(),
                listing: listing.clone(),
                price_text: price_text.to_string(),
            });
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}
