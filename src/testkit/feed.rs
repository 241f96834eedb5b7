//! Mock [`FeedStream`] for testing the watcher loop.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::adapter::outbound::magiceden::message::subscribe_frames;
use crate::error::Result;
use crate::port::{CollectionSubscription, FeedFrame, FeedStream};

/// A feed with scripted connect/subscribe results and a fixed frame queue.
///
/// Each call to `connect()` or `subscribe()` pops the next result from the
/// corresponding queue (defaults to `Ok(())` when exhausted). Frames are
/// consumed in order across reconnections. Once the queue is empty,
/// `next_frame()` signals [`exhausted`](Self::exhausted) and blocks forever,
/// like a quiet connection.
///
/// Everything the watcher writes (subscribe frames, heartbeat replies) is
/// recorded in [`sent`](Self::sent).
pub struct ScriptedFeed {
    connect_results: VecDeque<Result<()>>,
    subscribe_results: VecDeque<Result<()>>,
    frames: VecDeque<Option<FeedFrame>>,
    connect_delay: Duration,
    connect_count: Arc<AtomicU32>,
    subscribe_count: Arc<AtomicU32>,
    close_count: Arc<AtomicU32>,
    sent: Arc<Mutex<Vec<String>>>,
    exhausted: Arc<Notify>,
}

impl ScriptedFeed {
    pub fn new() -> Self {
        Self {
            connect_results: VecDeque::new(),
            subscribe_results: VecDeque::new(),
            frames: VecDeque::new(),
            connect_delay: Duration::ZERO,
            connect_count: Arc::new(AtomicU32::new(0)),
            subscribe_count: Arc::new(AtomicU32::new(0)),
            close_count: Arc::new(AtomicU32::new(0)),
            sent: Arc::new(Mutex::new(Vec::new())),
            exhausted: Arc::new(Notify::new()),
        }
    }

    pub fn with_connect_results(mut self, results: Vec<Result<()>>) -> Self {
        self.connect_results = results.into();
        self
    }

    /// Make every `connect()` take `delay` before answering, like a stalled handshake.
    pub fn with_connect_delay(mut self, delay: Duration) -> Self {
        self.connect_delay = delay;
        self
    }

    pub fn with_subscribe_results(mut self, results: Vec<Result<()>>) -> Self {
        self.subscribe_results = results.into();
        self
    }

    /// `None` entries simulate the stream ending without a close frame.
    pub fn with_frames(mut self, frames: Vec<Option<FeedFrame>>) -> Self {
        self.frames = frames.into();
        self
    }

    /// Append a text frame.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.frames.push_back(Some(FeedFrame::Text(text.into())));
        self
    }

    /// Append a close frame.
    pub fn with_close(mut self, reason: impl Into<String>) -> Self {
        self.frames.push_back(Some(FeedFrame::Closed {
            reason: reason.into(),
        }));
        self
    }

    /// Shared counters for asserting connect/subscribe call counts.
    pub fn counts(&self) -> (Arc<AtomicU32>, Arc<AtomicU32>) {
        (self.connect_count.clone(), self.subscribe_count.clone())
    }

    pub fn close_count(&self) -> Arc<AtomicU32> {
        self.close_count.clone()
    }

    /// Frames written by the client, in order.
    pub fn sent(&self) -> Arc<Mutex<Vec<String>>> {
        self.sent.clone()
    }

    /// Notified once every scripted frame has been consumed.
    ///
    /// Handy as the watcher's shutdown signal:
    /// `watcher.run(async move { exhausted.notified().await })`.
    pub fn exhausted(&self) -> Arc<Notify> {
        self.exhausted.clone()
    }

    fn record_sent(&self, text: String) {
        self.sent.lock().expect("lock sent frames").push(text);
    }
}

impl Default for ScriptedFeed {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeedStream for ScriptedFeed {
    async fn connect(&mut self) -> Result<()> {
        self.connect_count.fetch_add(1, Ordering::SeqCst);
        if !self.connect_delay.is_zero() {
            tokio::time::sleep(self.connect_delay).await;
        }
        self.connect_results.pop_front().unwrap_or(Ok(()))
    }

    async fn subscribe(&mut self, subscription: &CollectionSubscription) -> Result<()> {
        self.subscribe_count.fetch_add(1, Ordering::SeqCst);
        self.subscribe_results.pop_front().unwrap_or(Ok(()))?;
        for frame in subscribe_frames(subscription)? {
            self.record_sent(frame);
        }
        Ok(())
    }

    async fn send_text(&mut self, text: &str) -> Result<()> {
        self.record_sent(text.to_string());
        Ok(())
    }

    async fn next_frame(&mut self) -> Option<FeedFrame> {
        match self.frames.pop_front() {
            Some(frame) => frame,
            None => {
                self.exhausted.notify_one();
                std::future::pending().await
            }
        }
    }

    async fn close(&mut self) -> Result<()> {
        self.close_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn feed_name(&self) -> &'static str {
        "scripted"
    }
}
