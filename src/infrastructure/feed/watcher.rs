//! Reconnecting feed watcher.
//!
//! Drives a [`FeedStream`] through its connection lifecycle and hands every
//! decoded event to the [`Dispatcher`]:
//!
//! ```text
//! Disconnected -> Connecting -> Subscribed -> (error) -> Disconnected -> ...
//!                                     \-> (shutdown) -> Draining -> Disconnected
//! ```
//!
//! Connection failures are retried forever after a delay. A connect that
//! hangs, or a subscribed connection that goes quiet for longer than the
//! idle timeout, counts as a failure too. Only the shutdown signal or a
//! non-recoverable error ends the loop.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde_json::Value;
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, warn};

use crate::application::dispatcher::Dispatcher;
use crate::error::{Error, Result};
use crate::infrastructure::config::reconnection::ReconnectionConfig;
use crate::port::{CollectionSubscription, FeedFrame, FeedStream};

/// Application-level heartbeat sent by the server.
pub const HEARTBEAT_PING: &str = "ping";
/// Reply to [`HEARTBEAT_PING`].
pub const HEARTBEAT_PONG: &str = "pong";

/// Lifecycle state of the feed connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Subscribed,
    Draining,
}

/// How a session ended without an error.
enum SessionEnd {
    Shutdown,
}

/// Owns the feed connection and the dispatcher for the process lifetime.
pub struct FeedWatcher<S: FeedStream> {
    feed: S,
    subscription: CollectionSubscription,
    dispatcher: Dispatcher,
    config: ReconnectionConfig,
    current_delay: Duration,
    connect_timeout: Duration,
    idle_timeout: Duration,
    state: ConnectionState,
}

impl<S: FeedStream> FeedWatcher<S> {
    pub fn new(
        feed: S,
        subscription: CollectionSubscription,
        dispatcher: Dispatcher,
        config: ReconnectionConfig,
    ) -> Self {
        let current_delay = config.initial_delay();
        let connect_timeout = config.connect_timeout();
        let idle_timeout = config.idle_timeout();
        Self {
            feed,
            subscription,
            dispatcher,
            config,
            current_delay,
            connect_timeout,
            idle_timeout,
            state: ConnectionState::Disconnected,
        }
    }

    /// Override the connect and subscribe deadline.
    #[must_use]
    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    /// Override how long a subscribed connection may stay silent.
    #[must_use]
    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Run until `shutdown` resolves or a non-recoverable error occurs.
    ///
    /// Shutdown interrupts a pending connect, receive or reconnect delay. An
    /// event already being dispatched is finished first.
    ///
    /// # Errors
    ///
    /// Returns only errors for which [`Error::is_recoverable`] is false.
    pub async fn run<F>(&mut self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        info!(
            feed = self.feed.feed_name(),
            collection = %self.subscription.collection_symbol,
            seen = self.dispatcher.seen_count(),
            "Feed watcher starting"
        );

        loop {
            let error = match self.run_session(&mut shutdown).await {
                Ok(SessionEnd::Shutdown) => break,
                Err(e) => e,
            };

            self.state = ConnectionState::Disconnected;
            if !error.is_recoverable() {
                error!(error = %error, "Feed watcher stopped on fatal error");
                return Err(error);
            }

            let delay = self.next_delay();
            warn!(
                error = %error,
                delay_secs = delay.as_secs_f64(),
                "Feed connection lost, reconnecting after delay"
            );

            tokio::select! {
                () = shutdown.as_mut() => break,
                () = sleep(delay) => {}
            }
        }

        self.drain().await;
        Ok(())
    }

    async fn run_session<F>(&mut self, shutdown: &mut Pin<&mut F>) -> Result<SessionEnd>
    where
        F: Future<Output = ()>,
    {
        self.state = ConnectionState::Connecting;
        debug!(feed = self.feed.feed_name(), "Connecting");

        let connect_timeout = self.connect_timeout;
        tokio::select! {
            () = shutdown.as_mut() => return Ok(SessionEnd::Shutdown),
            result = timeout(connect_timeout, self.feed.connect()) => {
                result.map_err(|_| Error::Timeout {
                    operation: "feed connect",
                    after: connect_timeout,
                })??;
            }
        }

        timeout(connect_timeout, self.feed.subscribe(&self.subscription))
            .await
            .map_err(|_| Error::Timeout {
                operation: "feed subscribe",
                after: connect_timeout,
            })??;
        self.state = ConnectionState::Subscribed;
        self.reset_backoff();
        info!(
            chain = %self.subscription.chain,
            collection = %self.subscription.collection_symbol,
            "Subscribed to collection activity"
        );

        let idle_timeout = self.idle_timeout;
        loop {
            let frame = tokio::select! {
                () = shutdown.as_mut() => return Ok(SessionEnd::Shutdown),
                frame = timeout(idle_timeout, self.feed.next_frame()) => {
                    frame.map_err(|_| Error::Timeout {
                        operation: "feed receive",
                        after: idle_timeout,
                    })?
                }
            };

            match frame {
                Some(FeedFrame::Text(text)) => self.handle_text(&text).await?,
                Some(FeedFrame::Closed { reason }) => return Err(Error::Connection(reason)),
                None => return Err(Error::Connection("feed stream ended".into())),
            }
        }
    }

    async fn handle_text(&mut self, text: &str) -> Result<()> {
        if text == HEARTBEAT_PING {
            debug!("Heartbeat received");
            return self.feed.send_text(HEARTBEAT_PONG).await;
        }

        match serde_json::from_str::<Value>(text) {
            Ok(event) => {
                let outcome = self.dispatcher.handle(&event).await;
                debug!(?outcome, "Event dispatched");
            }
            Err(e) => {
                warn!(error = %e, len = text.len(), "Dropping undecodable frame");
            }
        }
        Ok(())
    }

    async fn drain(&mut self) {
        self.state = ConnectionState::Draining;
        info!("Shutdown requested, closing feed");
        if let Err(e) = self.feed.close().await {
            debug!(error = %e, "Feed close failed");
        }
        self.state = ConnectionState::Disconnected;
        info!("Feed watcher stopped");
    }

    /// Return the current delay and advance it for the next failure.
    fn next_delay(&mut self) -> Duration {
        let delay = self.current_delay;
        let multiplier = self.config.backoff_multiplier.max(1.0);
        let max = self.config.max_delay();
        self.current_delay = Duration::try_from_secs_f64(delay.as_secs_f64() * multiplier)
            .unwrap_or(max)
            .min(max);
        delay
    }

    fn reset_backoff(&mut self) {
        self.current_delay = self.config.initial_delay();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::Ordering;

    use crate::application::dispatcher::Routes;
    use crate::application::parser::ListingParser;
    use crate::application::price_cache::PriceCache;
    use crate::domain::ChatTarget;
    use crate::testkit;
    use crate::testkit::feed::ScriptedFeed;
    use crate::testkit::notifier::RecordingNotifier;
    use crate::testkit::price::ScriptedPriceSource;
    use crate::testkit::store::MemorySeenStore;

    fn dispatcher(notifier: RecordingNotifier) -> Dispatcher {
        Dispatcher::new(
            ListingParser::default(),
            Box::new(MemorySeenStore::new()),
            PriceCache::new(
                Box::new(ScriptedPriceSource::new()),
                Duration::from_secs(60),
                Duration::from_secs(1),
            ),
            Box::new(notifier),
            Routes::new(ChatTarget::new("-1001"), None),
        )
    }

    fn backoff_config() -> ReconnectionConfig {
        ReconnectionConfig {
            delay_secs: 10,
            backoff_multiplier: 2.0,
            max_delay_secs: 60,
            ..ReconnectionConfig::default()
        }
    }

    fn watcher(feed: ScriptedFeed, notifier: RecordingNotifier) -> FeedWatcher<ScriptedFeed> {
        FeedWatcher::new(
            feed,
            CollectionSubscription::new("bitcoin", "stones"),
            dispatcher(notifier),
            testkit::config::reconnection(),
        )
    }

    #[test]
    fn test_fixed_delay_by_default() {
        let mut watcher = FeedWatcher::new(
            ScriptedFeed::new(),
            CollectionSubscription::new("bitcoin", "stones"),
            dispatcher(RecordingNotifier::new()),
            ReconnectionConfig::default(),
        );

        assert_eq!(watcher.next_delay(), Duration::from_secs(10));
        assert_eq!(watcher.next_delay(), Duration::from_secs(10));
    }

    #[test]
    fn test_exponential_backoff_is_capped() {
        let mut watcher = FeedWatcher::new(
            ScriptedFeed::new(),
            CollectionSubscription::new("bitcoin", "stones"),
            dispatcher(RecordingNotifier::new()),
            backoff_config(),
        );

        assert_eq!(watcher.next_delay(), Duration::from_secs(10));
        assert_eq!(watcher.next_delay(), Duration::from_secs(20));
        assert_eq!(watcher.next_delay(), Duration::from_secs(40));
        assert_eq!(watcher.next_delay(), Duration::from_secs(60));
        assert_eq!(watcher.next_delay(), Duration::from_secs(60));
    }

    #[test]
    fn test_reset_backoff() {
        let mut watcher = FeedWatcher::new(
            ScriptedFeed::new(),
            CollectionSubscription::new("bitcoin", "stones"),
            dispatcher(RecordingNotifier::new()),
            backoff_config(),
        );

        watcher.next_delay();
        watcher.next_delay();
        watcher.reset_backoff();

        assert_eq!(watcher.next_delay(), Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_reconnect_after_close_resubscribes() {
        let feed = ScriptedFeed::new().with_frames(vec![
            Some(FeedFrame::Closed {
                reason: "server restart".into(),
            }),
            Some(FeedFrame::Text(testkit::domain::sample_event().to_string())),
        ]);
        let (connects, subscribes) = feed.counts();
        let exhausted = feed.exhausted();
        let notifier = RecordingNotifier::new();
        let mut watcher = watcher(feed, notifier.clone());

        watcher
            .run(async move { exhausted.notified().await })
            .await
            .unwrap();

        assert_eq!(connects.load(Ordering::SeqCst), 2);
        assert_eq!(subscribes.load(Ordering::SeqCst), 2);
        assert_eq!(notifier.len(), 1);
        assert_eq!(watcher.state(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn test_ping_is_answered_and_not_dispatched() {
        let feed = ScriptedFeed::new().with_frames(vec![Some(FeedFrame::Text("ping".into()))]);
        let sent = feed.sent();
        let exhausted = feed.exhausted();
        let notifier = RecordingNotifier::new();
        let mut watcher = watcher(feed, notifier.clone());

        watcher
            .run(async move { exhausted.notified().await })
            .await
            .unwrap();

        assert_eq!(sent.lock().unwrap().last().map(String::as_str), Some("pong"));
        assert_eq!(notifier.len(), 0);
    }

    #[tokio::test]
    async fn test_undecodable_frame_is_dropped() {
        let feed = ScriptedFeed::new().with_frames(vec![
            Some(FeedFrame::Text("{not json".into())),
            Some(FeedFrame::Text(testkit::domain::sample_event().to_string())),
        ]);
        let (connects, _) = feed.counts();
        let exhausted = feed.exhausted();
        let notifier = RecordingNotifier::new();
        let mut watcher = watcher(feed, notifier.clone());

        watcher
            .run(async move { exhausted.notified().await })
            .await
            .unwrap();

        assert_eq!(connects.load(Ordering::SeqCst), 1);
        assert_eq!(notifier.len(), 1);
    }

    #[tokio::test]
    async fn test_connect_failure_is_retried() {
        let feed = ScriptedFeed::new()
            .with_connect_results(vec![
                Err(Error::Connection("refused".into())),
                Err(Error::Connection("refused".into())),
            ])
            .with_frames(vec![Some(FeedFrame::Text(
                testkit::domain::sample_event().to_string(),
            ))]);
        let (connects, subscribes) = feed.counts();
        let exhausted = feed.exhausted();
        let notifier = RecordingNotifier::new();
        let mut watcher = watcher(feed, notifier.clone());

        watcher
            .run(async move { exhausted.notified().await })
            .await
            .unwrap();

        assert_eq!(connects.load(Ordering::SeqCst), 3);
        assert_eq!(subscribes.load(Ordering::SeqCst), 1);
        assert_eq!(notifier.len(), 1);
    }

    #[tokio::test]
    async fn test_fatal_error_stops_loop() {
        let feed = ScriptedFeed::new().with_connect_results(vec![Err(Error::Config(
            crate::error::ConfigError::MissingField { field: "feed.ws_url" },
        ))]);
        let mut watcher = watcher(feed, RecordingNotifier::new());

        let result = watcher.run(std::future::pending()).await;

        assert!(matches!(result, Err(Error::Config(_))));
        assert_eq!(watcher.state(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn test_shutdown_interrupts_reconnect_delay() {
        let feed = ScriptedFeed::new()
            .with_connect_results(vec![Err(Error::Connection("refused".into()))]);
        let (connects, _) = feed.counts();
        let closes = feed.close_count();
        let mut watcher = FeedWatcher::new(
            feed,
            CollectionSubscription::new("bitcoin", "stones"),
            dispatcher(RecordingNotifier::new()),
            ReconnectionConfig {
                delay_secs: 3600,
                ..ReconnectionConfig::default()
            },
        );

        watcher
            .run(sleep(Duration::from_millis(50)))
            .await
            .unwrap();

        assert_eq!(connects.load(Ordering::SeqCst), 1);
        assert_eq!(closes.load(Ordering::SeqCst), 1);
        assert_eq!(watcher.state(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn test_silent_connection_is_dropped_after_idle_timeout() {
        let feed = ScriptedFeed::new();
        let (connects, subscribes) = feed.counts();
        let mut watcher = watcher(feed, RecordingNotifier::new())
            .with_idle_timeout(Duration::from_millis(30));

        watcher
            .run(sleep(Duration::from_millis(200)))
            .await
            .unwrap();

        assert!(connects.load(Ordering::SeqCst) >= 2);
        assert!(subscribes.load(Ordering::SeqCst) >= 2);
    }

    #[tokio::test]
    async fn test_hanging_connect_times_out() {
        let feed = ScriptedFeed::new().with_connect_delay(Duration::from_secs(5));
        let (connects, subscribes) = feed.counts();
        let mut watcher = watcher(feed, RecordingNotifier::new())
            .with_connect_timeout(Duration::from_millis(20));

        watcher
            .run(sleep(Duration::from_millis(150)))
            .await
            .unwrap();

        assert!(connects.load(Ordering::SeqCst) >= 2);
        assert_eq!(subscribes.load(Ordering::SeqCst), 0);
    }
}
