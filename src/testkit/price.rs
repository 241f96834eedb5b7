//! Scripted [`PriceSource`].

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::PriceQuote;
use crate::error::{Error, Result};
use crate::port::PriceSource;

/// Returns scripted quotes or errors in order; fails once exhausted.
#[derive(Default)]
pub struct ScriptedPriceSource {
    results: Mutex<VecDeque<Result<PriceQuote>>>,
    calls: Arc<AtomicU32>,
    delay: Option<Duration>,
}

impl ScriptedPriceSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then_quote(self, quote: PriceQuote) -> Self {
        self.push(Ok(quote))
    }

    pub fn then_error(self, message: &str) -> Self {
        self.push(Err(Error::PriceSource(message.to_string())))
    }

    /// Delay every fetch, e.g. to trigger the caller's timeout.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Shared counter of `fetch` calls.
    pub fn calls(&self) -> Arc<AtomicU32> {
        self.calls.clone()
    }

    fn push(self, result: Result<PriceQuote>) -> Self {
        self.results
            .lock()
            .expect("lock scripted quotes")
            .push_back(result);
        self
    }
}

#[async_trait]
impl PriceSource for ScriptedPriceSource {
    async fn fetch(&self) -> Result<PriceQuote> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.results
            .lock()
            .expect("lock scripted quotes")
            .pop_front()
            .unwrap_or_else(|| Err(Error::PriceSource("no scripted quote".into())))
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}
