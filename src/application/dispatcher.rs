//! Listing dispatcher.
//!
//! Turns decoded feed events into notifications. Steps run strictly in
//! order for each event, and every network call is awaited before the next:
//!
//! 1. skip ids already seen
//! 2. suppress (but remember) listings below the minimum price
//! 3. read the cached price enrichment
//! 4. notify the general channel
//! 5. notify the trait channel when the trait rule matches
//! 6. record the id as seen
//!
//! The id is recorded after the notification attempts, so a crash in
//! between can re-send an alert on restart but never drop one.

use std::time::Duration;

use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use super::parser::{is_listing_event, ListingParser};
use super::price_cache::PriceCache;
use crate::domain::{ChatTarget, InscriptionId, Listing, TraitRule};
use crate::port::{Notifier, SeenStore};

/// Default deadline for a single notification.
pub const DEFAULT_NOTIFY_TIMEOUT: Duration = Duration::from_secs(15);

/// Destination chats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routes {
    /// Receives every accepted listing.
    pub general: ChatTarget,
    /// Receives listings matching the trait rule, if configured.
    pub trait_channel: Option<ChatTarget>,
}

impl Routes {
    pub fn new(general: ChatTarget, trait_channel: Option<ChatTarget>) -> Self {
        Self {
            general,
            trait_channel,
        }
    }
}

/// Result of a single delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    Failed,
}

/// What the dispatcher did with one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Not a listing event.
    Ignored,
    /// Listing id already seen; nothing happened.
    Duplicate(InscriptionId),
    /// Below the minimum price; recorded as seen without notifying.
    BelowMinimum(InscriptionId),
    /// Notifications were attempted and the id recorded.
    Notified {
        id: InscriptionId,
        general: Delivery,
        /// `None` when no trait channel is configured or the rule did not match.
        trait_channel: Option<Delivery>,
    },
}

/// Owns the seen set, price cache and trait rule for the processing loop.
pub struct Dispatcher {
    parser: ListingParser,
    seen: Box<dyn SeenStore>,
    prices: PriceCache,
    notifier: Box<dyn Notifier>,
    routes: Routes,
    trait_rule: TraitRule,
    min_price_btc: Option<Decimal>,
    notify_timeout: Duration,
}

impl Dispatcher {
    pub fn new(
        parser: ListingParser,
        seen: Box<dyn SeenStore>,
        prices: PriceCache,
        notifier: Box<dyn Notifier>,
        routes: Routes,
    ) -> Self {
        Self {
            parser,
            seen,
            prices,
            notifier,
            routes,
            trait_rule: TraitRule::empty(),
            min_price_btc: None,
            notify_timeout: DEFAULT_NOTIFY_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_trait_rule(mut self, rule: TraitRule) -> Self {
        self.trait_rule = rule;
        self
    }

    /// Minimum listing price in BTC. Zero or negative disables the filter.
    #[must_use]
    pub fn with_min_price(mut self, min_price_btc: Option<Decimal>) -> Self {
        self.min_price_btc = min_price_btc.filter(|min| *min > Decimal::ZERO);
        self
    }

    #[must_use]
    pub fn with_notify_timeout(mut self, timeout: Duration) -> Self {
        self.notify_timeout = timeout;
        self
    }

    /// Number of ids known to the seen store.
    #[must_use]
    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }

    #[must_use]
    pub fn price_cache(&self) -> &PriceCache {
        &self.prices
    }

    /// Process one decoded feed event.
    pub async fn handle(&mut self, event: &Value) -> DispatchOutcome {
        if !is_listing_event(event) {
            return DispatchOutcome::Ignored;
        }

        let parsed = self.parser.parse(event);
        let listing = parsed.listing;
        for warning in &parsed.warnings {
            warn!(
                inscription = %listing.external_id(),
                field = warning.field,
                reason = %warning.reason,
                "Listing field defaulted"
            );
        }

        let id = listing.external_id().clone();
        if self.seen.contains(&id) {
            debug!(inscription = %id, "Duplicate listing skipped");
            return DispatchOutcome::Duplicate(id);
        }

        if let Some(min) = self.min_price_btc {
            if listing.price_btc() < min {
                info!(
                    inscription = %id,
                    price_btc = %listing.price_btc(),
                    min_price_btc = %min,
                    "Listing below minimum price"
                );
                self.mark_seen(&id).await;
                return DispatchOutcome::BelowMinimum(id);
            }
        }

        info!(
            inscription = %id,
            name = %listing.name(),
            price_btc = %listing.price_btc(),
            "New listing"
        );

        let price_text = self.prices.price_text().await;

        let general = self
            .deliver("general", &self.routes.general, &listing, &price_text)
            .await;

        let trait_channel = match &self.routes.trait_channel {
            Some(chat) if self.trait_rule.matches(listing.traits()) => {
                Some(self.deliver("trait", chat, &listing, &price_text).await)
            }
            _ => None,
        };

        self.mark_seen(&id).await;

        DispatchOutcome::Notified {
            id,
            general,
            trait_channel,
        }
    }

    async fn deliver(
        &self,
        channel: &'static str,
        chat: &ChatTarget,
        listing: &Listing,
        price_text: &str,
    ) -> Delivery {
        let send = self.notifier.notify(chat, listing, price_text);
        match tokio::time::timeout(self.notify_timeout, send).await {
            Ok(Ok(())) => {
                info!(
                    channel,
                    chat = %chat,
                    inscription = %listing.external_id(),
                    notifier = self.notifier.name(),
                    "Listing alert sent"
                );
                Delivery::Sent
            }
            Ok(Err(e)) => {
                warn!(
                    channel,
                    chat = %chat,
                    inscription = %listing.external_id(),
                    error = %e,
                    "Listing alert failed"
                );
                Delivery::Failed
            }
            Err(_) => {
                warn!(
                    channel,
                    chat = %chat,
                    inscription = %listing.external_id(),
                    timeout_secs = self.notify_timeout.as_secs_f64(),
                    "Listing alert timed out"
                );
                Delivery::Failed
            }
        }
    }

    async fn mark_seen(&mut self, id: &InscriptionId) {
        if let Err(e) = self.seen.record(id).await {
            error!(inscription = %id, error = %e, "Failed to persist seen listing");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::domain::listing_event;
    use crate::testkit::notifier::RecordingNotifier;
    use crate::testkit::price::ScriptedPriceSource;
    use crate::testkit::store::MemorySeenStore;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn dispatcher(notifier: RecordingNotifier, seen: MemorySeenStore) -> Dispatcher {
        let prices = PriceCache::new(
            Box::new(ScriptedPriceSource::new()),
            Duration::from_secs(60),
            Duration::from_secs(1),
        );
        Dispatcher::new(
            ListingParser::default(),
            Box::new(seen),
            prices,
            Box::new(notifier),
            Routes::new(ChatTarget::new("-1001"), Some(ChatTarget::new("-1002"))),
        )
    }

    #[tokio::test]
    async fn non_listing_events_are_ignored() {
        let notifier = RecordingNotifier::new();
        let seen = MemorySeenStore::new();
        let mut dispatcher = dispatcher(notifier.clone(), seen.clone());

        let outcome = dispatcher
            .handle(&json!({"kind": "buying_broadcasted", "token": {"location": "a:1"}}))
            .await;

        assert_eq!(outcome, DispatchOutcome::Ignored);
        assert_eq!(notifier.len(), 0);
        assert!(seen.ids().is_empty());
    }

    #[tokio::test]
    async fn duplicate_has_no_side_effects() {
        let notifier = RecordingNotifier::new();
        let seen = MemorySeenStore::with_ids(["deadbeefi2"]);
        let mut dispatcher = dispatcher(notifier.clone(), seen.clone());

        let outcome = dispatcher.handle(&listing_event("deadbeef:2", 150_000_000)).await;

        assert_eq!(
            outcome,
            DispatchOutcome::Duplicate(InscriptionId::new("deadbeefi2"))
        );
        assert_eq!(notifier.len(), 0);
        assert_eq!(seen.record_calls(), 0);
    }

    #[tokio::test]
    async fn below_minimum_is_recorded_without_notifying() {
        let notifier = RecordingNotifier::new();
        let seen = MemorySeenStore::new();
        let mut dispatcher =
            dispatcher(notifier.clone(), seen.clone()).with_min_price(Some(dec!(2)));

        let outcome = dispatcher.handle(&listing_event("abc:0", 150_000_000)).await;

        assert_eq!(
            outcome,
            DispatchOutcome::BelowMinimum(InscriptionId::new("abci0"))
        );
        assert_eq!(notifier.len(), 0);
        assert!(seen.contains_id("abci0"));
    }

    #[tokio::test]
    async fn zero_minimum_disables_filter() {
        let notifier = RecordingNotifier::new();
        let mut dispatcher = dispatcher(notifier.clone(), MemorySeenStore::new())
            .with_min_price(Some(Decimal::ZERO));

        dispatcher.handle(&listing_event("abc:0", 1)).await;

        assert_eq!(notifier.len(), 1);
    }

    #[tokio::test]
    async fn trait_channel_requires_match() {
        let notifier = RecordingNotifier::new();
        let rule = TraitRule::from_entries([("Rarity Tier", ["V"])]);
        let mut dispatcher =
            dispatcher(notifier.clone(), MemorySeenStore::new()).with_trait_rule(rule);

        let outcome = dispatcher.handle(&listing_event("abc:0", 1_000)).await;

        assert!(matches!(
            outcome,
            DispatchOutcome::Notified {
                general: Delivery::Sent,
                trait_channel: Some(Delivery::Sent),
                ..
            }
        ));
        assert_eq!(notifier.chats(), vec!["-1001", "-1002"]);
    }

    #[tokio::test]
    async fn failed_general_alert_still_records_seen() {
        let notifier = RecordingNotifier::failing();
        let seen = MemorySeenStore::new();
        let mut dispatcher = dispatcher(notifier.clone(), seen.clone());

        let outcome = dispatcher.handle(&listing_event("abc:0", 1_000)).await;

        assert!(matches!(
            outcome,
            DispatchOutcome::Notified {
                general: Delivery::Failed,
                trait_channel: None,
                ..
            }
        ));
        assert!(seen.contains_id("abci0"));
    }

    #[tokio::test]
    async fn persist_failure_keeps_id_in_memory() {
        let notifier = RecordingNotifier::new();
        let seen = MemorySeenStore::new().failing_writes();
        let mut dispatcher = dispatcher(notifier.clone(), seen.clone());

        dispatcher.handle(&listing_event("abc:0", 1_000)).await;
        let second = dispatcher.handle(&listing_event("abc:0", 1_000)).await;

        assert!(matches!(second, DispatchOutcome::Duplicate(_)));
        assert_eq!(notifier.len(), 1);
    }
}
