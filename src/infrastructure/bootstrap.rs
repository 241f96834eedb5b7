//! Composition root: builds the watcher and its collaborators from [`Config`].

use tracing::info;
#[cfg(not(feature = "telegram"))]
use tracing::warn;

use crate::adapter::outbound::coingecko::CoinGecko;
use crate::adapter::outbound::magiceden::MagicEdenFeed;
#[cfg(feature = "telegram")]
use crate::adapter::outbound::notifier::telegram::{TelegramConfig, TelegramNotifier};
use crate::adapter::outbound::store::{load_trait_rule, FileSeenStore};
use crate::application::dispatcher::{Dispatcher, Routes};
use crate::application::parser::ListingParser;
use crate::application::price_cache::PriceCache;
use crate::domain::ChatTarget;
use crate::error::{ConfigError, Result};
use crate::infrastructure::config::settings::{Config, ENV_BOT_TOKEN, ENV_GENERAL_CHAT_ID};
use crate::infrastructure::feed::FeedWatcher;
use crate::port::{LogNotifier, Notifier};

/// Build the notifier: Telegram normally, the log notifier in dry-run mode.
#[cfg(feature = "telegram")]
pub(crate) fn build_notifier(config: &Config) -> Result<Box<dyn Notifier>> {
    if config.dry_run {
        info!("Dry-run mode, alerts are logged only");
        return Ok(Box::new(LogNotifier));
    }

    let bot_token = config
        .bot_token
        .clone()
        .filter(|token| !token.is_empty())
        .ok_or(ConfigError::MissingCredentials {
            vars: vec![ENV_BOT_TOKEN],
        })?;

    Ok(Box::new(TelegramNotifier::new(TelegramConfig {
        bot_token,
        button_label: config.telegram.button_label.clone(),
    })))
}

/// Build the notifier (non-telegram variant).
#[cfg(not(feature = "telegram"))]
pub(crate) fn build_notifier(config: &Config) -> Result<Box<dyn Notifier>> {
    if !config.dry_run {
        warn!("Built without the telegram feature, alerts are logged only");
    }
    Ok(Box::new(LogNotifier))
}

/// Build the dispatcher: seen store, price cache, trait rule, routes.
///
/// # Errors
///
/// Returns an error if the seen file exists but cannot be read or the HTTP
/// client cannot be built.
pub async fn build_dispatcher(config: &Config) -> Result<Dispatcher> {
    let notifier = build_notifier(config)?;

    let seen = FileSeenStore::load(&config.state.seen_file).await?;
    let trait_rule = load_trait_rule(&config.state.traits_filter_file).await;

    let source = CoinGecko::new(
        &config.price.api_base,
        &config.price.nft_id,
        config.price.timeout(),
    )?;
    let prices = PriceCache::new(
        Box::new(source),
        config.price.cache_window(),
        config.price.timeout(),
    );

    // A dry run may omit the chat ids; alerts are only logged.
    let general = match (config.telegram.general_chat_id.clone(), config.dry_run) {
        (Some(chat), _) => chat,
        (None, true) => ChatTarget::new("dry-run"),
        (None, false) => {
            return Err(ConfigError::MissingCredentials {
                vars: vec![ENV_GENERAL_CHAT_ID],
            }
            .into())
        }
    };
    let routes = Routes::new(general, config.trait_chat().cloned());

    if routes.trait_channel.is_some() && trait_rule.is_empty() {
        info!("Trait channel configured but no trait rule loaded, it will stay silent");
    }

    Ok(Dispatcher::new(
        ListingParser::new(&config.feed.item_url_base),
        Box::new(seen),
        prices,
        notifier,
        routes,
    )
    .with_trait_rule(trait_rule)
    .with_min_price(config.min_price_btc())
    .with_notify_timeout(config.telegram.timeout()))
}

/// Build the feed watcher for the configured collection.
///
/// # Errors
///
/// See [`build_dispatcher`].
pub async fn build_watcher(config: &Config) -> Result<FeedWatcher<MagicEdenFeed>> {
    let dispatcher = build_dispatcher(config).await?;
    let feed = MagicEdenFeed::new(&config.feed.ws_url);

    info!(
        collection = %config.feed.collection_symbol,
        ws_url = %config.feed.ws_url,
        trait_channel = config.trait_chat().is_some(),
        min_price_btc = ?config.min_price_btc(),
        dry_run = config.dry_run,
        "Watcher configured"
    );

    Ok(FeedWatcher::new(
        feed,
        config.feed.subscription(),
        dispatcher,
        config.reconnection.clone(),
    ))
}
