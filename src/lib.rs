//! Ordwatch - Magic Eden ordinals listing watcher.
//!
//! Subscribes to the activity feed of a single collection, turns every new
//! listing into a Telegram alert (optionally a second alert for listings with
//! selected traits) and remembers which listings were already announced.
//!
//! # Architecture
//!
//! - **`domain`** - Listings, identifiers, trait rules, price snapshots
//! - **`port`** - Traits for the feed, notifier, price source and seen store
//! - **`application`** - Parsing, price caching and dispatch
//! - **`adapter`** - Magic Eden websocket, Telegram, CoinGecko, files, CLI
//! - **`infrastructure`** - Configuration, reconnect loop, wiring
//!
//! # Features
//!
//! - `telegram` (default) - Telegram delivery via teloxide
//! - `testkit` - Scripted fakes for integration tests
//!
//! # Example
//!
//! ```no_run
//! use ordwatch::infrastructure::bootstrap::build_watcher;
//! use ordwatch::infrastructure::config::Config;
//!
//! # async fn run() -> ordwatch::error::Result<()> {
//! let config = Config::load("ordwatch.toml")?;
//! config.validate()?;
//! let mut watcher = build_watcher(&config).await?;
//! watcher.run(async { let _ = tokio::signal::ctrl_c().await; }).await?;
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
