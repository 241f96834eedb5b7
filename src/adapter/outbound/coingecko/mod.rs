//! CoinGecko price source.

mod client;

pub use client::{CoinGecko, DEFAULT_API_BASE};
