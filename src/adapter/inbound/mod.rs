//! Inbound adapters: how the watcher is started.

pub mod cli;
