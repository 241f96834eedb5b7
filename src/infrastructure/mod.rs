//! Infrastructure layer.
//!
//! Provides technical concerns that support the application without containing
//! business logic.
//!
//! # Submodules
//!
//! - [`bootstrap`] - Composition root for runtime wiring
//! - [`config`] - Configuration loading and validation
//! - [`feed`] - Feed connection lifecycle and reconnection

pub mod bootstrap;
pub mod config;
pub mod feed;
