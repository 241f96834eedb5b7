//! Infrastructure configuration modules.

pub mod feed;
pub mod logging;
pub mod price;
pub mod reconnection;
pub mod settings;
pub mod state;
pub mod telegram;

pub use settings::Config;
