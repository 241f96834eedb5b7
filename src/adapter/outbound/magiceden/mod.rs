//! Magic Eden ordinals activity feed adapter.

pub mod message;
mod stream;

pub use stream::MagicEdenFeed;
