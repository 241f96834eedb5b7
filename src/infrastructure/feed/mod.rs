//! Feed lifecycle: connection, subscription, heartbeat and reconnection.

mod watcher;

pub use watcher::{ConnectionState, FeedWatcher, HEARTBEAT_PING, HEARTBEAT_PONG};
