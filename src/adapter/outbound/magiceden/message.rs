//! Magic Eden WebSocket control messages.
//!
//! Right after connecting, the client sends two frames:
//!
//! ```json
//! {"type":"subscribeCollection","constraint":{"chain":"bitcoin","collectionSymbol":"stones"}}
//! {"eventName":"nx.Subscribe","nx.Topics":["*"]}
//! ```
//!
//! The server sends the literal text `ping` as a heartbeat and JSON
//! activity documents for everything else.

use serde::Serialize;

use crate::error::Result;
use crate::port::CollectionSubscription;

/// Collection-scoped subscription request.
#[derive(Debug, Serialize)]
pub struct SubscribeCollectionMessage<'a> {
    #[serde(rename = "type")]
    pub msg_type: &'static str,
    pub constraint: CollectionConstraint<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionConstraint<'a> {
    pub chain: &'a str,
    pub collection_symbol: &'a str,
}

impl<'a> SubscribeCollectionMessage<'a> {
    pub fn new(subscription: &'a CollectionSubscription) -> Self {
        Self {
            msg_type: "subscribeCollection",
            constraint: CollectionConstraint {
                chain: &subscription.chain,
                collection_symbol: &subscription.collection_symbol,
            },
        }
    }
}

/// Wildcard topic subscription request.
#[derive(Debug, Serialize)]
pub struct SubscribeTopicsMessage {
    #[serde(rename = "eventName")]
    pub event_name: &'static str,
    #[serde(rename = "nx.Topics")]
    pub topics: [&'static str; 1],
}

impl Default for SubscribeTopicsMessage {
    fn default() -> Self {
        Self {
            event_name: "nx.Subscribe",
            topics: ["*"],
        }
    }
}

/// Serialize both subscribe frames in the order they must be sent.
pub fn subscribe_frames(subscription: &CollectionSubscription) -> Result<[String; 2]> {
    Ok([
        serde_json::to_string(&SubscribeCollectionMessage::new(subscription))?,
        serde_json::to_string(&SubscribeTopicsMessage::default())?,
    ])
}
