//! Magic Eden WebSocket feed.
//!
//! # Connection Lifecycle
//!
//! 1. **Connection**: `connect()` opens the socket with browser-like
//!    `Origin` and `User-Agent` headers (the endpoint rejects bare clients)
//! 2. **Subscription**: `subscribe()` sends the collection and topic frames
//! 3. **Frames**: `next_frame()` yields text frames until close or error
//!
//! Protocol-level ping frames are answered here. The application-level
//! `"ping"` text heartbeat is surfaced as a normal text frame; the watcher
//! replies to it. This type never reconnects on its own.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, trace};

use super::message::subscribe_frames;
use crate::error::{Error, Result};
use crate::port::{CollectionSubscription, FeedFrame, FeedStream};

const ORIGIN: &str = "https://magiceden.io";
const USER_AGENT: &str = "Mozilla/5.0";

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Magic Eden activity feed implementing [`FeedStream`].
pub struct MagicEdenFeed {
    url: String,
    ws: Option<Socket>,
}

impl MagicEdenFeed {
    /// Create a disconnected feed for the given WebSocket URL.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ws: None,
        }
    }

    fn socket(&mut self) -> Result<&mut Socket> {
        self.ws
            .as_mut()
            .ok_or_else(|| Error::Connection("Not connected".into()))
    }
}

#[async_trait]
impl FeedStream for MagicEdenFeed {
    async fn connect(&mut self) -> Result<()> {
        self.ws = None;

        let mut request = self.url.as_str().into_client_request()?;
        let headers = request.headers_mut();
        headers.insert("Origin", HeaderValue::from_static(ORIGIN));
        headers.insert("User-Agent", HeaderValue::from_static(USER_AGENT));

        info!(url = %self.url, "Connecting to WebSocket");
        let (ws_stream, response) = connect_async(request).await?;
        info!(status = %response.status(), "WebSocket connected");

        self.ws = Some(ws_stream);
        Ok(())
    }

    async fn subscribe(&mut self, subscription: &CollectionSubscription) -> Result<()> {
        let frames = subscribe_frames(subscription)?;
        let ws = self.socket()?;

        info!(
            chain = %subscription.chain,
            collection = %subscription.collection_symbol,
            "Subscribing to collection activity"
        );
        for frame in frames {
            ws.send(Message::Text(frame)).await?;
        }
        Ok(())
    }

    async fn send_text(&mut self, text: &str) -> Result<()> {
        self.socket()?.send(Message::Text(text.to_string())).await?;
        Ok(())
    }

    async fn next_frame(&mut self) -> Option<FeedFrame> {
        let ws = self.ws.as_mut()?;

        loop {
            match ws.next().await? {
                Ok(Message::Text(text)) => {
                    trace!(bytes = text.len(), "Received WebSocket text frame");
                    return Some(FeedFrame::Text(text));
                }
                Ok(Message::Binary(bytes)) => match String::from_utf8(bytes) {
                    Ok(text) => return Some(FeedFrame::Text(text)),
                    Err(e) => debug!(error = %e, "Dropping non-UTF-8 binary frame"),
                },
                Ok(Message::Ping(data)) => {
                    trace!("Received WebSocket ping");
                    if let Err(e) = ws.send(Message::Pong(data)).await {
                        return Some(FeedFrame::Closed {
                            reason: format!("Failed to send pong: {e}"),
                        });
                    }
                }
                Ok(Message::Close(frame)) => {
                    info!(frame = ?frame, "WebSocket closed by server");
                    return Some(FeedFrame::Closed {
                        reason: frame
                            .map(|f| f.reason.to_string())
                            .unwrap_or_else(|| "closed by server".into()),
                    });
                }
                Ok(_) => continue,
                Err(e) => {
                    error!(error = %e, "WebSocket error");
                    return Some(FeedFrame::Closed {
                        reason: e.to_string(),
                    });
                }
            }
        }
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(mut ws) = self.ws.take() {
            ws.close(None).await?;
        }
        Ok(())
    }

    fn feed_name(&self) -> &'static str {
        "magiceden"
    }
}
