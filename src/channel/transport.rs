//! Transport seam for the live feed.
//!
//! A [`Transport`] turns an endpoint into a [`Link`]: a pair of unbounded
//! channels carrying raw text frames. The link is closed from the remote
//! side when `inbound` yields `None`, and from our side by dropping it.
//! Keeping the socket behind channels lets the feed supervisor be tested
//! with an in-memory transport.

use std::fmt;

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use log::{debug, info, warn};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use url::Url;

use crate::session::Session;

#[derive(Debug)]
pub enum ChannelError {
    /// The endpoint could not be turned into a handshake request.
    Handshake(String),
    /// TCP connect or WebSocket upgrade failed.
    Connect(String),
}

impl fmt::Display for ChannelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelError::Handshake(msg) => write!(f, "handshake error: {msg}"),
            ChannelError::Connect(msg) => write!(f, "connect error: {msg}"),
        }
    }
}

impl std::error::Error for ChannelError {}

/// An open channel: text frames in, text frames out.
pub struct Link {
    pub inbound: mpsc::UnboundedReceiver<String>,
    pub outbound: mpsc::UnboundedSender<String>,
}

#[async_trait]
pub trait Transport: Send + Sync {
    fn name(&self) -> &str;

    /// Whether this transport can reach `endpoint` at all. When it can't,
    /// the feed reports the capability as missing and never connects.
    fn supports(&self, endpoint: &Url) -> bool;

    async fn connect(&self, endpoint: &Url) -> Result<Link, ChannelError>;
}

/// WebSocket transport over `tokio-tungstenite`.
///
/// Speaks `ws://` and `wss://` (through native-tls, the same backend
/// reqwest uses). The handshake carries the session's cookies.
pub struct WsTransport {
    session: Session,
}

impl WsTransport {
    pub fn new(session: Session) -> Self {
        Self { session }
    }
}

#[async_trait]
impl Transport for WsTransport {
    fn name(&self) -> &str {
        "websocket"
    }

    fn supports(&self, endpoint: &Url) -> bool {
        matches!(endpoint.scheme(), "ws" | "wss")
    }

    async fn connect(&self, endpoint: &Url) -> Result<Link, ChannelError> {
        let mut request = endpoint
            .as_str()
            .into_client_request()
            .map_err(|e| ChannelError::Handshake(e.to_string()))?;
        if let Some(cookies) = self.session.cookie_header() {
            let value =
                HeaderValue::from_str(&cookies).map_err(|e| ChannelError::Handshake(e.to_string()))?;
            request.headers_mut().insert("Cookie", value);
        }

        let (stream, response) = connect_async(request)
            .await
            .map_err(|e| ChannelError::Connect(e.to_string()))?;
        info!("WebSocket open to {} ({})", endpoint, response.status());

        let (mut writer, mut reader) = stream.split();
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<String>();

        let url = endpoint.to_string();
        tokio::spawn(async move {
            while let Some(frame) = reader.next().await {
                match frame {
                    Ok(Message::Text(text)) => {
                        if inbound_tx.send(text.to_string()).is_err() {
                            break;
                        }
                    }
                    Ok(Message::Close(reason)) => {
                        debug!("Close frame from {}: {:?}", url, reason);
                        break;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!("WebSocket read error on {}: {}", url, e);
                        break;
                    }
                }
            }
            // inbound_tx drops here, which is how the feed learns of the close
        });

        tokio::spawn(async move {
            while let Some(text) = outbound_rx.recv().await {
                if let Err(e) = writer.send(Message::Text(text.into())).await {
                    warn!("WebSocket write error: {}", e);
                    break;
                }
            }
            let _ = writer.close().await;
        });

        Ok(Link {
            inbound: inbound_rx,
            outbound: outbound_tx,
        })
    }
}
