//! # Live Feed
//!
//! Supervisor for the chat channel. Owns at most one [`Link`] at a time
//! and loops:
//!
//! ```text
//!   connect ──ok──▶ Opened ──▶ pump frames ──close──▶ Closed ─┐
//!      │                                                     │
//!      └──err──────────────────────────────────────────────▶ retry?
//!                                                            │
//!                     Retrying { attempt, delay } ◀── yes ───┤
//!                     GaveUp { attempts }         ◀── no  ───┘
//! ```
//!
//! A new link is only requested after the previous one has closed, so a
//! close event produces exactly one reopen attempt and two links never
//! coexist. The attempt counter resets on every successful open. Anything
//! the UI sends while no link is open (connecting or waiting out a delay)
//! is dropped, never queued for the next link.
//!
//! The supervisor stops when the policy gives up, when the transport can't
//! serve the endpoint, or when the UI side drops either of its channels.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use url::Url;

use super::backoff::ReconnectPolicy;
use super::message::{ChannelMessage, ParseError};
use super::transport::{ChannelError, Link, Transport};

/// What the feed reports back to the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    Opened,
    Message(ChannelMessage),
    /// A frame failed the schema check and was dropped.
    Rejected(ParseError),
    Closed,
    Retrying { attempt: u32, delay: Duration },
    GaveUp { attempts: u32 },
    /// The transport can't serve this endpoint; the feed never connects.
    Unavailable(String),
}

/// Why [`LiveFeed::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedExit {
    Unavailable,
    GaveUp,
    /// The UI dropped its end of the event or outgoing channel.
    Detached,
}

enum PumpEnd {
    Closed,
    Detached,
}

pub struct LiveFeed {
    endpoint: Url,
    transport: Arc<dyn Transport>,
    policy: ReconnectPolicy,
}

impl LiveFeed {
    pub fn new(endpoint: Url, transport: Arc<dyn Transport>, policy: ReconnectPolicy) -> Self {
        Self {
            endpoint,
            transport,
            policy,
        }
    }

    /// Runs the connect/pump/reconnect loop until one of the exit conditions.
    ///
    /// `outgoing` carries messages to send; they are encoded and written to
    /// the current link, or dropped with a warning while disconnected.
    pub async fn run(
        self,
        events: UnboundedSender<FeedEvent>,
        mut outgoing: UnboundedReceiver<ChannelMessage>,
    ) -> FeedExit {
        if !self.transport.supports(&self.endpoint) {
            warn!(
                "Transport '{}' cannot serve {}, chat disabled",
                self.transport.name(),
                self.endpoint
            );
            let _ = events.send(FeedEvent::Unavailable(format!(
                "{} transport cannot reach {}",
                self.transport.name(),
                self.endpoint
            )));
            return FeedExit::Unavailable;
        }

        let mut rng = StdRng::from_entropy();
        let mut attempt: u32 = 0;

        loop {
            info!("Opening chat channel {} (retry {})", self.endpoint, attempt);
            let Some(connected) = self.connect_offline(&mut outgoing).await else {
                return FeedExit::Detached;
            };
            match connected {
                Ok(link) => {
                    attempt = 0;
                    if events.send(FeedEvent::Opened).is_err() {
                        return FeedExit::Detached;
                    }
                    match pump(link, &events, &mut outgoing).await {
                        PumpEnd::Closed => {
                            info!("Chat channel {} closed", self.endpoint);
                            if events.send(FeedEvent::Closed).is_err() {
                                return FeedExit::Detached;
                            }
                        }
                        PumpEnd::Detached => return FeedExit::Detached,
                    }
                }
                Err(e) => {
                    warn!("Chat connect to {} failed: {}", self.endpoint, e);
                }
            }

            attempt = attempt.saturating_add(1);
            let Some(delay) = self.policy.delay_for(attempt, &mut rng) else {
                let attempts = attempt - 1;
                warn!("Giving up on {} after {} retries", self.endpoint, attempts);
                let _ = events.send(FeedEvent::GaveUp { attempts });
                return FeedExit::GaveUp;
            };

            debug!("Reconnecting in {:?} (retry {})", delay, attempt);
            if events.send(FeedEvent::Retrying { attempt, delay }).is_err() {
                return FeedExit::Detached;
            }
            if !wait_offline(delay, &mut outgoing).await {
                return FeedExit::Detached;
            }
        }
    }

    /// Connects, dropping anything the UI sends while the handshake is in
    /// flight. Returns `None` if the UI went away.
    async fn connect_offline(
        &self,
        outgoing: &mut UnboundedReceiver<ChannelMessage>,
    ) -> Option<Result<Link, ChannelError>> {
        let connect = self.transport.connect(&self.endpoint);
        tokio::pin!(connect);

        loop {
            tokio::select! {
                result = &mut connect => return Some(result),
                message = outgoing.recv() => match message {
                    Some(message) => {
                        warn!("Chat connecting, dropping message from {}", message.author);
                    }
                    None => return None,
                },
            }
        }
    }
}

async fn pump(
    link: Link,
    events: &UnboundedSender<FeedEvent>,
    outgoing: &mut UnboundedReceiver<ChannelMessage>,
) -> PumpEnd {
    let Link {
        mut inbound,
        outbound,
    } = link;

    loop {
        tokio::select! {
            frame = inbound.recv() => {
                let Some(frame) = frame else {
                    return PumpEnd::Closed;
                };
                let event = match ChannelMessage::decode(&frame) {
                    Ok(message) => FeedEvent::Message(message),
                    Err(e) => {
                        warn!("Dropping malformed chat frame ({}): {:?}", e, frame);
                        FeedEvent::Rejected(e)
                    }
                };
                if events.send(event).is_err() {
                    return PumpEnd::Detached;
                }
            }
            message = outgoing.recv() => {
                let Some(message) = message else {
                    return PumpEnd::Detached;
                };
                match message.encode() {
                    Ok(json) => {
                        if outbound.send(json).is_err() {
                            warn!("Chat link closed before message from {} was sent", message.author);
                        }
                    }
                    Err(e) => warn!("Failed to encode chat message: {}", e),
                }
            }
        }
    }
}

/// Sleeps through a reconnect delay, dropping anything the UI tries to
/// send meanwhile. Returns `false` if the UI went away.
async fn wait_offline(delay: Duration, outgoing: &mut UnboundedReceiver<ChannelMessage>) -> bool {
    let sleep = tokio::time::sleep(delay);
    tokio::pin!(sleep);

    loop {
        tokio::select! {
            _ = &mut sleep => return true,
            message = outgoing.recv() => match message {
                Some(message) => {
                    warn!("Chat offline, dropping message from {}", message.author);
                }
                None => return false,
            },
        }
    }
}
