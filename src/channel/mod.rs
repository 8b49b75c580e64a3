//! # Live Chat Channel
//!
//! Everything needed to keep a chat feed open against the panel:
//!
//! - [`message`]: wire format and schema-checked decode
//! - [`backoff`]: reconnect delay policy
//! - [`transport`]: the socket seam and the WebSocket implementation
//! - [`feed`]: the supervisor that connects, pumps frames and reconnects
//!
//! Nothing here knows about the terminal UI; the feed reports
//! [`FeedEvent`]s on a channel and the UI maps them to actions.

pub mod backoff;
pub mod feed;
pub mod message;
pub mod transport;

pub use backoff::ReconnectPolicy;
pub use feed::{FeedEvent, FeedExit, LiveFeed};
pub use message::{ChannelMessage, ParseError, format_timestamp};
pub use transport::{ChannelError, Link, Transport, WsTransport};
