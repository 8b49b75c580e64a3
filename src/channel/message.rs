//! # Channel Messages
//!
//! The wire shape of one chat line on the live channel. The same three
//! fields travel in both directions:
//!
//! ```text
//! {"msgdate":"[14:05:09]","author":"alice","message":"hi"}
//! ```
//!
//! Inbound frames go through [`ChannelMessage::decode`], which checks the
//! shape field by field instead of trusting the peer. A frame that fails the
//! check is reported as a [`ParseError`] and never reaches the chat log.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A single chat line, as sent and received on the `/chat` socket.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChannelMessage {
    /// Display timestamp, `[HH:MM:SS]` for messages we send.
    pub msgdate: String,
    pub author: String,
    pub message: String,
}

/// Why an inbound frame was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The frame is not valid JSON.
    NotJson(String),
    /// Valid JSON, but not an object.
    NotAnObject,
    /// A required field is absent.
    MissingField(&'static str),
    /// A required field is present but not a string.
    WrongType(&'static str),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::NotJson(msg) => write!(f, "frame is not JSON: {msg}"),
            ParseError::NotAnObject => write!(f, "frame is not a JSON object"),
            ParseError::MissingField(name) => write!(f, "missing field `{name}`"),
            ParseError::WrongType(name) => write!(f, "field `{name}` is not a string"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Formats a wall-clock time the way the panel stamps chat lines.
pub fn format_timestamp(at: NaiveTime) -> String {
    format!("[{:02}:{:02}:{:02}]", at.hour(), at.minute(), at.second())
}

impl ChannelMessage {
    /// Builds an outbound message stamped with `at`.
    ///
    /// Returns `None` when either the author or the body is empty; nothing
    /// should be sent in that case.
    pub fn outbound(author: &str, body: &str, at: NaiveTime) -> Option<Self> {
        if author.is_empty() || body.is_empty() {
            return None;
        }
        Some(Self {
            msgdate: format_timestamp(at),
            author: author.to_string(),
            message: body.to_string(),
        })
    }

    /// Decodes an inbound text frame.
    pub fn decode(frame: &str) -> Result<Self, ParseError> {
        let value: Value =
            serde_json::from_str(frame).map_err(|e| ParseError::NotJson(e.to_string()))?;
        let Value::Object(fields) = value else {
            return Err(ParseError::NotAnObject);
        };

        Ok(Self {
            msgdate: string_field(&fields, "msgdate")?,
            author: string_field(&fields, "author")?,
            message: string_field(&fields, "message")?,
        })
    }

    /// Encodes the message as a JSON text frame.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

fn string_field(fields: &Map<String, Value>, name: &'static str) -> Result<String, ParseError> {
    match fields.get(name) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(ParseError::WrongType(name)),
        None => Err(ParseError::MissingField(name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn test_timestamp_is_zero_padded() {
        assert_eq!(format_timestamp(at(4, 5, 9)), "[04:05:09]");
        assert_eq!(format_timestamp(at(23, 59, 0)), "[23:59:00]");
    }

    #[test]
    fn test_outbound_wire_format() {
        let msg = ChannelMessage::outbound("alice", "hi", at(14, 5, 9)).unwrap();
        assert_eq!(
            msg.encode().unwrap(),
            r#"{"msgdate":"[14:05:09]","author":"alice","message":"hi"}"#
        );
    }

    #[test]
    fn test_outbound_requires_author_and_body() {
        assert!(ChannelMessage::outbound("", "hi", at(1, 2, 3)).is_none());
        assert!(ChannelMessage::outbound("alice", "", at(1, 2, 3)).is_none());
        assert!(ChannelMessage::outbound("", "", at(1, 2, 3)).is_none());
    }

    #[test]
    fn test_decode_valid_frame() {
        let msg = ChannelMessage::decode(
            r#"{"msgdate":"[10:00:00]","author":"bob","message":"hello there"}"#,
        )
        .unwrap();
        assert_eq!(msg.msgdate, "[10:00:00]");
        assert_eq!(msg.author, "bob");
        assert_eq!(msg.message, "hello there");
    }

    #[test]
    fn test_decode_ignores_extra_fields() {
        let msg = ChannelMessage::decode(
            r#"{"msgdate":"x","author":"a","message":"m","color":"red"}"#,
        )
        .unwrap();
        assert_eq!(msg.message, "m");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            ChannelMessage::decode("not json at all"),
            Err(ParseError::NotJson(_))
        ));
        assert_eq!(
            ChannelMessage::decode(r#"["msgdate","author"]"#),
            Err(ParseError::NotAnObject)
        );
    }

    #[test]
    fn test_decode_reports_the_offending_field() {
        assert_eq!(
            ChannelMessage::decode(r#"{"msgdate":"x","message":"m"}"#),
            Err(ParseError::MissingField("author"))
        );
        assert_eq!(
            ChannelMessage::decode(r#"{"msgdate":"x","author":"a","message":42}"#),
            Err(ParseError::WrongType("message"))
        );
    }
}
