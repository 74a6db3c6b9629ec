//! Socket.IO over Engine.IO v4 text frames, the subset a listen-only client needs.
//!
//! An Engine.IO frame is a single type digit followed by its payload. Type `4`
//! (message) carries a Socket.IO packet, itself a type digit, an optional
//! `/namespace,` prefix, an optional numeric ack id and a JSON payload.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Reply to a server ping.
pub const PONG: &str = "3";
/// Join the default namespace after the Engine.IO handshake.
pub const CONNECT_DEFAULT_NS: &str = "40";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Handshake {
    pub sid: String,
    #[serde(default)]
    pub ping_interval: u64,
    #[serde(default)]
    pub ping_timeout: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    Open(Handshake),
    Close,
    Ping,
    Pong,
    Noop,
    /// Namespace join acknowledged.
    Connected,
    Disconnected,
    ConnectError(String),
    Event { name: String, data: Value },
    /// Acks and binary packets; a sink has no use for them.
    Unsupported(char),
}

#[derive(Debug, Error)]
pub enum WireError {
    #[error("empty frame")]
    Empty,
    #[error("unknown engine.io packet type {0:?}")]
    UnknownEngineType(char),
    #[error("empty socket.io packet")]
    EmptyPacket,
    #[error("bad json payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("event payload must be an array starting with the event name")]
    BadEvent,
}

pub fn decode(text: &str) -> Result<Frame, WireError> {
    let mut chars = text.chars();
    let kind = chars.next().ok_or(WireError::Empty)?;
    let rest = chars.as_str();
    match kind {
        '0' => Ok(Frame::Open(serde_json::from_str(rest)?)),
        '1' => Ok(Frame::Close),
        // ping/pong may carry a "probe" payload during upgrades; irrelevant here
        '2' => Ok(Frame::Ping),
        '3' => Ok(Frame::Pong),
        '4' => decode_packet(rest),
        '6' => Ok(Frame::Noop),
        other => Err(WireError::UnknownEngineType(other)),
    }
}

fn decode_packet(packet: &str) -> Result<Frame, WireError> {
    let mut chars = packet.chars();
    let kind = chars.next().ok_or(WireError::EmptyPacket)?;
    let body = strip_ack_id(strip_namespace(chars.as_str()));
    match kind {
        '0' => Ok(Frame::Connected),
        '1' => Ok(Frame::Disconnected),
        '2' => decode_event(body),
        '4' => {
            let v: Value = if body.is_empty() {
                Value::Null
            } else {
                serde_json::from_str(body)?
            };
            let msg = match &v {
                Value::String(s) => s.clone(),
                Value::Object(o) => o
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                _ => String::new(),
            };
            Ok(Frame::ConnectError(msg))
        }
        other => Ok(Frame::Unsupported(other)),
    }
}

fn decode_event(body: &str) -> Result<Frame, WireError> {
    let v: Value = serde_json::from_str(body)?;
    let Value::Array(mut items) = v else {
        return Err(WireError::BadEvent);
    };
    if items.is_empty() {
        return Err(WireError::BadEvent);
    }
    let data = if items.len() > 1 {
        items.swap_remove(1)
    } else {
        Value::Null
    };
    match items.swap_remove(0) {
        Value::String(name) => Ok(Frame::Event { name, data }),
        _ => Err(WireError::BadEvent),
    }
}

// "/admin,[...]" -> "[...]"; the default namespace has no prefix
fn strip_namespace(s: &str) -> &str {
    if s.starts_with('/') {
        match s.find(',') {
            Some(i) => &s[i + 1..],
            None => "",
        }
    } else {
        s
    }
}

fn strip_ack_id(s: &str) -> &str {
    s.trim_start_matches(|c: char| c.is_ascii_digit())
}
