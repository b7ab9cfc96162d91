//!
//! Text framing of Engine.IO v4 packets and the Socket.IO packets carried inside them.
//!
//! Every websocket text frame holds one Engine.IO packet. Its first character is the
//! Engine.IO type, Socket.IO packets travel inside Engine.IO `message` packets (`4`)
//! and start with their own type character (`42["event",{...}]`).
//!

use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

///
/// Payload of the Engine.IO `open` packet sent by the server right after the upgrade
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenPayload {
    pub sid: String,

    /// Milliseconds between server pings
    pub ping_interval: u64,

    /// Milliseconds the server waits for a pong
    pub ping_timeout: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Packet {
    Open(OpenPayload),
    Close,
    Ping,
    Pong,
    Noop,

    /// Socket.IO namespace connect. Server acknowledges with the socket id.
    Connect(Option<String>),
    Disconnect,
    Event {
        name: String,
        payload: Value,
    },
    ConnectError(String),
}

impl Packet {
    pub fn event(name: impl Into<String>, payload: Value) -> Self {
        Self::Event {
            name: name.into(),
            payload,
        }
    }

    pub fn decode(text: &str) -> anyhow::Result<Self> {
        let mut chars = text.chars();
        let kind = chars.next().ok_or_else(|| anyhow!("empty packet"))?;
        let body = chars.as_str();

        match kind {
            '0' => {
                let open = serde_json::from_str(body).context("invalid open payload")?;
                Ok(Self::Open(open))
            }
            '1' => Ok(Self::Close),
            '2' => Ok(Self::Ping),
            '3' => Ok(Self::Pong),
            '4' => Self::decode_message(body),
            '6' => Ok(Self::Noop),
            other => Err(anyhow!("unsupported engine.io packet type '{other}'")),
        }
    }

    fn decode_message(body: &str) -> anyhow::Result<Self> {
        let mut chars = body.chars();
        let kind = chars
            .next()
            .ok_or_else(|| anyhow!("empty socket.io packet"))?;
        let data = strip_namespace(chars.as_str());

        match kind {
            '0' => {
                if data.is_empty() {
                    return Ok(Self::Connect(None));
                }
                let value = serde_json::from_str::<Value>(data).context("invalid connect payload")?;
                let sid = value.get("sid").and_then(Value::as_str).map(str::to_owned);
                Ok(Self::Connect(sid))
            }
            '1' => Ok(Self::Disconnect),
            '2' => decode_event(data),
            '4' => {
                let message = match serde_json::from_str::<Value>(data) {
                    Ok(Value::String(message)) => message,
                    Ok(Value::Object(object)) => object
                        .get("message")
                        .and_then(Value::as_str)
                        .unwrap_or(data)
                        .to_owned(),
                    _ => data.to_owned(),
                };
                Ok(Self::ConnectError(message))
            }
            other => Err(anyhow!("unsupported socket.io packet type '{other}'")),
        }
    }

    pub fn encode(&self) -> String {
        match self {
            Self::Open(open) => format!(
                "0{}",
                json!({
                    "sid": open.sid,
                    "pingInterval": open.ping_interval,
                    "pingTimeout": open.ping_timeout,
                })
            ),
            Self::Close => "1".to_owned(),
            Self::Ping => "2".to_owned(),
            Self::Pong => "3".to_owned(),
            Self::Noop => "6".to_owned(),
            Self::Connect(None) => "40".to_owned(),
            Self::Connect(Some(sid)) => format!("40{}", json!({ "sid": sid })),
            Self::Disconnect => "41".to_owned(),
            Self::Event { name, payload } => format!("42{}", json!([name, payload])),
            Self::ConnectError(message) => format!("44{}", json!({ "message": message })),
        }
    }
}

fn strip_namespace(data: &str) -> &str {
    if !data.starts_with('/') {
        return data;
    }

    match data.split_once(',') {
        Some((_, rest)) => rest,
        None => "",
    }
}

fn decode_event(data: &str) -> anyhow::Result<Packet> {
    // Events that expect an acknowledgement carry its id before the array
    let data = data.trim_start_matches(|c: char| c.is_ascii_digit());

    let items = serde_json::from_str::<Vec<Value>>(data).context("invalid event payload")?;
    let mut items = items.into_iter();
    let name = match items.next() {
        Some(Value::String(name)) => name,
        Some(_) => anyhow::bail!("event name is not a string"),
        None => anyhow::bail!("event without name"),
    };
    let payload = items.next().unwrap_or(Value::Null);

    Ok(Packet::Event { name, payload })
}
