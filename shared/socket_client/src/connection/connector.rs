use crate::error::Error;
use async_trait::async_trait;
use futures::{Sink, Stream, StreamExt};
use std::pin::Pin;
use tokio_tungstenite::{connect_async, tungstenite};

pub type WebSocketSink = Pin<Box<dyn Sink<tungstenite::Message, Error = tungstenite::Error> + Send>>;
pub type WebSocketStream =
    Pin<Box<dyn Stream<Item = Result<tungstenite::Message, tungstenite::Error>> + Send>>;

///
/// Opens transport connections for [super::SocketConnection]
///
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, endpoint: &str) -> Result<(WebSocketSink, WebSocketStream), Error>;
}

pub struct WebSocketConnector;

#[async_trait]
impl Connector for WebSocketConnector {
    async fn connect(&self, endpoint: &str) -> Result<(WebSocketSink, WebSocketStream), Error> {
        let url = socket_io_url(endpoint)?;
        tracing::debug!(url, "opening websocket");

        let (websocket, _) = connect_async(url.as_str()).await?;
        let (sink, stream) = websocket.split();

        Ok((Box::pin(sink), Box::pin(stream)))
    }
}

///
/// Converts base url of the push server into url of its Engine.IO websocket transport.
/// Query of the endpoint is appended after the transport parameters.
///
/// ### Errors
/// - [Error::InvalidEndpoint] when scheme is not one of http, https, ws, wss,
///   host is missing or endpoint carries a path or fragment
///
pub fn socket_io_url(endpoint: &str) -> Result<String, Error> {
    let (scheme, rest) = endpoint
        .split_once("://")
        .ok_or_else(|| Error::InvalidEndpoint(format!("{endpoint}: missing scheme")))?;

    let scheme = match scheme {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        other => {
            return Err(Error::InvalidEndpoint(format!(
                "{endpoint}: unsupported scheme {other}"
            )))
        }
    };

    if rest.contains('#') {
        return Err(Error::InvalidEndpoint(format!("{endpoint}: fragment not allowed")));
    }

    let (rest, query) = match rest.split_once('?') {
        Some((rest, query)) => (rest, query),
        None => (rest, ""),
    };
    let (host, path) = match rest.split_once('/') {
        Some((host, path)) => (host, path),
        None => (rest, ""),
    };
    if host.is_empty() {
        return Err(Error::InvalidEndpoint(format!("{endpoint}: missing host")));
    }
    // Path would select a namespace other than the main one
    if !path.trim_end_matches('/').is_empty() {
        return Err(Error::InvalidEndpoint(format!("{endpoint}: path not supported")));
    }

    let mut url = format!("{scheme}://{host}/socket.io/?EIO=4&transport=websocket");
    if !query.is_empty() {
        url.push('&');
        url.push_str(query);
    }

    Ok(url)
}
