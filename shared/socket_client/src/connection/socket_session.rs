use super::{
    connector::{WebSocketSink, WebSocketStream},
    event_handler::EventHandlers,
};
use crate::{error::Error, packet::Packet};
use futures::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::{
    sync::mpsc,
    time::{sleep_until, Instant},
};
use tokio_tungstenite::tungstenite::Message;

///
/// One established transport connection.
/// Session ends with an error as soon as the transport fails.
///
pub struct SocketSession {
    sink: WebSocketSink,
    stream: WebSocketStream,

    heartbeat_timeout: Duration,
    heartbeat_deadline: Instant,
}

impl SocketSession {
    ///
    /// Performs Engine.IO open and Socket.IO connect handshake on a fresh transport.
    ///
    /// ### Returns
    /// session and socket id assigned by the server
    ///
    /// ### Errors
    /// - [Error::Handshake] when server rejects connection
    /// - [Error::Closed] when transport closes before handshake completes
    /// - [Error::WebSocket] on transport failure
    ///
    pub async fn handshake(
        sink: WebSocketSink,
        stream: WebSocketStream,
    ) -> Result<(Self, Option<String>), Error> {
        let mut session = Self {
            sink,
            stream,
            heartbeat_timeout: Duration::MAX,
            heartbeat_deadline: Instant::now(),
        };

        let open = loop {
            match session.next_packet().await? {
                Packet::Open(open) => break open,
                packet => tracing::trace!(?packet, "packet before open ignored"),
            }
        };
        tracing::debug!(
            sid = %open.sid,
            ping_interval = open.ping_interval,
            ping_timeout = open.ping_timeout,
            "transport opened"
        );

        session.heartbeat_timeout =
            Duration::from_millis(open.ping_interval.saturating_add(open.ping_timeout));
        session.send(Packet::Connect(None)).await?;

        let socket_id = loop {
            match session.next_packet().await? {
                Packet::Connect(socket_id) => break socket_id,
                Packet::ConnectError(message) => return Err(Error::Handshake(message)),
                Packet::Ping => session.send(Packet::Pong).await?,
                Packet::Close => return Err(Error::Closed("server closed transport")),
                packet => tracing::trace!(?packet, "packet before connect ignored"),
            }
        };
        session.heartbeat_deadline = Instant::now() + session.heartbeat_timeout;

        Ok((session, socket_id))
    }

    ///
    /// Processes incomming packets and sends outgoing ones until the transport fails.
    ///
    pub async fn run(
        &mut self,
        outgoing_rx: &mut mpsc::UnboundedReceiver<Packet>,
        handlers: &EventHandlers,
    ) -> Result<(), Error> {
        loop {
            tokio::select! {
                biased;

                // Server pings regularly, silence means the connection is dead
                _ = sleep_until(self.heartbeat_deadline) => {
                    return Err(Error::Closed("heartbeat timed out"));
                }

                packet = self.next_packet() => {
                    self.heartbeat_deadline = Instant::now() + self.heartbeat_timeout;
                    self.process_packet(packet?, handlers).await?;
                }

                Some(packet) = outgoing_rx.recv() => {
                    self.send(packet).await?;
                }
            }
        }
    }

    async fn process_packet(&mut self, packet: Packet, handlers: &EventHandlers) -> Result<(), Error> {
        match packet {
            Packet::Ping => {
                tracing::trace!("ping received");
                self.send(Packet::Pong).await?;
            }
            Packet::Event { name, payload } => {
                tracing::debug!(event = name, "event received");
                handlers.dispatch(&name, payload).await;
                tracing::trace!(event = name, "event handled");
            }
            Packet::Close => return Err(Error::Closed("server closed transport")),
            Packet::Disconnect => return Err(Error::Closed("server disconnected socket")),
            packet => tracing::trace!(?packet, "packet ignored"),
        }

        Ok(())
    }

    pub async fn send(&mut self, packet: Packet) -> Result<(), Error> {
        self.sink.send(Message::Text(packet.encode())).await?;

        Ok(())
    }

    ///
    /// Reads frames until one of them holds a valid packet.
    /// Frames that can't be decoded are skipped.
    ///
    async fn next_packet(&mut self) -> Result<Packet, Error> {
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => match Packet::decode(&text) {
                    Ok(packet) => return Ok(packet),
                    Err(err) => tracing::warn!(%err, "invalid packet skipped"),
                },
                Some(Ok(Message::Close(_))) => return Err(Error::Closed("received close frame")),
                Some(Ok(_)) => tracing::trace!("non-text frame skipped"),
                Some(Err(err)) => return Err(Error::WebSocket(err)),
                None => return Err(Error::Closed("stream ended")),
            }
        }
    }

    ///
    /// Disconnects socket and closes the transport
    ///
    pub async fn close(mut self) {
        if let Err(err) = self.send(Packet::Disconnect).await {
            tracing::debug!(%err, "failed to send disconnect");
        }

        match self.sink.close().await {
            Ok(()) => tracing::debug!("transport closed"),
            Err(err) => tracing::debug!(%err, "failed to close transport"),
        }
    }
}
