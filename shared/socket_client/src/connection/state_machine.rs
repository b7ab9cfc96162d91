use super::{
    connector::Connector, event_handler::EventHandlers, socket_session::SocketSession,
    ConnectionState, SocketConnectionConfig,
};
use crate::{error::Error, packet::Packet, retry::Backoff};
use std::sync::Arc;
use tokio::{
    sync::{mpsc, watch, Notify},
    time::{sleep, timeout},
};

pub struct StateMachine {
    config: Arc<SocketConnectionConfig>,
    connector: Arc<dyn Connector>,
    handlers: Arc<EventHandlers>,

    state_tx: Arc<watch::Sender<ConnectionState>>,
    outgoing_rx: mpsc::UnboundedReceiver<Packet>,

    session: Option<SocketSession>,
    backoff: Backoff,

    state: State,
}

impl StateMachine {
    pub fn new(
        config: Arc<SocketConnectionConfig>,
        connector: Arc<dyn Connector>,
        handlers: Arc<EventHandlers>,
        state_tx: Arc<watch::Sender<ConnectionState>>,
        outgoing_rx: mpsc::UnboundedReceiver<Packet>,
    ) -> Self {
        let backoff = Backoff::new(
            config.reconnect_base_delay,
            config.reconnect_max_delay,
            config.reconnect_max_attempts,
        );

        Self {
            config,
            connector,
            handlers,
            state_tx,
            outgoing_rx,
            session: None,
            backoff,
            state: State::Connecting,
        }
    }

    ///
    /// Loop that keeps connection alive until reconnection attempts are exhausted.
    /// Loop can be stopped by using notify.
    ///
    #[tracing::instrument(
        name = "Socket Connection",
        target = "socket_client::connection",
        skip_all,
        fields(endpoint = %self.config.endpoint)
    )]
    pub async fn run(mut self, stop: Arc<Notify>) {
        tracing::info!("state machine started");

        tokio::select! {
            biased;

            _ = stop.notified() => {
                if let Some(session) = self.session.take() {
                    tracing::info!("closing connection");
                    session.close().await;
                }
                self.publish(ConnectionState::Disconnected);
            }

            _ = async { loop {
                match self.state {
                    State::Connecting => {
                        tracing::info!("state: Connecting");
                        self.publish(ConnectionState::Connecting);
                        self.connecting_state().await;
                    }
                    State::Connected => {
                        tracing::info!("state: Connected");
                        self.publish(ConnectionState::Connected);
                        self.connected_state().await;
                    }
                    State::WaitingToReconnect => {
                        tracing::info!("state: WaitingToReconnect");
                        self.publish(ConnectionState::Disconnected);
                        self.waiting_to_reconnect_state().await;
                    }
                    State::Unavailable => {
                        tracing::info!("state: Unavailable");
                        self.publish(ConnectionState::Unavailable);
                        break;
                    }
                }
            }} => {}
        }

        tracing::info!("state machine finished");
    }

    async fn connecting_state(&mut self) {
        let attempt = timeout(self.config.handshake_timeout, async {
            let (sink, stream) = self.connector.connect(&self.config.endpoint).await?;
            SocketSession::handshake(sink, stream).await
        })
        .await
        .unwrap_or(Err(Error::Closed("handshake timed out")));

        match attempt {
            Ok((session, socket_id)) => {
                tracing::info!(?socket_id, "connection established");

                // Packets queued while there was no connection are outdated
                while self.outgoing_rx.try_recv().is_ok() {}

                self.session = Some(session);
                self.backoff.reset();
                self.state = State::Connected;
            }
            Err(err) => {
                tracing::warn!(attempt = self.backoff.attempt(), %err, "failed to connect");
                self.state = State::WaitingToReconnect;
            }
        }
    }

    async fn connected_state(&mut self) {
        let Some(session) = self.session.as_mut() else {
            self.state = State::WaitingToReconnect;
            return;
        };

        if let Err(err) = session.run(&mut self.outgoing_rx, &self.handlers).await {
            tracing::warn!(%err, "connection lost");
        }

        if let Some(session) = self.session.take() {
            session.close().await;
        }

        self.state = State::WaitingToReconnect;
    }

    async fn waiting_to_reconnect_state(&mut self) {
        match self.backoff.next_delay() {
            Some(delay) => {
                tracing::info!(
                    attempt = self.backoff.attempt(),
                    delay_ms = delay.as_millis() as u64,
                    "reconnecting"
                );
                sleep(delay).await;
                self.state = State::Connecting;
            }
            None => {
                tracing::warn!(
                    attempts = self.backoff.attempt(),
                    "reconnection attempts exhausted"
                );
                self.state = State::Unavailable;
            }
        }
    }

    fn publish(&self, state: ConnectionState) {
        let previous = self.state_tx.send_replace(state);
        if previous != state {
            tracing::info!(from = %previous, to = %state, "connection state changed");
        }
    }
}

enum State {
    Connecting,
    Connected,
    WaitingToReconnect,
    Unavailable,
}
