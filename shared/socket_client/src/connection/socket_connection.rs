use super::{
    connector::Connector,
    dto::{ConnectionState, SocketConnectionConfig},
    event_handler::{EventHandlers, SocketEventHandler, SubscriptionId},
    state_machine::StateMachine,
};
use crate::packet::Packet;
use serde_json::json;
use std::sync::{Arc, PoisonError};
use tokio::{
    sync::{mpsc, watch, Mutex, Notify},
    task::JoinHandle,
};

///
/// Logical connection with the push server.
/// It runs background task that reconnects whenever the transport fails
/// until reconnection attempts are exhausted.
///
/// Clones share the same underlying connection, so connecting twice never opens
/// a second transport. Current state can be observed by [Self::state].
///
#[derive(Clone)]
pub struct SocketConnection {
    inner: Arc<SocketConnectionInner>,
}

struct SocketConnectionInner {
    config: Arc<SocketConnectionConfig>,
    connector: Arc<dyn Connector>,
    handlers: Arc<EventHandlers>,

    state_tx: Arc<watch::Sender<ConnectionState>>,
    outgoing_tx: std::sync::Mutex<Option<mpsc::UnboundedSender<Packet>>>,

    task: Mutex<Option<ConnectionTask>>,
}

struct ConnectionTask {
    handle: JoinHandle<()>,
    close_notify: Arc<Notify>,
}

impl SocketConnection {
    pub fn new(config: SocketConnectionConfig, connector: Arc<dyn Connector>) -> Self {
        let (state_tx, _) = watch::channel(ConnectionState::Disconnected);

        Self {
            inner: Arc::new(SocketConnectionInner {
                config: Arc::new(config),
                connector,
                handlers: Arc::new(EventHandlers::default()),
                state_tx: Arc::new(state_tx),
                outgoing_tx: std::sync::Mutex::new(None),
                task: Mutex::new(None),
            }),
        }
    }

    ///
    /// Starts background task that keeps the connection alive.
    /// When the task is already running nothing happens.
    ///
    /// ### Returns
    /// handle of the same connection
    ///
    #[tracing::instrument(
        name = "Socket Connection",
        target = "socket_client::connection",
        skip_all
    )]
    pub async fn connect(&self) -> Self {
        let mut task = self.inner.task.lock().await;

        if let Some(running) = task.as_ref() {
            let unavailable = *self.inner.state_tx.borrow() == ConnectionState::Unavailable;
            if !unavailable && !running.handle.is_finished() {
                tracing::debug!("connection already running");
                return self.clone();
            }
        }

        tracing::info!("starting connection task");
        let (outgoing_tx, outgoing_rx) = mpsc::unbounded_channel();
        *self
            .inner
            .outgoing_tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(outgoing_tx);

        let close_notify = Arc::new(Notify::new());
        let state_machine = StateMachine::new(
            Arc::clone(&self.inner.config),
            Arc::clone(&self.inner.connector),
            Arc::clone(&self.inner.handlers),
            Arc::clone(&self.inner.state_tx),
            outgoing_rx,
        );

        let close_notify_clone = Arc::clone(&close_notify);
        let handle = tokio::spawn(async move {
            state_machine.run(close_notify_clone).await;
        });

        *task = Some(ConnectionTask {
            handle,
            close_notify,
        });

        self.clone()
    }

    ///
    /// Closes the transport and stops reconnecting.
    /// Connection can be started again with [Self::connect].
    ///
    #[tracing::instrument(
        name = "Socket Connection",
        target = "socket_client::connection",
        skip_all
    )]
    pub async fn close(&self) {
        let task = self.inner.task.lock().await.take();
        self.inner
            .outgoing_tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(task) = task {
            tracing::info!("stopping connection task");
            task.close_notify.notify_one();
            if let Err(err) = task.handle.await {
                tracing::error!(%err, "connection task failed");
            }
        }

        self.inner.state_tx.send_replace(ConnectionState::Disconnected);
    }

    pub fn state(&self) -> watch::Receiver<ConnectionState> {
        self.inner.state_tx.subscribe()
    }

    ///
    /// Registers handler of the named event.
    /// Subscriptions survive reconnections.
    ///
    pub fn subscribe(&self, event: &str, handler: Arc<dyn SocketEventHandler>) -> SubscriptionId {
        tracing::debug!(event, "subscribing to event");
        self.inner.handlers.subscribe(event, handler)
    }

    ///
    /// ### Returns
    /// `true` when subscription existed
    ///
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.handlers.unsubscribe(id)
    }

    ///
    /// Emits `ping` event with the message. Server answers with a `pong` event.
    /// Message is dropped when the connection is not established.
    ///
    pub fn send_ping(&self, message: &str) {
        if *self.inner.state_tx.borrow() != ConnectionState::Connected {
            tracing::debug!("not connected, ping dropped");
            return;
        }

        let outgoing_tx = self
            .inner
            .outgoing_tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let Some(outgoing_tx) = outgoing_tx.as_ref() else {
            tracing::debug!("connection task not running, ping dropped");
            return;
        };

        let packet = Packet::event("ping", json!({ "message": message }));
        if outgoing_tx.send(packet).is_err() {
            tracing::debug!("connection task finished, ping dropped");
        }
    }
}
