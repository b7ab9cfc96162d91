use super::SyncService;
use socket_client::ConnectionState;
use std::sync::Arc;
use tokio::sync::{watch, Notify};

///
/// Task that synchronizes notifications every time the push connection
/// becomes connected, including the first time.
///
pub struct SyncServiceResyncTask {
    sync_service: Arc<dyn SyncService>,
    state_rx: watch::Receiver<ConnectionState>,
}

impl SyncServiceResyncTask {
    pub fn new(
        sync_service: Arc<dyn SyncService>,
        state_rx: watch::Receiver<ConnectionState>,
    ) -> Self {
        Self {
            sync_service,
            state_rx,
        }
    }

    #[tracing::instrument(name = "Resync Task", skip_all)]
    pub async fn run(mut self, close_notify: Arc<Notify>) {
        tokio::select! {
            biased;

            // Wait for signal to close
            _ = close_notify.notified() => {},

            // Sync after every transition to connected state
            _ = async { loop {
                let connected = self
                    .state_rx
                    .wait_for(|state| *state == ConnectionState::Connected)
                    .await
                    .is_ok();
                if !connected {
                    tracing::debug!("connection dropped, stopping");
                    break;
                }

                match self.sync_service.sync().await {
                    Ok(summary) => tracing::debug!(?summary, "resynchronized"),
                    Err(err) => tracing::warn!(%err, "failed to resynchronize"),
                }

                let disconnected = self
                    .state_rx
                    .wait_for(|state| *state != ConnectionState::Connected)
                    .await
                    .is_ok();
                if !disconnected {
                    tracing::debug!("connection dropped, stopping");
                    break;
                }
            }} => {}
        }
    }
}
