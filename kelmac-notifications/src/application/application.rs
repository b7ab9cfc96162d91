use super::ApplicationState;
use socket_client::ConnectionState;
use std::future::Future;

///
/// Keeps notifications of the recipient in sync until shutdown completes
///
#[tracing::instrument(name = "Application", skip_all, fields(recipient_id = %state.recipient_id))]
pub async fn run(state: ApplicationState, shutdown: impl Future<Output = ()>) {
    let mut changes_rx = state.notifications_store.changes();
    let mut connection_rx = state.connection.state();

    tracing::info!("connecting to push server");
    state.connection.connect().await;

    if let Err(err) = state.sync_service.sync().await {
        tracing::warn!(%err, "initial synchronization failed");
    }
    log_unread_count(&state).await;

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            biased;

            _ = &mut shutdown => break,

            changed = changes_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                log_unread_count(&state).await;
            }

            changed = connection_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let connection_state = *connection_rx.borrow_and_update();
                if connection_state == ConnectionState::Unavailable {
                    tracing::warn!("push server unavailable, notifications may be outdated");
                }
            }
        }
    }
}

async fn log_unread_count(state: &ApplicationState) {
    let unread = state
        .notifications_store
        .unread_count(&state.recipient_id)
        .await;
    let total = state.notifications_store.len().await;

    tracing::info!(unread, total, "notifications changed");
}
