use super::ApplicationEnv;
use crate::{
    api::{NotificationsApiConfig, NotificationsApiImpl},
    service::{
        mutations_service::{MutationsService, MutationsServiceConfig, MutationsServiceImpl},
        notifications_store::{NotificationsStore, NotificationsStoreConfig, NotificationsStoreImpl},
        push_events_service::PushEventsService,
        sync_service::{SyncService, SyncServiceImpl, SyncServiceResyncTask},
    },
};
use socket_client::{SocketConnection, SocketConnectionConfig, WebSocketConnector};
use std::{future::Future, sync::Arc};
use tokio::{sync::Notify, task::JoinHandle};

#[derive(Clone)]
pub struct ApplicationState {
    pub recipient_id: String,
    pub connection: SocketConnection,
    pub notifications_store: Arc<dyn NotificationsStore>,
    pub mutations_service: Arc<dyn MutationsService>,
    pub sync_service: Arc<dyn SyncService>,
}

pub struct ApplicationStateToClose {
    pub connection: SocketConnection,
    pub push_events_service: PushEventsService,
    pub resync_task: BackgroundTask,
    pub garbage_collector: BackgroundTask,
}

///
/// Task spawned at startup that runs until it is notified to close
///
pub struct BackgroundTask {
    handle: JoinHandle<()>,
    close_notify: Arc<Notify>,
}

impl BackgroundTask {
    pub fn spawn<F, Fut>(run: F) -> Self
    where
        F: FnOnce(Arc<Notify>) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let close_notify = Arc::new(Notify::new());
        let handle = tokio::spawn(run(Arc::clone(&close_notify)));

        Self {
            handle,
            close_notify,
        }
    }

    pub async fn close(self) {
        self.close_notify.notify_one();
        if let Err(err) = self.handle.await {
            tracing::error!(%err, "background task failed");
        }
    }
}

pub async fn create_state(
    env: &ApplicationEnv,
) -> anyhow::Result<(ApplicationState, ApplicationStateToClose)> {
    tracing::info!("creating http client");
    let http_client = reqwest::Client::builder()
        .timeout(env.request_timeout)
        .build()?;

    let config = NotificationsApiConfig {
        base_url: env.api_base_url.clone(),
    };
    let notifications_api = NotificationsApiImpl::new(config, http_client);
    let notifications_api = Arc::new(notifications_api);

    tracing::info!("creating notifications store");
    let config = NotificationsStoreConfig {
        tombstone_lifespan: env.tombstone_lifespan,
        garbage_collector_interval: env.garbage_collector_interval,
    };
    let notifications_store = NotificationsStoreImpl::new(config);
    let garbage_collector = notifications_store.garbage_collector();
    let garbage_collector =
        BackgroundTask::spawn(|close_notify| garbage_collector.run(close_notify));
    let notifications_store = Arc::new(notifications_store);

    tracing::info!("creating push connection");
    let config = SocketConnectionConfig {
        endpoint: env.websocket_url.clone(),
        reconnect_base_delay: env.reconnect_base_delay,
        reconnect_max_delay: env.reconnect_max_delay,
        reconnect_max_attempts: env.reconnect_max_attempts,
        ..Default::default()
    };
    let connection = SocketConnection::new(config, Arc::new(WebSocketConnector));

    tracing::info!("creating services");
    let push_events_service =
        PushEventsService::new(connection.clone(), notifications_store.clone());

    let config = MutationsServiceConfig {
        recipient_id: env.recipient_id.clone(),
        request_timeout: env.request_timeout,
    };
    let mutations_service = MutationsServiceImpl::new(
        config,
        notifications_api.clone(),
        notifications_store.clone(),
    );
    let mutations_service = Arc::new(mutations_service);

    let sync_service = SyncServiceImpl::new(notifications_api, notifications_store.clone());
    let sync_service = Arc::new(sync_service);

    let resync_task = SyncServiceResyncTask::new(sync_service.clone(), connection.state());
    let resync_task = BackgroundTask::spawn(|close_notify| resync_task.run(close_notify));

    Ok((
        ApplicationState {
            recipient_id: env.recipient_id.clone(),
            connection: connection.clone(),
            notifications_store,
            mutations_service,
            sync_service,
        },
        ApplicationStateToClose {
            connection,
            push_events_service,
            resync_task,
            garbage_collector,
        },
    ))
}
