use super::SyncService;
use crate::{
    api::{self, NotificationsApi},
    service::notifications_store::{NotificationsStore, ReconcileSummary},
};
use async_trait::async_trait;
use std::sync::Arc;

pub struct SyncServiceImpl {
    api: Arc<dyn NotificationsApi>,
    store: Arc<dyn NotificationsStore>,
}

impl SyncServiceImpl {
    pub fn new(api: Arc<dyn NotificationsApi>, store: Arc<dyn NotificationsStore>) -> Self {
        Self { api, store }
    }
}

#[async_trait]
impl SyncService for SyncServiceImpl {
    #[tracing::instrument(name = "Sync Notifications", skip_all)]
    async fn sync(&self) -> Result<ReconcileSummary, api::Error> {
        tracing::info!("synchronizing notifications");

        let snapshot = self.api.fetch_notifications().await?;
        let summary = self.store.reconcile(snapshot).await;

        tracing::info!(changed = summary.changed(), "notifications synchronized");

        Ok(summary)
    }
}
