use super::{MutationsService, MutationsServiceConfig};
use crate::{
    api::{self, NotificationsApi},
    error::Error,
    service::notifications_store::{NotificationsStore, StoreEvent},
};
use async_trait::async_trait;
use std::{future::Future, sync::Arc};
use tokio::time::timeout;

pub struct MutationsServiceImpl {
    config: MutationsServiceConfig,
    api: Arc<dyn NotificationsApi>,
    store: Arc<dyn NotificationsStore>,
}

impl MutationsServiceImpl {
    pub fn new(
        config: MutationsServiceConfig,
        api: Arc<dyn NotificationsApi>,
        store: Arc<dyn NotificationsStore>,
    ) -> Self {
        Self { config, api, store }
    }

    async fn request<T>(
        &self,
        request: impl Future<Output = Result<T, api::Error>>,
    ) -> Result<T, Error> {
        let result = timeout(self.config.request_timeout, request)
            .await
            .map_err(|_| Error::Timeout)?;

        Ok(result?)
    }
}

#[async_trait]
impl MutationsService for MutationsServiceImpl {
    #[tracing::instrument(name = "Mark As Read", skip_all, fields(id = %id))]
    async fn mark_as_read(&self, id: &str) -> Result<(), Error> {
        tracing::info!("marking notification as read");

        let previous = self
            .store
            .mark_read(id, &self.config.recipient_id)
            .await
            .ok_or(Error::NotificationNotExist)?;

        match self.request(self.api.mark_as_read(id)).await {
            Ok(Some(notification)) => {
                let outcome = self.store.apply(StoreEvent::Updated(notification)).await;
                tracing::info!(%outcome, "marked notification as read");
                Ok(())
            }
            Ok(None) => {
                tracing::warn!("confirmed without notification, keeping optimistic change");
                Ok(())
            }
            Err(err) => {
                tracing::warn!(%err, "failed to mark notification as read");
                let restored = self.store.rollback(previous).await;
                tracing::info!(restored, "optimistic change reverted");
                Err(err)
            }
        }
    }

    #[tracing::instrument(name = "Mark All As Read", skip_all)]
    async fn mark_all_as_read(&self) -> Result<usize, Error> {
        tracing::info!("marking all notifications as read");

        let previous = self.store.mark_all_read(&self.config.recipient_id).await;
        let count = previous.len();

        match self.request(self.api.mark_all_as_read()).await {
            Ok(message) => {
                tracing::info!(count, response = message.as_deref(), "marked all notifications as read");
                Ok(count)
            }
            Err(err) => {
                tracing::warn!(%err, "failed to mark all notifications as read");
                let restored = self.store.rollback_all(previous).await;
                tracing::info!(restored, "optimistic changes reverted");
                Err(err)
            }
        }
    }

    #[tracing::instrument(name = "Delete Notification", skip_all, fields(id = %id, recipient_id = %recipient_id))]
    async fn delete_notification(&self, id: &str, recipient_id: &str) -> Result<(), Error> {
        tracing::info!("deleting notification");

        if recipient_id.trim().is_empty() {
            return Err(Error::Validation("recipient id is empty"));
        }

        let message = self
            .request(self.api.delete_notification(id, recipient_id))
            .await
            .inspect_err(|err| tracing::warn!(%err, "failed to delete notification"))?;

        let outcome = self
            .store
            .apply(StoreEvent::Deleted(id.to_string()))
            .await;
        tracing::info!(%outcome, response = message.as_deref(), "deleted notification");

        Ok(())
    }
}
