use crate::{api, service::notifications_store::ReconcileSummary};
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SyncService: Send + Sync {
    ///
    /// Fetch notifications from the backend and merge them into the store.
    /// Covers events missed while the push connection was down.
    ///
    /// ### Errors
    /// - [api::Error] when notifications could not be fetched, store is left untouched
    ///
    async fn sync(&self) -> Result<ReconcileSummary, api::Error>;
}
