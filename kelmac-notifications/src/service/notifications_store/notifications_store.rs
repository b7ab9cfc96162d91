use super::{ApplyOutcome, OrderedNotifications, PreviousState, ReconcileSummary, StoreEvent};
use crate::model::Notification;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::watch;

///
/// Client side cache of notifications.
///
/// Every operation waits for the same fair lock,
/// so writes are applied one by one in order of arrival.
///
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationsStore: Send + Sync {
    ///
    /// Merge notifications fetched from the backend.
    /// Notifications missing in the snapshot are kept.
    ///
    async fn reconcile(&self, snapshot: Vec<Notification>) -> ReconcileSummary;

    ///
    /// Apply event received from the push server or confirmed by the backend
    ///
    async fn apply(&self, event: StoreEvent) -> ApplyOutcome;

    ///
    /// Optimistically mark notification as read by the recipient.
    ///
    /// ### Returns
    /// state to pass to [NotificationsStore::rollback] or `None` when notification is unknown
    ///
    async fn mark_read(&self, id: &str, recipient_id: &str) -> Option<PreviousState>;

    ///
    /// Optimistically mark every notification unread by the recipient as read
    ///
    async fn mark_all_read(&self, recipient_id: &str) -> Vec<PreviousState>;

    ///
    /// Undo optimistic write unless notification was replaced or deleted since.
    ///
    /// ### Returns
    /// `true` when notification was restored
    ///
    async fn rollback(&self, previous: PreviousState) -> bool;

    ///
    /// Undo many optimistic writes at once
    ///
    /// ### Returns
    /// number of restored notifications
    ///
    async fn rollback_all(&self, previous: Vec<PreviousState>) -> usize;

    async fn unread_count(&self, recipient_id: &str) -> usize;

    async fn ordered(&self, recipient_id: &str) -> OrderedNotifications;

    async fn get(&self, id: &str) -> Option<Arc<Notification>>;

    async fn len(&self) -> usize;

    ///
    /// Receiver notified whenever stored notifications change
    ///
    fn changes(&self) -> watch::Receiver<u64>;
}
