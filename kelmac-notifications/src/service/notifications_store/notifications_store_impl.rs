use super::{
    notifications_store_state::NotificationsStoreState, ApplyOutcome, NotificationsStore,
    NotificationsStoreConfig, NotificationsStoreGarbageCollector, OrderedNotifications,
    PreviousState, ReconcileSummary, StoreEvent,
};
use crate::model::Notification;
use async_trait::async_trait;
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::{watch, Mutex};

pub struct NotificationsStoreImpl {
    config: NotificationsStoreConfig,
    state: Arc<Mutex<NotificationsStoreState>>,
    changes_tx: watch::Sender<u64>,
}

impl NotificationsStoreImpl {
    pub fn new(config: NotificationsStoreConfig) -> Self {
        let state = NotificationsStoreState::default();
        let state = Arc::new(Mutex::new(state));
        let (changes_tx, _) = watch::channel(0);

        Self {
            config,
            state,
            changes_tx,
        }
    }

    ///
    /// Creates task that removes expired tombstones of this store
    ///
    pub fn garbage_collector(&self) -> NotificationsStoreGarbageCollector {
        NotificationsStoreGarbageCollector::new(self.config.clone(), Arc::clone(&self.state))
    }

    fn publish(&self, state: &NotificationsStoreState) {
        let revision = state.revision();
        self.changes_tx.send_if_modified(|current| {
            if *current == revision {
                return false;
            }
            *current = revision;
            true
        });
    }
}

#[async_trait]
impl NotificationsStore for NotificationsStoreImpl {
    #[tracing::instrument(name = "Notifications Store", skip_all, fields(len = snapshot.len()))]
    async fn reconcile(&self, snapshot: Vec<Notification>) -> ReconcileSummary {
        let mut state = self.state.lock().await;
        let summary = state.reconcile(snapshot);
        self.publish(&state);

        tracing::info!(
            inserted = summary.inserted,
            replaced = summary.replaced,
            unchanged = summary.unchanged,
            stale = summary.stale,
            tombstoned = summary.tombstoned,
            "snapshot reconciled"
        );

        summary
    }

    #[tracing::instrument(name = "Notifications Store", skip_all, fields(id = event.id()))]
    async fn apply(&self, event: StoreEvent) -> ApplyOutcome {
        let mut state = self.state.lock().await;
        let outcome = match event {
            StoreEvent::Created(notification) | StoreEvent::Updated(notification) => {
                state.upsert(notification)
            }
            StoreEvent::Deleted(id) => state.remove(&id, OffsetDateTime::now_utc()),
        };
        self.publish(&state);

        tracing::debug!(%outcome, "event applied");

        outcome
    }

    #[tracing::instrument(name = "Notifications Store", skip_all, fields(id = %id, recipient_id = %recipient_id))]
    async fn mark_read(&self, id: &str, recipient_id: &str) -> Option<PreviousState> {
        let mut state = self.state.lock().await;
        let previous = state.mark_read(id, recipient_id);
        self.publish(&state);

        tracing::debug!(known = previous.is_some(), "marked as read");

        previous
    }

    #[tracing::instrument(name = "Notifications Store", skip_all, fields(recipient_id = %recipient_id))]
    async fn mark_all_read(&self, recipient_id: &str) -> Vec<PreviousState> {
        let mut state = self.state.lock().await;
        let previous = state.mark_all_read(recipient_id);
        self.publish(&state);

        tracing::debug!(count = previous.len(), "marked all as read");

        previous
    }

    #[tracing::instrument(name = "Notifications Store", skip_all, fields(id = previous.id()))]
    async fn rollback(&self, previous: PreviousState) -> bool {
        let mut state = self.state.lock().await;
        let restored = state.rollback(previous);
        self.publish(&state);

        match restored {
            true => tracing::debug!("optimistic write rolled back"),
            false => tracing::debug!("notification changed since optimistic write, rollback skipped"),
        }

        restored
    }

    #[tracing::instrument(name = "Notifications Store", skip_all, fields(count = previous.len()))]
    async fn rollback_all(&self, previous: Vec<PreviousState>) -> usize {
        let mut state = self.state.lock().await;
        let restored = previous
            .into_iter()
            .map(|previous| state.rollback(previous))
            .filter(|restored| *restored)
            .count();
        self.publish(&state);

        tracing::debug!(restored, "optimistic writes rolled back");

        restored
    }

    async fn unread_count(&self, recipient_id: &str) -> usize {
        self.state.lock().await.unread_count(recipient_id)
    }

    async fn ordered(&self, recipient_id: &str) -> OrderedNotifications {
        let notifications = self.state.lock().await.ordered();

        OrderedNotifications::new(notifications, recipient_id.to_string())
    }

    async fn get(&self, id: &str) -> Option<Arc<Notification>> {
        self.state.lock().await.get(id)
    }

    async fn len(&self) -> usize {
        self.state.lock().await.len()
    }

    fn changes(&self) -> watch::Receiver<u64> {
        self.changes_tx.subscribe()
    }
}
