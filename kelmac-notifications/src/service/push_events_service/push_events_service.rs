use super::PushEvent;
use crate::{
    dto::input,
    model::Notification,
    service::notifications_store::{NotificationsStore, StoreEvent},
};
use async_trait::async_trait;
use serde_json::Value;
use socket_client::{SocketConnection, SocketEventHandler, SubscriptionId};
use std::sync::Arc;
use strum::IntoEnumIterator;

///
/// Feeds events received from the push server into the store
///
pub struct PushEventsService {
    connection: SocketConnection,
    subscriptions: Vec<SubscriptionId>,
}

impl PushEventsService {
    pub fn new(connection: SocketConnection, store: Arc<dyn NotificationsStore>) -> Self {
        let subscriptions = PushEvent::iter()
            .map(|event| {
                let handler = Handler {
                    event,
                    store: Arc::clone(&store),
                };
                connection.subscribe(event.as_ref(), Arc::new(handler))
            })
            .collect();

        Self {
            connection,
            subscriptions,
        }
    }

    pub fn close(self) {
        for id in self.subscriptions {
            self.connection.unsubscribe(id);
        }
    }
}

struct Handler {
    event: PushEvent,
    store: Arc<dyn NotificationsStore>,
}

impl Handler {
    async fn try_handle(&self, payload: Value) -> anyhow::Result<()> {
        match self.event {
            PushEvent::Notification | PushEvent::Message => {
                let notification = Notification::try_from(payload)?;
                let outcome = self.store.apply(StoreEvent::Created(notification)).await;
                tracing::info!(%outcome, "notification received");
            }
            PushEvent::NotificationUpdate => {
                let notification = Notification::try_from(payload)?;
                let outcome = self.store.apply(StoreEvent::Updated(notification)).await;
                tracing::info!(%outcome, "notification update received");
            }
            PushEvent::NotificationDelete => {
                let delete = serde_json::from_value::<input::NotificationDelete>(payload)?;
                let Some(id) = delete.id() else {
                    tracing::debug!("delete without id ignored");
                    return Ok(());
                };

                let outcome = self
                    .store
                    .apply(StoreEvent::Deleted(id.to_string()))
                    .await;
                tracing::info!(%outcome, id, "notification delete received");
            }
            PushEvent::Pong => {
                let pong = serde_json::from_value::<input::Pong>(payload)?;
                tracing::info!(echo = pong.message.as_deref(), "pong received");
            }
        }

        Ok(())
    }
}

#[async_trait]
impl SocketEventHandler for Handler {
    #[tracing::instrument(name = "Push Event", skip_all, fields(event = %self.event))]
    async fn handle(&self, payload: Value) {
        tracing::debug!("processing push event");

        if let Err(err) = self.try_handle(payload).await {
            tracing::warn!(%err, "invalid push event dropped");
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::service::notifications_store::{ApplyOutcome, MockNotificationsStore};
    use serde_json::json;
    use socket_client::{SocketConnectionConfig, WebSocketConnector};

    fn notification_json(id: &str) -> Value {
        json!({
            "id": id,
            "title": "Course Started",
            "message": "Your course starts today",
            "type": "course_started",
            "receiverIds": ["u1"],
            "readByIds": false,
            "createdAt": "2026-01-23T08:00:00Z",
            "updatedAt": "2026-01-23T08:00:00Z",
        })
    }

    fn create_handler(event: PushEvent, store: MockNotificationsStore) -> Handler {
        Handler {
            event,
            store: Arc::new(store),
        }
    }

    #[tokio::test]
    async fn handle_notification_created() {
        let mut store = MockNotificationsStore::new();
        store
            .expect_apply()
            .withf(|event| matches!(event, StoreEvent::Created(n) if n.id == "n1"))
            .once()
            .returning(|_| ApplyOutcome::Inserted);
        let handler = create_handler(PushEvent::Notification, store);

        handler.try_handle(notification_json("n1")).await.unwrap();
    }

    #[tokio::test]
    async fn handle_message_treated_as_notification() {
        let mut store = MockNotificationsStore::new();
        store
            .expect_apply()
            .withf(|event| matches!(event, StoreEvent::Created(n) if n.id == "n2"))
            .once()
            .returning(|_| ApplyOutcome::Inserted);
        let handler = create_handler(PushEvent::Message, store);

        handler.try_handle(notification_json("n2")).await.unwrap();
    }

    #[tokio::test]
    async fn handle_notification_update() {
        let mut store = MockNotificationsStore::new();
        store
            .expect_apply()
            .withf(|event| matches!(event, StoreEvent::Updated(n) if n.id == "n1"))
            .once()
            .returning(|_| ApplyOutcome::Replaced);
        let handler = create_handler(PushEvent::NotificationUpdate, store);

        handler.try_handle(notification_json("n1")).await.unwrap();
    }

    #[tokio::test]
    async fn handle_notification_without_id_rejected() {
        let mut store = MockNotificationsStore::new();
        store.expect_apply().never();
        let handler = create_handler(PushEvent::Notification, store);

        let mut payload = notification_json("n1");
        payload.as_object_mut().unwrap().remove("id");

        assert!(handler.try_handle(payload).await.is_err());
    }

    #[tokio::test]
    async fn handle_notification_delete() {
        let mut store = MockNotificationsStore::new();
        store
            .expect_apply()
            .withf(|event| *event == StoreEvent::Deleted("n1".to_string()))
            .once()
            .returning(|_| ApplyOutcome::Deleted);
        let handler = create_handler(PushEvent::NotificationDelete, store);

        handler.try_handle(json!({ "id": "n1" })).await.unwrap();
    }

    #[tokio::test]
    async fn handle_notification_delete_without_string_id_ignored() {
        let mut store = MockNotificationsStore::new();
        store.expect_apply().never();
        let handler = create_handler(PushEvent::NotificationDelete, store);

        handler.try_handle(json!({})).await.unwrap();
        handler.try_handle(json!({ "id": 42 })).await.unwrap();
        handler.try_handle(json!({ "id": null })).await.unwrap();
    }

    #[tokio::test]
    async fn handle_pong_store_untouched() {
        let mut store = MockNotificationsStore::new();
        store.expect_apply().never();
        let handler = create_handler(PushEvent::Pong, store);

        handler.try_handle(json!({ "message": "hello" })).await.unwrap();
    }

    #[tokio::test]
    async fn handle_invalid_payload_dropped() {
        let mut store = MockNotificationsStore::new();
        store.expect_apply().never();
        let handler = create_handler(PushEvent::NotificationUpdate, store);

        handler.handle(json!("not an object")).await;
    }

    #[tokio::test]
    async fn close_all_subscriptions_removed() {
        let connection =
            SocketConnection::new(SocketConnectionConfig::default(), Arc::new(WebSocketConnector));
        let store = Arc::new(MockNotificationsStore::new());

        let service = PushEventsService::new(connection.clone(), store);
        let subscriptions = service.subscriptions.clone();
        assert_eq!(subscriptions.len(), 5);

        service.close();

        for id in subscriptions {
            assert!(!connection.unsubscribe(id));
        }
    }
}
