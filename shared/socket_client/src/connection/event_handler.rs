use async_trait::async_trait;
use serde_json::Value;
use std::{
    collections::HashMap,
    future::Future,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, PoisonError, RwLock,
    },
};

///
/// Handler of one named push event.
///
/// Handlers of a connection are executed one after another, in order of arrival.
///
#[async_trait]
pub trait SocketEventHandler: Send + Sync {
    async fn handle(&self, payload: Value);
}

#[async_trait]
impl<F, Fut> SocketEventHandler for F
where
    F: Fn(Value) -> Fut + Send + Sync,
    Fut: Future<Output = ()> + Send,
{
    async fn handle(&self, payload: Value) {
        (self)(payload).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriptions = HashMap<String, Vec<(SubscriptionId, Arc<dyn SocketEventHandler>)>>;

#[derive(Default)]
pub struct EventHandlers {
    next_id: AtomicU64,
    subscriptions: RwLock<Subscriptions>,
}

impl EventHandlers {
    pub fn subscribe(&self, event: &str, handler: Arc<dyn SocketEventHandler>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));

        let mut subscriptions = self
            .subscriptions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        subscriptions
            .entry(event.to_string())
            .or_default()
            .push((id, handler));

        id
    }

    ///
    /// ### Returns
    /// `true` when subscription existed
    ///
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscriptions = self
            .subscriptions
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        let mut removed = false;
        subscriptions.retain(|_, handlers| {
            let len_before = handlers.len();
            handlers.retain(|(handler_id, _)| *handler_id != id);
            removed |= handlers.len() != len_before;

            !handlers.is_empty()
        });

        removed
    }

    ///
    /// Executes handlers registered for the event sequentially.
    /// Lock is not held while handlers run, so handlers may (un)subscribe.
    ///
    pub async fn dispatch(&self, event: &str, payload: Value) {
        let handlers = {
            let subscriptions = self
                .subscriptions
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            subscriptions
                .get(event)
                .map(|handlers| {
                    handlers
                        .iter()
                        .map(|(_, handler)| Arc::clone(handler))
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default()
        };

        if handlers.is_empty() {
            tracing::trace!(event, "no handlers registered");
            return;
        }

        for handler in handlers {
            handler.handle(payload.clone()).await;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;
    use tokio::sync::Mutex;

    #[tokio::test]
    async fn dispatch_handlers_executed_in_registration_order() {
        let handlers = EventHandlers::default();
        let calls = Arc::new(Mutex::new(Vec::new()));

        for i in 0..3 {
            let calls = Arc::clone(&calls);
            handlers.subscribe(
                "notification",
                Arc::new(move |payload: Value| {
                    let calls = Arc::clone(&calls);
                    async move { calls.lock().await.push((i, payload)) }
                }),
            );
        }

        handlers.dispatch("notification", json!({ "id": "n1" })).await;

        let calls = calls.lock().await;
        assert_eq!(
            *calls,
            vec![
                (0, json!({ "id": "n1" })),
                (1, json!({ "id": "n1" })),
                (2, json!({ "id": "n1" })),
            ]
        );
    }

    #[tokio::test]
    async fn dispatch_other_event_not_handled() {
        let handlers = EventHandlers::default();
        let calls = Arc::new(Mutex::new(0));

        let calls_clone = Arc::clone(&calls);
        handlers.subscribe(
            "notification",
            Arc::new(move |_: Value| {
                let calls = Arc::clone(&calls_clone);
                async move { *calls.lock().await += 1 }
            }),
        );

        handlers.dispatch("notificationDelete", json!({})).await;

        assert_eq!(*calls.lock().await, 0);
    }

    #[tokio::test]
    async fn unsubscribe_handler_not_executed() {
        let handlers = EventHandlers::default();
        let calls = Arc::new(Mutex::new(0));

        let calls_clone = Arc::clone(&calls);
        let id = handlers.subscribe(
            "pong",
            Arc::new(move |_: Value| {
                let calls = Arc::clone(&calls_clone);
                async move { *calls.lock().await += 1 }
            }),
        );

        assert!(handlers.unsubscribe(id));
        assert!(!handlers.unsubscribe(id));

        handlers.dispatch("pong", json!({ "message": "hi" })).await;

        assert_eq!(*calls.lock().await, 0);
    }
}
