pub mod common;

use common::*;
use kelmac_notifications::application::{self, ApplicationState};
use serde_json::json;
use socket_client::ConnectionState;
use std::time::Duration;
use tokio::time::timeout;

async fn connect(state: &ApplicationState) -> anyhow::Result<()> {
    let mut state_rx = state.connection.connect().await.state();
    timeout(
        Duration::from_secs(5),
        state_rx.wait_for(|state| *state == ConnectionState::Connected),
    )
    .await??;

    Ok(())
}

#[tokio::test]
async fn notification_lifecycle_pushed() -> anyhow::Result<()> {
    init_tracing();
    let backend = TestBackend::start(Vec::new()).await;
    let (state, state_to_close) = create_application(&backend).await;
    connect(&state).await?;

    backend.push("notification", notification_json("n1", "2026-01-23T08:00:00Z"));
    wait_for_store(&state, |state| async move {
        state.notifications_store.unread_count(RECIPIENT_ID).await == 1
    })
    .await;

    let notification = state.notifications_store.get("n1").await.unwrap();
    assert_eq!(notification.kind.label(), "Course Updated");
    assert_eq!(notification.course_id(), Some("c1"));
    assert_eq!(notification.receivers[0].display_name(), "Ada Lovelace");

    let mut update = notification_json("n1", "2026-01-23T08:00:00Z");
    update["readByIds"] = json!([RECIPIENT_ID]);
    update["updatedAt"] = json!("2026-01-23T09:00:00Z");
    backend.push("notificationUpdate", update);
    wait_for_store(&state, |state| async move {
        state.notifications_store.unread_count(RECIPIENT_ID).await == 0
    })
    .await;

    backend.push("notificationDelete", json!({ "id": "n1" }));
    wait_for_store(&state, |state| async move {
        state.notifications_store.len().await == 0
    })
    .await;

    application::close(state_to_close).await;

    Ok(())
}

#[tokio::test]
async fn legacy_message_event_treated_as_notification() -> anyhow::Result<()> {
    init_tracing();
    let backend = TestBackend::start(Vec::new()).await;
    let (state, state_to_close) = create_application(&backend).await;
    connect(&state).await?;

    backend.push("message", notification_json("n1", "2026-01-23T08:00:00Z"));
    wait_for_store(&state, |state| async move {
        state.notifications_store.get("n1").await.is_some()
    })
    .await;

    application::close(state_to_close).await;

    Ok(())
}

#[tokio::test]
async fn deleted_notification_not_resurrected_by_snapshot() -> anyhow::Result<()> {
    init_tracing();
    let backend = TestBackend::start(vec![notification_json("n1", "2026-01-23T08:00:00Z")]).await;
    let (state, state_to_close) = create_application(&backend).await;
    connect(&state).await?;

    wait_for_store(&state, |state| async move {
        state.notifications_store.len().await == 1
    })
    .await;

    backend.push("notificationDelete", json!({ "id": "n1" }));
    wait_for_store(&state, |state| async move {
        state.notifications_store.len().await == 0
    })
    .await;

    // backend still lists the notification
    assert!(backend.contains("n1"));
    let summary = state.sync_service.sync().await?;

    assert_eq!(summary.tombstoned, 1);
    assert!(state.notifications_store.get("n1").await.is_none());

    application::close(state_to_close).await;

    Ok(())
}

#[tokio::test]
async fn invalid_events_ignored() -> anyhow::Result<()> {
    init_tracing();
    let backend = TestBackend::start(Vec::new()).await;
    let (state, state_to_close) = create_application(&backend).await;
    connect(&state).await?;

    backend.push("notification", json!({ "title": "missing id" }));
    backend.push("notificationDelete", json!({ "id": 7 }));
    backend.push("notification", notification_json("n2", "2026-01-23T08:00:00Z"));

    // events are handled in order, so the valid one arrives last
    wait_for_store(&state, |state| async move {
        state.notifications_store.len().await == 1
    })
    .await;
    assert!(state.notifications_store.get("n2").await.is_some());
    assert_eq!(*state.connection.state().borrow(), ConnectionState::Connected);

    application::close(state_to_close).await;

    Ok(())
}

#[tokio::test]
async fn ping_answered_with_pong() -> anyhow::Result<()> {
    init_tracing();
    let backend = TestBackend::start(Vec::new()).await;
    let (state, state_to_close) = create_application(&backend).await;
    connect(&state).await?;

    // pong only reaches the diagnostic handler, store stays empty
    state.connection.send_ping("hello");
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert_eq!(state.notifications_store.len().await, 0);
    assert_eq!(*state.connection.state().borrow(), ConnectionState::Connected);

    application::close(state_to_close).await;

    Ok(())
}
