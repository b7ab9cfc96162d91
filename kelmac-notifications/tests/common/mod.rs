use axum::{
    extract::{
        ws::{Message, WebSocket},
        Path, Query, State, WebSocketUpgrade,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch},
    Json, Router,
};
use futures::{SinkExt, StreamExt};
use kelmac_notifications::application::{
    create_state, ApplicationEnv, ApplicationState, ApplicationStateToClose,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::{
    future::Future,
    net::SocketAddr,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, Once,
    },
    time::Duration,
};
use tokio::{net::TcpListener, sync::broadcast, time::timeout};

pub const RECIPIENT_ID: &str = "u1";

static INIT_TRACING_ONCE: Once = Once::new();

pub fn init_tracing() {
    INIT_TRACING_ONCE.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

pub fn notification_json(id: &str, created_at: &str) -> Value {
    json!({
        "id": id,
        "title": "Course Updated",
        "message": format!("Course of {id} has been updated"),
        "type": "course_updated",
        "receiverIds": [{ "id": RECIPIENT_ID, "firstName": "Ada", "lastName": "Lovelace" }],
        "readByIds": false,
        "meta": { "courseId": "c1" },
        "createdAt": created_at,
        "updatedAt": created_at,
    })
}

///
/// In-process backend that serves the notifications REST endpoints
/// and a minimal Socket.IO push server on the same address.
///
#[derive(Clone)]
pub struct TestBackend {
    pub address: SocketAddr,
    inner: Arc<BackendInner>,
}

struct BackendInner {
    notifications: Mutex<Vec<Value>>,
    fail_mutations: AtomicBool,
    brief_confirmations: AtomicBool,
    events_tx: broadcast::Sender<(String, Value)>,
}

impl TestBackend {
    pub async fn start(notifications: Vec<Value>) -> Self {
        let (events_tx, _) = broadcast::channel(16);
        let inner = Arc::new(BackendInner {
            notifications: Mutex::new(notifications),
            fail_mutations: AtomicBool::new(false),
            brief_confirmations: AtomicBool::new(false),
            events_tx,
        });

        let router = Router::new()
            .route("/socket.io/", get(upgrade))
            .route("/notifications", get(fetch_notifications))
            .route(
                "/notifications/:id",
                patch(mark_all_as_read).delete(delete_notification),
            )
            .route("/notifications/:id/read", patch(mark_as_read))
            .with_state(Arc::clone(&inner));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self { address, inner }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.address)
    }

    ///
    /// Emits event to every connected socket
    ///
    pub fn push(&self, event: &str, payload: Value) {
        self.inner
            .events_tx
            .send((event.to_string(), payload))
            .unwrap();
    }

    pub fn fail_mutations(&self, fail: bool) {
        self.inner.fail_mutations.store(fail, Ordering::SeqCst);
    }

    ///
    /// Makes mutations answer with a bare message or an empty body
    /// instead of the updated entity
    ///
    pub fn brief_confirmations(&self, brief: bool) {
        self.inner.brief_confirmations.store(brief, Ordering::SeqCst);
    }

    pub fn insert(&self, notification: Value) {
        self.inner.notifications.lock().unwrap().push(notification);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.inner
            .notifications
            .lock()
            .unwrap()
            .iter()
            .any(|notification| notification["id"] == id)
    }
}

pub async fn create_application(backend: &TestBackend) -> (ApplicationState, ApplicationStateToClose) {
    let env = ApplicationEnv {
        log_directory: "logs".to_string(),
        log_filename: "kelmac-notifications-test.log".to_string(),
        log_file_filter: "debug".to_string(),
        recipient_id: RECIPIENT_ID.to_string(),
        websocket_url: backend.url(),
        api_base_url: backend.url(),
        request_timeout: Duration::from_secs(2),
        reconnect_base_delay: Duration::from_millis(10),
        reconnect_max_delay: Duration::from_millis(50),
        reconnect_max_attempts: 3,
        tombstone_lifespan: Duration::from_secs(3600),
        garbage_collector_interval: Duration::from_secs(60),
    };

    create_state(&env).await.unwrap()
}

///
/// Waits until the condition holds for the store, re-checking after every store change
///
pub async fn wait_for_store<F, Fut>(state: &ApplicationState, condition: F)
where
    F: Fn(ApplicationState) -> Fut,
    Fut: Future<Output = bool>,
{
    let mut changes_rx = state.notifications_store.changes();

    timeout(Duration::from_secs(5), async {
        while !condition(state.clone()).await {
            changes_rx.changed().await.unwrap();
        }
    })
    .await
    .unwrap();
}

async fn fetch_notifications(State(backend): State<Arc<BackendInner>>) -> Json<Value> {
    let notifications = backend.notifications.lock().unwrap().clone();

    Json(json!({ "data": notifications }))
}

async fn mark_as_read(
    State(backend): State<Arc<BackendInner>>,
    Path(id): Path<String>,
) -> Result<Response, StatusCode> {
    if backend.fail_mutations.load(Ordering::SeqCst) {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    let mut notifications = backend.notifications.lock().unwrap();
    let notification = notifications
        .iter_mut()
        .find(|notification| notification["id"] == id.as_str())
        .ok_or(StatusCode::NOT_FOUND)?;

    notification["readByIds"] = json!([RECIPIENT_ID]);
    notification["updatedAt"] = json!("2030-01-01T00:00:00Z");

    if backend.brief_confirmations.load(Ordering::SeqCst) {
        return Ok(Json(json!({ "message": "Notification marked as read" })).into_response());
    }

    Ok(Json(notification.clone()).into_response())
}

async fn mark_all_as_read(
    State(backend): State<Arc<BackendInner>>,
    Path(id): Path<String>,
) -> Result<Response, StatusCode> {
    if id != "mark-all-read" {
        return Err(StatusCode::NOT_FOUND);
    }
    if backend.fail_mutations.load(Ordering::SeqCst) {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    let mut notifications = backend.notifications.lock().unwrap();
    for notification in notifications.iter_mut() {
        notification["readByIds"] = json!([RECIPIENT_ID]);
        notification["updatedAt"] = json!("2030-01-01T00:00:00Z");
    }

    if backend.brief_confirmations.load(Ordering::SeqCst) {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    Ok(Json(json!({ "message": "All notifications marked as read" })).into_response())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteQuery {
    user_id: String,
}

async fn delete_notification(
    State(backend): State<Arc<BackendInner>>,
    Path(id): Path<String>,
    Query(query): Query<DeleteQuery>,
) -> Result<Response, StatusCode> {
    if backend.fail_mutations.load(Ordering::SeqCst) {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    if query.user_id != RECIPIENT_ID {
        return Err(StatusCode::FORBIDDEN);
    }

    let mut notifications = backend.notifications.lock().unwrap();
    let len_before = notifications.len();
    notifications.retain(|notification| notification["id"] != id.as_str());
    if notifications.len() == len_before {
        return Err(StatusCode::NOT_FOUND);
    }

    if backend.brief_confirmations.load(Ordering::SeqCst) {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    Ok(Json(json!({ "message": "Notification deleted" })).into_response())
}

async fn upgrade(State(backend): State<Arc<BackendInner>>, ws: WebSocketUpgrade) -> Response {
    let events_rx = backend.events_tx.subscribe();
    ws.on_upgrade(move |socket| serve_socket(socket, events_rx))
}

async fn serve_socket(socket: WebSocket, mut events_rx: broadcast::Receiver<(String, Value)>) {
    let (mut ws_tx, mut ws_rx) = socket.split();

    let open = json!({
        "sid": "engine-1",
        "upgrades": [],
        "pingInterval": 25000,
        "pingTimeout": 20000,
        "maxPayload": 1000000,
    });
    if ws_tx.send(Message::Text(format!("0{open}"))).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            message = ws_rx.next() => {
                let Some(Ok(Message::Text(text))) = message else {
                    return;
                };

                let response = match text.as_str() {
                    "40" => Some(r#"40{"sid":"socket-1"}"#.to_string()),
                    "41" => return,
                    text => text
                        .strip_prefix("42")
                        .and_then(|event| serde_json::from_str::<(String, Value)>(event).ok())
                        .filter(|(name, _)| name == "ping")
                        .map(|(_, payload)| format!("42{}", json!(["pong", payload]))),
                };

                if let Some(response) = response {
                    if ws_tx.send(Message::Text(response)).await.is_err() {
                        return;
                    }
                }
            }

            Ok((name, payload)) = events_rx.recv() => {
                let event = format!("42{}", json!([name, payload]));
                if ws_tx.send(Message::Text(event)).await.is_err() {
                    return;
                }
            }
        }
    }
}
