use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
    routing::get,
    Router,
};
use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use std::{net::SocketAddr, sync::Once};
use tokio::{net::TcpListener, sync::broadcast};

static INIT_TRACING_ONCE: Once = Once::new();

pub fn init_tracing() {
    INIT_TRACING_ONCE.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

///
/// Minimal Socket.IO push server.
/// Events sent to the returned channel are pushed to every connected client,
/// `ping` events are answered with `pong`.
///
pub async fn start_push_server() -> (SocketAddr, broadcast::Sender<(String, Value)>) {
    let (events_tx, _) = broadcast::channel(16);

    let router = Router::new()
        .route("/socket.io/", get(upgrade))
        .with_state(events_tx.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (address, events_tx)
}

///
/// Address nothing listens on
///
pub async fn unused_address() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

async fn upgrade(
    State(events_tx): State<broadcast::Sender<(String, Value)>>,
    ws: WebSocketUpgrade,
) -> Response {
    ws.on_upgrade(move |socket| serve_socket(socket, events_tx.subscribe()))
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
