//!
//! Module that keeps one logical Socket.IO connection with the push server alive.
//!

mod connector;
mod dto;
mod event_handler;
mod socket_connection;
mod socket_session;
mod state_machine;

pub use connector::{socket_io_url, Connector, WebSocketConnector, WebSocketSink, WebSocketStream};
pub use dto::{ConnectionState, SocketConnectionConfig};
pub use event_handler::{SocketEventHandler, SubscriptionId};
pub use socket_connection::SocketConnection;
