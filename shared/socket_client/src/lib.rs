pub mod connection;
mod error;
pub mod packet;
mod retry;

pub use connection::{
    ConnectionState, Connector, SocketConnection, SocketConnectionConfig, SocketEventHandler,
    SubscriptionId, WebSocketConnector,
};
pub use error::Error;
