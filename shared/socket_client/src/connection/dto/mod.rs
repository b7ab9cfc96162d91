mod connection_state;
mod socket_connection_config;

pub use connection_state::ConnectionState;
pub use socket_connection_config::SocketConnectionConfig;
