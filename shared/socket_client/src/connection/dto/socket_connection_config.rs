use std::time::Duration;

#[derive(Debug, Clone)]
pub struct SocketConnectionConfig {
    /// Base url of the push server, e.g. `http://localhost:3001`
    pub endpoint: String,

    pub reconnect_base_delay: Duration,
    pub reconnect_max_delay: Duration,
    pub reconnect_max_attempts: u32,

    /// Time allowed for transport connect and Socket.IO handshake
    pub handshake_timeout: Duration,
}

impl Default for SocketConnectionConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:3001".to_string(),
            reconnect_base_delay: Duration::from_secs(1),
            reconnect_max_delay: Duration::from_secs(5),
            reconnect_max_attempts: 5,
            handshake_timeout: Duration::from_secs(20),
        }
    }
}
