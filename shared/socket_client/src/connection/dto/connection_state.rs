#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,

    ///
    /// Reconnection attempts were exhausted.
    /// Connection stays in this state until it is connected again manually.
    ///
    Unavailable,
}
