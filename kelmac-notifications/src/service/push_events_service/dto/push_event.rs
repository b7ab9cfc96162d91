///
/// Events emitted by the push server that change the store or are diagnostic
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::AsRefStr, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "camelCase")]
pub enum PushEvent {
    Notification,

    /// Legacy name of [PushEvent::Notification]
    Message,

    NotificationUpdate,
    NotificationDelete,
    Pong,
}
