mod message_response;
mod notification;
mod notification_delete;
mod notifications_snapshot;
mod pong;

pub use message_response::*;
pub use notification::*;
pub use notification_delete::*;
pub use notifications_snapshot::*;
pub use pong::*;
