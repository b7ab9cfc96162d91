//!
//! Module with entities kept by the notifications store
//!

mod notification;
mod notification_kind;
mod receiver;

pub use notification::*;
pub use notification_kind::*;
pub use receiver::*;
