mod dto;
mod push_events_service;

pub use dto::PushEvent;
pub use push_events_service::*;
