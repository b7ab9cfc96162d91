mod push_event;

pub use push_event::PushEvent;
