pub mod mutations_service;
pub mod notifications_store;
pub mod push_events_service;
pub mod sync_service;
