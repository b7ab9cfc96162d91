mod apply_outcome;
mod notifications_store_config;
mod ordered_notifications;
mod previous_state;
mod reconcile_summary;
mod store_event;

pub use apply_outcome::ApplyOutcome;
pub use notifications_store_config::NotificationsStoreConfig;
pub use ordered_notifications::{NotificationView, OrderedNotifications};
pub use previous_state::PreviousState;
pub use reconcile_summary::ReconcileSummary;
pub use store_event::StoreEvent;
