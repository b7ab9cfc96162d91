mod dto;
mod notifications_store;
mod notifications_store_garbage_collector;
mod notifications_store_impl;
mod notifications_store_state;

pub use dto::{
    ApplyOutcome, NotificationView, NotificationsStoreConfig, OrderedNotifications,
    PreviousState, ReconcileSummary, StoreEvent,
};
pub use notifications_store::*;
pub use notifications_store_garbage_collector::*;
pub use notifications_store_impl::*;
