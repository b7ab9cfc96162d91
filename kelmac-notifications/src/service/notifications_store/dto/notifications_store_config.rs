use std::time::Duration;

#[derive(Debug, Clone)]
pub struct NotificationsStoreConfig {
    /// How long a deleted id blocks arrivals of the same notification
    pub tombstone_lifespan: Duration,
    pub garbage_collector_interval: Duration,
}
