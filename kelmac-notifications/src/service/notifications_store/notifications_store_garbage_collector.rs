use super::{notifications_store_state::NotificationsStoreState, NotificationsStoreConfig};
use std::{sync::Arc, time::Duration};
use time::OffsetDateTime;
use tokio::{
    sync::{Mutex, Notify},
    time::{interval, Interval, MissedTickBehavior},
};

pub struct NotificationsStoreGarbageCollector {
    state: Arc<Mutex<NotificationsStoreState>>,

    interval: Interval,
    tombstone_lifespan: Duration,
}

impl NotificationsStoreGarbageCollector {
    pub(super) fn new(
        config: NotificationsStoreConfig,
        state: Arc<Mutex<NotificationsStoreState>>,
    ) -> Self {
        let mut interval = interval(config.garbage_collector_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        Self {
            state,
            interval,
            tombstone_lifespan: config.tombstone_lifespan,
        }
    }

    #[tracing::instrument(name = "Tombstones Garbage Collector", skip_all)]
    pub async fn run(mut self, close_notify: Arc<Notify>) {
        tokio::select! {
            biased;

            // Wait for signal to close
            _ = close_notify.notified() => {},

            // Run infinite loop and remove expired tombstones periodically
            _ = async { loop {
                self.interval.tick().await;
                let min_timestamp = OffsetDateTime::now_utc() - self.tombstone_lifespan;

                tracing::debug!("garbage collection started");

                let removed_tombstones = self.state.lock().await.collect_tombstones(min_timestamp);

                tracing::debug!(removed_tombstones, "garbage collection finished");
            }} => {}
        }
    }
}
