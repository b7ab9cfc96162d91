use super::dto::{ApplyOutcome, PreviousState, ReconcileSummary};
use crate::model::Notification;
use std::{
    cmp::Reverse,
    collections::{BTreeSet, HashMap},
    sync::Arc,
};
use time::OffsetDateTime;

type OrderKey = (Reverse<OffsetDateTime>, String);

struct Entry {
    notification: Arc<Notification>,

    /// Revision of the last write of this entry
    revision: u64,
}

///
/// Canonical map of notifications with indexes kept in sync on every write:
/// - `order` sorts ids by creation time, newest first
/// - `read_counts` holds number of stored notifications read by each recipient,
///   so unread count is `len - read_counts[recipient]`
/// - `tombstones` holds deletion time of deleted ids
///
#[derive(Default)]
pub struct NotificationsStoreState {
    entries: HashMap<String, Entry>,
    order: BTreeSet<OrderKey>,
    read_counts: HashMap<String, usize>,
    tombstones: HashMap<String, OffsetDateTime>,

    revision: u64,
    ordered_cache: Option<Arc<[Arc<Notification>]>>,
}

impl NotificationsStoreState {
    ///
    /// Inserts notification or replaces the stored one by last-writer-wins on `updated_at`.
    /// Ties prefer the incoming notification.
    ///
    pub fn upsert(&mut self, notification: Notification) -> ApplyOutcome {
        if self.tombstones.contains_key(&notification.id) {
            return ApplyOutcome::Tombstoned;
        }

        let stored = self
            .entries
            .get(&notification.id)
            .map(|entry| Arc::clone(&entry.notification));

        match stored {
            Some(stored) if stored.updated_at > notification.updated_at => ApplyOutcome::Stale,
            Some(stored) if *stored == notification => ApplyOutcome::Unchanged,
            Some(_) => {
                self.detach(&notification.id);
                self.attach(Arc::new(notification));
                ApplyOutcome::Replaced
            }
            None => {
                self.attach(Arc::new(notification));
                ApplyOutcome::Inserted
            }
        }
    }

    ///
    /// Removes notification and records its tombstone.
    /// Tombstone is recorded even when the notification is unknown,
    /// so a delayed creation can't resurrect it.
    ///
    pub fn remove(&mut self, id: &str, deleted_at: OffsetDateTime) -> ApplyOutcome {
        self.tombstones.insert(id.to_string(), deleted_at);

        match self.detach(id) {
            Some(_) => {
                self.revision += 1;
                ApplyOutcome::Deleted
            }
            None => ApplyOutcome::DeletedUnknown,
        }
    }

    pub fn reconcile(&mut self, snapshot: Vec<Notification>) -> ReconcileSummary {
        let mut summary = ReconcileSummary::default();
        for notification in snapshot {
            summary.record(self.upsert(notification));
        }

        summary
    }

    ///
    /// Marks notification as read by the recipient.
    ///
    /// ### Returns
    /// state needed to undo the write or `None` when notification is unknown
    ///
    pub fn mark_read(&mut self, id: &str, recipient_id: &str) -> Option<PreviousState> {
        let entry = self.entries.get(id)?;
        let previous = Arc::clone(&entry.notification);

        if previous.is_read_by(recipient_id) {
            return Some(PreviousState {
                notification: previous,
                revision: entry.revision,
            });
        }

        let mut updated = Notification::clone(&previous);
        updated.read_by.insert(recipient_id.to_string());

        self.detach(id);
        let revision = self.attach(Arc::new(updated));

        Some(PreviousState {
            notification: previous,
            revision,
        })
    }

    ///
    /// Marks every notification unread by the recipient as read
    ///
    pub fn mark_all_read(&mut self, recipient_id: &str) -> Vec<PreviousState> {
        let unread_ids = self
            .entries
            .iter()
            .filter(|(_, entry)| !entry.notification.is_read_by(recipient_id))
            .map(|(id, _)| id.clone())
            .collect::<Vec<_>>();

        unread_ids
            .iter()
            .filter_map(|id| self.mark_read(id, recipient_id))
            .collect()
    }

    ///
    /// Restores notification from before the optimistic write.
    ///
    /// ### Returns
    /// `false` when the notification was replaced or deleted after the write
    ///
    pub fn rollback(&mut self, previous: PreviousState) -> bool {
        let id = previous.id();
        match self.entries.get(id) {
            Some(entry) if entry.revision == previous.revision => {}
            _ => return false,
        }

        if *self.entries[id].notification == *previous.notification {
            return true;
        }

        let id = id.to_string();
        self.detach(&id);
        self.attach(previous.notification);

        true
    }

    pub fn unread_count(&self, recipient_id: &str) -> usize {
        let read = self.read_counts.get(recipient_id).copied().unwrap_or(0);

        self.entries.len().saturating_sub(read)
    }

    ///
    /// ### Returns
    /// notifications sorted by creation time descending, ties by id
    ///
    pub fn ordered(&mut self) -> Arc<[Arc<Notification>]> {
        if let Some(ordered) = &self.ordered_cache {
            return Arc::clone(ordered);
        }

        let ordered = self
            .order
            .iter()
            .filter_map(|(_, id)| self.entries.get(id))
            .map(|entry| Arc::clone(&entry.notification))
            .collect::<Arc<[_]>>();
        self.ordered_cache = Some(Arc::clone(&ordered));

        ordered
    }

    pub fn get(&self, id: &str) -> Option<Arc<Notification>> {
        self.entries
            .get(id)
            .map(|entry| Arc::clone(&entry.notification))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_tombstoned(&self, id: &str) -> bool {
        self.tombstones.contains_key(id)
    }

    ///
    /// Increases with every change of stored notifications
    ///
    pub fn revision(&self) -> u64 {
        self.revision
    }

    ///
    /// Removes tombstones recorded before `min_timestamp`
    ///
    /// ### Returns
    /// number of removed tombstones
    ///
    pub fn collect_tombstones(&mut self, min_timestamp: OffsetDateTime) -> usize {
        let len_before = self.tombstones.len();
        self.tombstones
            .retain(|_, deleted_at| *deleted_at > min_timestamp);

        if self.tombstones.len() < self.tombstones.capacity() / 4 {
            let new_capacity = self.tombstones.capacity() / 2;
            self.tombstones.shrink_to(new_capacity);
        }

        len_before - self.tombstones.len()
    }

    fn attach(&mut self, notification: Arc<Notification>) -> u64 {
        self.revision += 1;
        self.ordered_cache = None;

        for recipient_id in &notification.read_by {
            *self.read_counts.entry(recipient_id.clone()).or_default() += 1;
        }
        self.order
            .insert((Reverse(notification.created_at), notification.id.clone()));
        self.entries.insert(
            notification.id.clone(),
            Entry {
                notification,
                revision: self.revision,
            },
        );

        self.revision
    }

    fn detach(&mut self, id: &str) -> Option<Arc<Notification>> {
        let entry = self.entries.remove(id)?;
        let notification = entry.notification;
        self.ordered_cache = None;

        for recipient_id in &notification.read_by {
            if let Some(count) = self.read_counts.get_mut(recipient_id) {
                *count -= 1;
                if *count == 0 {
                    self.read_counts.remove(recipient_id);
                }
            }
        }
        self.order
            .remove(&(Reverse(notification.created_at), notification.id.clone()));

        Some(notification)
    }
}
