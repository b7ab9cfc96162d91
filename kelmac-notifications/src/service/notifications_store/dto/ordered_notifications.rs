use crate::model::Notification;
use std::sync::Arc;

///
/// Immutable view of the store sorted by creation time, newest first.
/// Every call to [Self::iter] starts from the beginning.
///
#[derive(Debug, Clone)]
pub struct OrderedNotifications {
    notifications: Arc<[Arc<Notification>]>,
    recipient_id: String,
}

#[derive(Debug, Clone, Copy)]
pub struct NotificationView<'a> {
    pub notification: &'a Arc<Notification>,

    /// Whether the recipient of the view has read the notification
    pub read: bool,
}

impl OrderedNotifications {
    pub fn new(notifications: Arc<[Arc<Notification>]>, recipient_id: String) -> Self {
        Self {
            notifications,
            recipient_id,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = NotificationView<'_>> + '_ {
        self.notifications
            .iter()
            .map(|notification| NotificationView {
                notification,
                read: notification.is_read_by(&self.recipient_id),
            })
    }

    pub fn len(&self) -> usize {
        self.notifications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }
}
