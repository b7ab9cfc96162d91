use crate::model::Notification;

#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    Created(Notification),
    Updated(Notification),
    Deleted(String),
}

impl StoreEvent {
    pub fn id(&self) -> &str {
        match self {
            Self::Created(notification) | Self::Updated(notification) => &notification.id,
            Self::Deleted(id) => id,
        }
    }
}
