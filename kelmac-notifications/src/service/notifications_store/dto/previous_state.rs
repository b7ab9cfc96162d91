use crate::model::Notification;
use std::sync::Arc;

///
/// Notification as it was before an optimistic write.
/// Rollback restores it only while the optimistic write is still the latest one.
///
#[derive(Debug, Clone, PartialEq)]
pub struct PreviousState {
    pub notification: Arc<Notification>,

    /// Revision of the optimistic write
    pub revision: u64,
}

impl PreviousState {
    pub fn id(&self) -> &str {
        &self.notification.id
    }
}
