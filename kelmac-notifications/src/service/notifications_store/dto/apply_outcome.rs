#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ApplyOutcome {
    Inserted,
    Replaced,

    /// Incoming notification equals the stored one
    Unchanged,

    /// Stored notification was updated later than the incoming one
    Stale,

    /// Notification was deleted and its tombstone is still retained
    Tombstoned,

    Deleted,

    /// Delete of a notification the store doesn't hold, only tombstone was recorded
    DeletedUnknown,
}

impl ApplyOutcome {
    pub fn changed(&self) -> bool {
        matches!(self, Self::Inserted | Self::Replaced | Self::Deleted)
    }
}
