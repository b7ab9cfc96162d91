use crate::error::Error;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MutationsService: Send + Sync {
    ///
    /// Mark notification as read.
    /// Store is updated before the backend confirms the change.
    ///
    /// ### Errors
    /// - [Error::NotificationNotExist] when store doesn't hold the notification
    /// - [Error::Api] when backend rejects the change
    /// - [Error::Timeout] when backend doesn't respond in time
    ///
    /// On [Error::Api] and [Error::Timeout] the optimistic change is rolled back
    ///
    async fn mark_as_read(&self, id: &str) -> Result<(), Error>;

    ///
    /// Mark every notification as read.
    /// Either all optimistic changes stay or all are rolled back.
    ///
    /// ### Returns
    /// number of notifications marked as read
    ///
    /// ### Errors
    /// - [Error::Api]
    /// - [Error::Timeout]
    ///
    async fn mark_all_as_read(&self) -> Result<usize, Error>;

    ///
    /// Delete notification of the recipient.
    /// Store is updated only after the backend confirms the deletion.
    ///
    /// ### Errors
    /// - [Error::Validation] when recipient id is empty
    /// - [Error::Api]
    /// - [Error::Timeout]
    ///
    async fn delete_notification(&self, id: &str, recipient_id: &str) -> Result<(), Error>;
}
