use super::Error;
use crate::model::Notification;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationsApi: Send + Sync {
    ///
    /// Fetch notifications of the current user.
    /// Malformed notifications are skipped.
    ///
    /// ### Errors
    /// - [Error::Request] when request could not be sent
    /// - [Error::Status] when backend responds with non-2xx status
    /// - [Error::InvalidResponse] when body is not a list of notifications
    ///
    async fn fetch_notifications(&self) -> Result<Vec<Notification>, Error>;

    ///
    /// Mark notification as read by the current user.
    /// Any 2xx status confirms the change, whatever the body holds.
    ///
    /// ### Returns
    /// updated notification when the body carries one
    ///
    /// ### Errors
    /// - [Error::Request] when request could not be sent
    /// - [Error::Status] when backend responds with non-2xx status
    ///
    async fn mark_as_read(&self, id: &str) -> Result<Option<Notification>, Error>;

    ///
    /// Mark all notifications of the current user as read.
    /// Any 2xx status confirms the change.
    ///
    /// ### Returns
    /// confirmation message when the body carries one
    ///
    async fn mark_all_as_read(&self) -> Result<Option<String>, Error>;

    ///
    /// Delete notification of the user.
    /// Any 2xx status confirms the deletion.
    ///
    /// ### Returns
    /// confirmation message when the body carries one
    ///
    async fn delete_notification(&self, id: &str, user_id: &str)
        -> Result<Option<String>, Error>;
}
