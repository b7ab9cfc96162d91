use crate::api;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("notification not exist")]
    NotificationNotExist,

    #[error("validation error: {0}")]
    Validation(&'static str),

    #[error("api error: {0}")]
    Api(#[from] api::Error),

    #[error("request timed out")]
    Timeout,
}
