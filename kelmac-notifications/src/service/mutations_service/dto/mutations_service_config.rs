use std::time::Duration;

#[derive(Debug, Clone)]
pub struct MutationsServiceConfig {
    /// Recipient on whose behalf notifications are marked as read
    pub recipient_id: String,
    pub request_timeout: Duration,
}
