#[derive(Debug, Clone)]
pub struct NotificationsApiConfig {
    /// Base url of the backend, e.g. `http://localhost:5000`
    pub base_url: String,
}
