use serde::Deserialize;

///
/// Response of endpoints that only confirm an action
///
#[derive(Debug, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}
