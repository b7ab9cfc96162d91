use serde::Deserialize;
use serde_json::Value;

///
/// Payload of the `notificationDelete` push event.
/// Id is kept raw, events without string id are ignored.
///
#[derive(Debug, Deserialize)]
pub struct NotificationDelete {
    pub id: Option<Value>,
}

impl NotificationDelete {
    pub fn id(&self) -> Option<&str> {
        self.id.as_ref().and_then(Value::as_str)
    }
}
