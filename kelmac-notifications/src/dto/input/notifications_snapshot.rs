use serde::Deserialize;
use serde_json::Value;

///
/// Response of `GET /notifications`.
/// Backend returns either a bare array or an envelope with the array in `data`.
///
/// Elements are kept raw so one malformed notification doesn't reject the whole snapshot.
///
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum NotificationsSnapshot {
    List(Vec<Value>),
    Envelope { data: Vec<Value> },
}

impl NotificationsSnapshot {
    pub fn into_items(self) -> Vec<Value> {
        match self {
            Self::List(items) => items,
            Self::Envelope { data } => data,
        }
    }
}
