use serde::Deserialize;
use serde_json::{Map, Value};
use time::OffsetDateTime;

///
/// Notification as sent by the backend.
/// Every field is optional here, required ones are checked when converting to the model.
///
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Option<String>,
    pub title: Option<String>,
    pub message: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub receiver_ids: Option<Vec<Receiver>>,
    pub read_by_ids: Option<ReadByIds>,
    pub meta: Option<Map<String, Value>>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Receiver {
    Id(String),
    Profile(ReceiverProfile),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiverProfile {
    pub id: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
    pub job_title: Option<String>,
}

///
/// `readByIds` is either a flag or a list of recipients that read the notification
///
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ReadByIds {
    Flag(bool),
    Ids(Vec<ReadByEntry>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ReadByEntry {
    Id(String),
    Receiver { id: String },
}

impl ReadByEntry {
    pub fn into_id(self) -> String {
        match self {
            Self::Id(id) => id,
            Self::Receiver { id } => id,
        }
    }
}
