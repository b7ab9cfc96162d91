use super::{NotificationKind, Receiver};
use crate::dto::input;
use anyhow::anyhow;
use serde_json::{Map, Value};
use std::collections::HashSet;
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub receivers: Vec<Receiver>,

    /// Recipients that have read the notification
    pub read_by: HashSet<String>,

    pub meta: Map<String, Value>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Notification {
    pub fn is_read_by(&self, recipient_id: &str) -> bool {
        self.read_by.contains(recipient_id)
    }

    pub fn course_id(&self) -> Option<&str> {
        self.meta.get("courseId").and_then(Value::as_str)
    }
}

impl TryFrom<input::Notification> for Notification {
    type Error = anyhow::Error;

    fn try_from(value: input::Notification) -> Result<Self, Self::Error> {
        let id = value
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| anyhow!("notification invalid: missing id field"))?;
        let created_at = value
            .created_at
            .or(value.updated_at)
            .ok_or_else(|| anyhow!("notification invalid: missing createdAt and updatedAt fields"))?;
        let updated_at = value.updated_at.unwrap_or(created_at);

        let receivers = value
            .receiver_ids
            .unwrap_or_default()
            .into_iter()
            .map(Receiver::from)
            .collect::<Vec<_>>();

        let read_by = match value.read_by_ids {
            None | Some(input::ReadByIds::Flag(false)) => HashSet::new(),
            Some(input::ReadByIds::Flag(true)) => receivers
                .iter()
                .map(|receiver| receiver.id.clone())
                .collect(),
            Some(input::ReadByIds::Ids(entries)) => entries
                .into_iter()
                .map(input::ReadByEntry::into_id)
                .collect(),
        };

        Ok(Self {
            id,
            title: value.title.unwrap_or_default(),
            message: value.message.unwrap_or_default(),
            kind: NotificationKind::from(value.kind.unwrap_or_default()),
            receivers,
            read_by,
            meta: value.meta.unwrap_or_default(),
            created_at,
            updated_at,
        })
    }
}

impl TryFrom<Value> for Notification {
    type Error = anyhow::Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let notification = serde_json::from_value::<input::Notification>(value)
            .map_err(|err| anyhow!("notification invalid: {err}"))?;

        Self::try_from(notification)
    }
}

impl From<input::Receiver> for Receiver {
    fn from(value: input::Receiver) -> Self {
        match value {
            input::Receiver::Id(id) => Receiver::with_id(id),
            input::Receiver::Profile(profile) => Receiver {
                id: profile.id,
                email: profile.email,
                first_name: profile.first_name,
                last_name: profile.last_name,
                company: profile.company,
                job_title: profile.job_title,
            },
        }
    }
}
