use super::{Error, NotificationsApi, NotificationsApiConfig};
use crate::{dto::input, model::Notification};
use async_trait::async_trait;
use reqwest::{header, Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

pub struct NotificationsApiImpl {
    config: NotificationsApiConfig,
    client: Client,
}

impl NotificationsApiImpl {
    pub fn new(config: NotificationsApiConfig, client: Client) -> Self {
        Self { config, client }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url.trim_end_matches('/'))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, Error> {
        let response = request
            .header(header::CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status(status));
        }

        Ok(response)
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, Error> {
        let bytes = response.bytes().await?;

        serde_json::from_slice(&bytes).map_err(|err| Error::InvalidResponse(err.to_string()))
    }

    ///
    /// Reads body of a response whose status already confirmed the action.
    /// Empty or undecodable body yields `None`.
    ///
    async fn parse_confirmation<T: DeserializeOwned>(response: Response) -> Option<T> {
        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(%err, "failed to read confirmation body");
                return None;
            }
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return None;
        }

        serde_json::from_slice(&bytes)
            .inspect_err(|err| tracing::warn!(%err, "unexpected confirmation body"))
            .ok()
    }
}

#[async_trait]
impl NotificationsApi for NotificationsApiImpl {
    #[tracing::instrument(name = "Notifications Api", skip_all)]
    async fn fetch_notifications(&self) -> Result<Vec<Notification>, Error> {
        tracing::debug!("fetching notifications");

        let response = self.send(self.client.get(self.url("/notifications"))).await?;
        let snapshot = Self::parse::<input::NotificationsSnapshot>(response).await?;

        let items = snapshot.into_items();
        let received = items.len();
        let notifications = items
            .into_iter()
            .filter_map(|item| match Notification::try_from(item) {
                Ok(notification) => Some(notification),
                Err(err) => {
                    tracing::warn!(%err, "skipping notification");
                    None
                }
            })
            .collect::<Vec<_>>();

        tracing::debug!(received, valid = notifications.len(), "fetched notifications");

        Ok(notifications)
    }

    #[tracing::instrument(name = "Notifications Api", skip_all, fields(id = %id))]
    async fn mark_as_read(&self, id: &str) -> Result<Option<Notification>, Error> {
        tracing::debug!("marking notification as read");

        let url = self.url(&format!("/notifications/{}/read", urlencoding::encode(id)));
        let response = self.send(self.client.patch(url)).await?;
        let notification = Self::parse_confirmation::<input::Notification>(response)
            .await
            .and_then(|notification| {
                Notification::try_from(notification)
                    .inspect_err(|err| tracing::warn!(%err, "confirmation is not a notification"))
                    .ok()
            });

        Ok(notification)
    }

    #[tracing::instrument(name = "Notifications Api", skip_all)]
    async fn mark_all_as_read(&self) -> Result<Option<String>, Error> {
        tracing::debug!("marking all notifications as read");

        let url = self.url("/notifications/mark-all-read");
        let response = self.send(self.client.patch(url)).await?;
        let message = Self::parse_confirmation::<input::MessageResponse>(response).await;

        Ok(message.map(|response| response.message))
    }

    #[tracing::instrument(name = "Notifications Api", skip_all, fields(id = %id, user_id = %user_id))]
    async fn delete_notification(
        &self,
        id: &str,
        user_id: &str,
    ) -> Result<Option<String>, Error> {
        tracing::debug!("deleting notification");

        let url = self.url(&format!(
            "/notifications/{}?userId={}",
            urlencoding::encode(id),
            urlencoding::encode(user_id)
        ));
        let response = self.send(self.client.delete(url)).await?;
        let message = Self::parse_confirmation::<input::MessageResponse>(response).await;

        Ok(message.map(|response| response.message))
    }
}
