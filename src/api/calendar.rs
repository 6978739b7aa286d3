use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use tracing::warn;

use crate::api::types::EventListParams;
use crate::error::{truncate, NoteError, Result};

/// Primary-calendar events API. Every call takes a fresh bearer token.
#[derive(Clone)]
pub struct CalendarClient {
    client: Client,
    base_url: String,
}

impl CalendarClient {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn events_url(&self) -> String {
        format!("{}/calendars/primary/events", self.base_url)
    }

    fn event_url(&self, event_id: &str) -> String {
        format!("{}/{}", self.events_url(), urlencoding::encode(event_id))
    }

    async fn send(&self, req: RequestBuilder, token: &str) -> Result<Response> {
        let resp = req.bearer_auth(token).send().await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            warn!(status, body = %truncate(&message, 200), "calendar API error");
            return Err(NoteError::Api { status, message });
        }
        Ok(resp)
    }

    pub async fn list_events(&self, token: &str, params: &EventListParams) -> Result<Value> {
        let req = self.client.get(self.events_url()).query(params);
        let body = self.send(req, token).await?.json::<Value>().await?;
        Ok(body)
    }

    pub async fn create_event(&self, token: &str, event: &Value) -> Result<Value> {
        let req = self.client.post(self.events_url()).json(event);
        let body = self.send(req, token).await?.json::<Value>().await?;
        Ok(body)
    }

    pub async fn get_event(&self, token: &str, event_id: &str) -> Result<Value> {
        let req = self.client.get(self.event_url(event_id));
        let body = self.send(req, token).await?.json::<Value>().await?;
        Ok(body)
    }

    pub async fn patch_event(&self, token: &str, event_id: &str, patch: &Value) -> Result<Value> {
        let req = self.client.patch(self.event_url(event_id)).json(patch);
        let body = self.send(req, token).await?.json::<Value>().await?;
        Ok(body)
    }

    pub async fn delete_event(&self, token: &str, event_id: &str) -> Result<()> {
        let req = self.client.delete(self.event_url(event_id));
        self.send(req, token).await?;
        Ok(())
    }
}
