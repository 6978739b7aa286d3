use reqwest::Client;
use tracing::warn;

use crate::api::types::CompletionRequest;
use crate::error::{extract_json_message, NoteError, Result};

/// Shown in place of a completion when the request fails for any reason.
pub const COMPLETION_FALLBACK: &str =
    "Sorry, I encountered an error. Please check your internet connection and try again.";

/// Used when the endpoint answers without any completion text.
pub const EMPTY_COMPLETION: &str = "Sorry, I could not generate a response.";

/// Client for the note assistant endpoint (`POST {base}/ai`).
#[derive(Clone)]
pub struct AssistantClient {
    client: Client,
    base_url: String,
}

impl AssistantClient {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    #[cfg(test)]
    pub fn new_with_base_url(base_url: &str) -> Self {
        Self::new(Client::new(), base_url)
    }

    /// Never fails: any error becomes [`COMPLETION_FALLBACK`].
    pub async fn request_completion(&self, prompt: &str, context: &str) -> String {
        match self.try_request_completion(prompt, context).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "ai completion failed");
                COMPLETION_FALLBACK.to_string()
            }
        }
    }

    pub async fn try_request_completion(&self, prompt: &str, context: &str) -> Result<String> {
        let req = CompletionRequest {
            prompt: prompt.to_string(),
            context: context.to_string(),
        };
        let resp = self
            .client
            .post(format!("{}/ai", self.base_url))
            .json(&req)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            let message = extract_json_message(&body).unwrap_or_else(|| "Unknown error".into());
            return Err(NoteError::Api { status, message });
        }

        let body = resp.json::<serde_json::Value>().await?;
        let completion = body
            .get("completion")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .unwrap_or(EMPTY_COMPLETION);
        Ok(completion.to_string())
    }
}
