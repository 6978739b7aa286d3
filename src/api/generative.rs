use reqwest::Client;
use tracing::{debug, warn};

use crate::api::assistant::EMPTY_COMPLETION;
use crate::api::types::{Content, GenerateRequest, GenerateResponse, GenerationConfig, Part, SafetySetting};
use crate::error::{truncate, NoteError, Result};

/// Backs `POST /ai` with a `generateContent` model. Without an API key it
/// answers with a canned mock so the editor flow can be exercised offline.
#[derive(Clone)]
pub struct GenerativeClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

pub fn mock_completion(prompt: &str) -> String {
    format!(
        "Mock AI Response: I understand you want \"{}\". This is a test response. \
         Configure ai.api_key to get real AI responses.",
        prompt
    )
}

pub fn unavailable_completion(status: u16) -> String {
    format!(
        "I'm having trouble connecting to the AI service. Please check your internet \
         connection and try again. (Error: {})",
        status
    )
}

fn system_prompt(prompt: &str, context: &str) -> String {
    let context = if context.is_empty() {
        "No context provided"
    } else {
        context
    };
    format!(
        "You are a helpful AI writing assistant. Help the user with their note-taking and writing tasks.\n\n\
         Context from their notes: {}\n\n\
         User request: {}\n\n\
         Please provide a helpful, concise response that directly addresses their request. \
         If they're asking for content generation, provide well-structured, useful content.",
        context, prompt
    )
}

impl GenerativeClient {
    pub fn new(client: Client, base_url: &str, model: &str, api_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn has_key(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Completion text for the editor. Upstream rejections become a
    /// readable fallback; transport and decode failures are returned.
    pub async fn complete(&self, prompt: &str, context: &str) -> Result<String> {
        if !self.has_key() {
            warn!("ai.api_key not configured, returning mock completion");
            return Ok(mock_completion(prompt));
        }
        match self.generate(prompt, context).await {
            Err(NoteError::Api { status, .. }) => Ok(unavailable_completion(status)),
            other => other,
        }
    }

    pub async fn generate(&self, prompt: &str, context: &str) -> Result<String> {
        let req = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: system_prompt(prompt, context),
                }],
            }],
            generation_config: GenerationConfig::default(),
            safety_settings: SafetySetting::defaults(),
        };
        debug!(model = %self.model, "calling generateContent");
        let resp = self
            .client
            .post(format!(
                "{}/models/{}:generateContent",
                self.base_url, self.model
            ))
            .query(&[("key", self.api_key.as_str())])
            .json(&req)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            warn!(status, body = %truncate(&message, 200), "generateContent failed");
            return Err(NoteError::Api { status, message });
        }

        let body = resp.json::<GenerateResponse>().await?;
        Ok(body.first_text().unwrap_or(EMPTY_COMPLETION).to_string())
    }
}
