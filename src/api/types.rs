use serde::{Deserialize, Serialize};

/// Access credential returned by the OAuth token endpoint and passed through
/// to clients unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RefreshGrant<'a> {
    pub client_id: &'a str,
    pub client_secret: &'a str,
    pub refresh_token: &'a str,
    pub grant_type: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResponse {
    pub has_refresh: bool,
    pub token_ok: bool,
    pub access_sample: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub context: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub completion: String,
}

/// Query parameters accepted by `GET /calendar/events`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventListQuery {
    pub time_min: Option<String>,
    pub time_max: Option<String>,
    pub single_events: Option<String>,
    pub order_by: Option<String>,
    pub max_results: Option<String>,
}

/// Fully resolved query sent upstream.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventListParams {
    pub time_min: String,
    pub time_max: String,
    pub single_events: String,
    pub order_by: String,
    pub max_results: String,
}

impl EventListQuery {
    /// Fills calendar defaults. `None` when either time bound is missing.
    pub fn resolve(self) -> Option<EventListParams> {
        Some(EventListParams {
            time_min: self.time_min.filter(|s| !s.is_empty())?,
            time_max: self.time_max.filter(|s| !s.is_empty())?,
            single_events: self.single_events.unwrap_or_else(|| "true".into()),
            order_by: self.order_by.unwrap_or_else(|| "startTime".into()),
            max_results: self.max_results.unwrap_or_else(|| "2500".into()),
        })
    }
}

// Generative language API (generateContent)

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
    pub safety_settings: Vec<SafetySetting>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerationConfig {
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 1024,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SafetySetting {
    pub category: &'static str,
    pub threshold: &'static str,
}

impl SafetySetting {
    pub fn defaults() -> Vec<Self> {
        ["HARM_CATEGORY_HARASSMENT", "HARM_CATEGORY_HATE_SPEECH"]
            .into_iter()
            .map(|category| Self {
                category,
                threshold: "BLOCK_MEDIUM_AND_ABOVE",
            })
            .collect()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Part {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Candidate {
    pub content: Option<Content>,
}

impl GenerateResponse {
    pub fn first_text(&self) -> Option<&str> {
        let text = self
            .candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .trim();
        (!text.is_empty()).then_some(text)
    }
}
