use reqwest::Client;
use tracing::warn;

use crate::api::types::{RefreshGrant, TokenResponse};
use crate::error::{truncate, NoteError, Result};

/// Client for the OAuth token endpoint's `refresh_token` grant.
#[derive(Clone)]
pub struct OAuthClient {
    client: Client,
    token_url: String,
    client_id: String,
    client_secret: String,
}

impl OAuthClient {
    pub fn new(client: Client, token_url: &str, client_id: &str, client_secret: &str) -> Self {
        Self {
            client,
            token_url: token_url.to_string(),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
        }
    }

    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse> {
        let grant = RefreshGrant {
            client_id: &self.client_id,
            client_secret: &self.client_secret,
            refresh_token,
            grant_type: "refresh_token",
        };
        let resp = self
            .client
            .post(&self.token_url)
            .form(&grant)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            warn!(status, body = %truncate(&message, 200), "token refresh rejected");
            return Err(NoteError::Api { status, message });
        }

        let body = resp.json::<TokenResponse>().await?;
        Ok(body)
    }
}
