//! Exchanges a refresh-token cookie for a short-lived access token. No
//! caching and no retries: every call goes to the provider once.

use tracing::{debug, warn};

use crate::api::oauth::OAuthClient;
use crate::api::types::TokenResponse;
use crate::error::{CredentialError, NoteError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Drive,
    Calendar,
}

impl Provider {
    pub fn cookie_name(&self) -> &'static str {
        match self {
            Self::Drive => "gd_refresh",
            Self::Calendar => "gc_refresh",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Drive => "drive",
            Self::Calendar => "calendar",
        }
    }
}

/// Finds `name=value` in a `Cookie` header and URL-decodes the value.
/// A present but empty cookie yields `Some("")`.
pub fn refresh_cookie(cookie_header: &str, name: &str) -> Option<String> {
    let raw = cookie_header
        .split(';')
        .map(str::trim)
        .find_map(|pair| pair.strip_prefix(name)?.strip_prefix('='))?;
    let value = urlencoding::decode(raw)
        .map(|v| v.into_owned())
        .unwrap_or_else(|_| raw.to_string());
    Some(value)
}

/// `Set-Cookie` value that expires the provider's refresh cookie.
pub fn clear_cookie(provider: Provider) -> String {
    format!("{}=; Path=/; Max-Age=0", provider.cookie_name())
}

#[derive(Clone)]
pub struct TokenBroker {
    oauth: OAuthClient,
}

impl TokenBroker {
    pub fn new(oauth: OAuthClient) -> Self {
        Self { oauth }
    }

    /// True only for a non-empty refresh cookie.
    pub fn has_refresh(&self, cookie_header: &str, provider: Provider) -> bool {
        refresh_cookie(cookie_header, provider.cookie_name()).is_some_and(|v| !v.is_empty())
    }

    /// Provider rejection maps to [`CredentialError::RefreshFailed`]; network
    /// and decode failures are passed through unchanged.
    pub async fn access_token(
        &self,
        cookie_header: &str,
        provider: Provider,
    ) -> Result<TokenResponse> {
        let refresh = refresh_cookie(cookie_header, provider.cookie_name())
            .ok_or(CredentialError::NoRefresh)?;

        match self.oauth.refresh(&refresh).await {
            Ok(token) => {
                debug!(provider = provider.as_str(), "access token issued");
                Ok(token)
            }
            Err(NoteError::Api { status, .. }) => {
                warn!(provider = provider.as_str(), status, "refresh token rejected");
                Err(CredentialError::RefreshFailed.into())
            }
            Err(e) => Err(e),
        }
    }

    pub async fn bearer(&self, cookie_header: &str, provider: Provider) -> Result<String> {
        Ok(self.access_token(cookie_header, provider).await?.access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Client;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn setup() -> (MockServer, TokenBroker) {
        let server = MockServer::start().await;
        let oauth = OAuthClient::new(
            Client::new(),
            &format!("{}/token", server.uri()),
            "cid",
            "secret",
        );
        (server, TokenBroker::new(oauth))
    }

    #[test]
    fn parses_named_cookie() {
        let header = "theme=dark; gd_refresh=1%2F%2Fxyz; other=1";
        assert_eq!(refresh_cookie(header, "gd_refresh").as_deref(), Some("1//xyz"));
        assert_eq!(refresh_cookie(header, "gc_refresh"), None);
    }

    #[test]
    fn cookie_name_must_match_exactly() {
        assert_eq!(refresh_cookie("xgd_refresh=a", "gd_refresh"), None);
        assert_eq!(refresh_cookie("gd_refresh_old=a", "gd_refresh"), None);
    }

    #[test]
    fn value_may_contain_equals() {
        assert_eq!(
            refresh_cookie("gc_refresh=abc==", "gc_refresh").as_deref(),
            Some("abc==")
        );
    }

    #[test]
    fn empty_value_is_present_but_not_a_refresh() {
        assert_eq!(refresh_cookie("gd_refresh=", "gd_refresh").as_deref(), Some(""));
        assert_eq!(refresh_cookie("", "gd_refresh"), None);
    }

    #[test]
    fn clear_cookie_expires_immediately() {
        assert_eq!(clear_cookie(Provider::Drive), "gd_refresh=; Path=/; Max-Age=0");
        assert_eq!(clear_cookie(Provider::Calendar), "gc_refresh=; Path=/; Max-Age=0");
    }

    #[tokio::test]
    async fn missing_cookie_fails_without_network() {
        let (server, broker) = setup().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = broker
            .access_token("gc_refresh=abc", Provider::Drive)
            .await
            .unwrap_err();
        assert!(matches!(err, NoteError::Credential(CredentialError::NoRefresh)));
    }

    #[tokio::test]
    async fn exchanges_decoded_refresh_token() {
        let (server, broker) = setup().await;

        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("refresh_token=1%2F%2Fxyz"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "ya29.live",
                "expires_in": 3599,
                "token_type": "Bearer"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let token = broker
            .access_token("gd_refresh=1%2F%2Fxyz", Provider::Drive)
            .await
            .unwrap();
        assert_eq!(token.access_token, "ya29.live");
    }

    #[tokio::test]
    async fn rejection_maps_to_refresh_failed() {
        let (server, broker) = setup().await;

        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "invalid_grant"})))
            .mount(&server)
            .await;

        let err = broker
            .bearer("gc_refresh=stale", Provider::Calendar)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            NoteError::Credential(CredentialError::RefreshFailed)
        ));
    }

    #[tokio::test]
    async fn empty_cookie_is_sent_and_rejected() {
        let (server, broker) = setup().await;

        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("refresh_token=&"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "invalid_request"})))
            .expect(1)
            .mount(&server)
            .await;

        assert!(!broker.has_refresh("gd_refresh=", Provider::Drive));
        let err = broker
            .access_token("theme=dark; gd_refresh=", Provider::Drive)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            NoteError::Credential(CredentialError::RefreshFailed)
        ));
    }

    #[tokio::test]
    async fn every_call_hits_the_provider() {
        let (server, broker) = setup().await;

        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "t"})))
            .expect(2)
            .mount(&server)
            .await;

        broker.bearer("gc_refresh=r", Provider::Calendar).await.unwrap();
        broker.bearer("gc_refresh=r", Provider::Calendar).await.unwrap();
    }
}
