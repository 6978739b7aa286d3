use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::Json;
use tracing::debug;

use crate::api::types::{CheckResponse, TokenResponse};
use crate::broker::Provider;

use super::error::ApiError;
use super::AppState;

const ACCESS_SAMPLE_LEN: usize = 8;

pub(crate) fn cookie_header(headers: &HeaderMap) -> &str {
    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

async fn token(
    state: &AppState,
    headers: &HeaderMap,
    provider: Provider,
) -> Result<Json<TokenResponse>, ApiError> {
    let token = state
        .broker
        .access_token(cookie_header(headers), provider)
        .await
        .map_err(|e| ApiError::from_broker(e, provider))?;
    Ok(Json(token))
}

async fn check(state: &AppState, headers: &HeaderMap, provider: Provider) -> Json<CheckResponse> {
    let cookies = cookie_header(headers);
    let has_refresh = state.broker.has_refresh(cookies, provider);

    let (token_ok, access_sample) = match state.broker.access_token(cookies, provider).await {
        Ok(token) => (
            true,
            token.access_token.chars().take(ACCESS_SAMPLE_LEN).collect(),
        ),
        Err(e) => {
            debug!(provider = provider.as_str(), error = %e, "credential check failed");
            (false, String::new())
        }
    };

    Json(CheckResponse {
        has_refresh,
        token_ok,
        access_sample,
    })
}

pub async fn drive_token(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<TokenResponse>, ApiError> {
    token(&state, &headers, Provider::Drive).await
}

pub async fn calendar_token(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<TokenResponse>, ApiError> {
    token(&state, &headers, Provider::Calendar).await
}

pub async fn drive_check(State(state): State<AppState>, headers: HeaderMap) -> Json<CheckResponse> {
    check(&state, &headers, Provider::Drive).await
}

pub async fn calendar_check(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Json<CheckResponse> {
    check(&state, &headers, Provider::Calendar).await
}
