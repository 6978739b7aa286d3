//! HTTP surface: token broker routes, the calendar proxy and the assistant
//! endpoint.

pub mod ai;
pub mod auth;
pub mod calendar;
pub mod error;

use axum::routing::{get, post};
use axum::{Json, Router};
use reqwest::Client;
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::calendar::CalendarClient;
use crate::api::generative::GenerativeClient;
use crate::api::oauth::OAuthClient;
use crate::broker::TokenBroker;
use crate::config::AppConfig;
use crate::error::Result;

/// Shared per-process handles. Holds no per-request state.
#[derive(Clone)]
pub struct AppState {
    pub broker: TokenBroker,
    pub calendar: CalendarClient,
    pub ai: GenerativeClient,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> Self {
        let client = Client::new();
        let google = &config.google;
        let oauth = OAuthClient::new(
            client.clone(),
            &google.token_url,
            &google.client_id,
            &google.client_secret,
        );
        Self {
            broker: TokenBroker::new(oauth),
            calendar: CalendarClient::new(client.clone(), &google.calendar_base_url),
            ai: GenerativeClient::new(
                client,
                &config.ai.base_url,
                &config.ai.model,
                &config.ai.api_key,
            ),
        }
    }
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/auth/drive/token", post(auth::drive_token))
        .route("/auth/calendar/token", post(auth::calendar_token))
        .route("/auth/drive/check", get(auth::drive_check))
        .route("/auth/calendar/check", get(auth::calendar_check))
        .route(
            "/calendar/events",
            get(calendar::list_events).post(calendar::create_event),
        )
        .route(
            "/calendar/events/:event_id",
            get(calendar::get_event)
                .patch(calendar::patch_event)
                .delete(calendar::delete_event),
        )
        .route("/ai", post(ai::complete))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(config: &AppConfig) -> Result<()> {
    let state = AppState::from_config(config);
    if !state.ai.has_key() {
        info!("ai.api_key is empty; /ai will return mock completions");
    }

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await?;
    Ok(())
}
