use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use crate::api::types::{CompletionRequest, CompletionResponse};

use super::error::ApiError;
use super::AppState;

const RETRY_COMPLETION: &str = "Sorry, I encountered an error. Please try again.";

fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "Internal server error",
            "completion": RETRY_COMPLETION,
        })),
    )
        .into_response()
}

pub async fn complete(
    State(state): State<AppState>,
    body: Result<Json<CompletionRequest>, JsonRejection>,
) -> Response {
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => {
            error!(error = %rejection, "invalid ai request body");
            return internal_error();
        }
    };
    if req.prompt.is_empty() {
        return ApiError::BadRequest("Prompt is required".into()).into_response();
    }

    match state.ai.complete(&req.prompt, &req.context).await {
        Ok(completion) => Json(CompletionResponse { completion }).into_response(),
        Err(e) => {
            error!(error = %e, "ai completion errored");
            internal_error()
        }
    }
}
