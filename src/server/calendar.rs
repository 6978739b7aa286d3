use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde_json::{json, Value};

use crate::api::types::EventListQuery;
use crate::broker::Provider;

use super::auth::cookie_header;
use super::error::ApiError;
use super::AppState;

async fn bearer(state: &AppState, headers: &HeaderMap) -> Result<String, ApiError> {
    state
        .broker
        .bearer(cookie_header(headers), Provider::Calendar)
        .await
        .map_err(|e| ApiError::from_broker(e, Provider::Calendar))
}

pub async fn list_events(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<EventListQuery>,
) -> Result<Json<Value>, ApiError> {
    let params = query
        .resolve()
        .ok_or_else(|| ApiError::BadRequest("Missing timeMin or timeMax parameters".into()))?;
    let token = bearer(&state, &headers).await?;
    let events = state
        .calendar
        .list_events(&token, &params)
        .await
        .map_err(|e| ApiError::upstream(e, "Failed to fetch events"))?;
    Ok(Json(events))
}

pub async fn create_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let token = bearer(&state, &headers).await?;
    let Json(event) = body?;
    let created = state
        .calendar
        .create_event(&token, &event)
        .await
        .map_err(|e| ApiError::upstream(e, "Failed to create event"))?;
    Ok(Json(created))
}

pub async fn get_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(event_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let token = bearer(&state, &headers).await?;
    let event = state
        .calendar
        .get_event(&token, &event_id)
        .await
        .map_err(|e| ApiError::upstream(e, "Failed to fetch event"))?;
    Ok(Json(event))
}

pub async fn patch_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(event_id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let token = bearer(&state, &headers).await?;
    let Json(patch) = body?;
    let event = state
        .calendar
        .patch_event(&token, &event_id, &patch)
        .await
        .map_err(|e| ApiError::upstream(e, "Failed to update event"))?;
    Ok(Json(event))
}

pub async fn delete_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(event_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let token = bearer(&state, &headers).await?;
    state
        .calendar
        .delete_event(&token, &event_id)
        .await
        .map_err(|e| ApiError::upstream(e, "Failed to delete event"))?;
    Ok(Json(json!({ "success": true })))
}
