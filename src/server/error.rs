use axum::extract::rejection::JsonRejection;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{error, warn};

use crate::api::types::ErrorBody;
use crate::broker::{clear_cookie, Provider};
use crate::error::{CredentialError, NoteError};

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Credential {
        error: CredentialError,
        provider: Provider,
    },
    /// Upstream non-success; the status is preserved, the body is not.
    Upstream { status: u16, message: &'static str },
    Internal,
}

impl ApiError {
    /// Maps a broker failure for `provider`.
    pub fn from_broker(err: NoteError, provider: Provider) -> Self {
        match err {
            NoteError::Credential(error) => Self::Credential { error, provider },
            other => {
                error!(error = %other, provider = provider.as_str(), "token exchange failed");
                Self::Internal
            }
        }
    }

    /// Maps an upstream API failure, replacing its body with `message`.
    pub fn upstream(err: NoteError, message: &'static str) -> Self {
        match err {
            NoteError::Api { status, .. } => {
                warn!(status, message, "upstream request failed");
                Self::Upstream { status, message }
            }
            other => {
                error!(error = %other, message, "upstream request errored");
                Self::Internal
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        error!(error = %rejection, "invalid request body");
        Self::Internal
    }
}

fn error_body(message: impl Into<String>) -> Json<ErrorBody> {
    Json(ErrorBody {
        error: message.into(),
    })
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, error_body(msg)).into_response(),
            ApiError::Credential { error, provider } => {
                let mut resp = (StatusCode::UNAUTHORIZED, error_body(error.code())).into_response();
                if error == CredentialError::RefreshFailed {
                    if let Ok(value) = HeaderValue::from_str(&clear_cookie(provider)) {
                        resp.headers_mut().insert(header::SET_COOKIE, value);
                    }
                }
                resp
            }
            ApiError::Upstream { status, message } => {
                let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
                (status, error_body(message)).into_response()
            }
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_body("Internal server error"),
            )
                .into_response(),
        }
    }
}
