use thiserror::Error;

#[derive(Debug, Error)]
pub enum NoteError {
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Config error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),
    #[error("TOML write error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("credential error: {0}")]
    Credential(#[from] CredentialError),
    #[error("splice error: {0}")]
    Splice(#[from] SpliceError),
}

pub type Result<T> = std::result::Result<T, NoteError>;

/// Failures of the refresh-token exchange. Both are terminal for the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CredentialError {
    #[error("no refresh token cookie present")]
    NoRefresh,
    #[error("refresh token was rejected by the provider")]
    RefreshFailed,
}

impl CredentialError {
    /// Wire code sent back to clients in `{"error": ...}`.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoRefresh => "NO_REFRESH",
            Self::RefreshFailed => "REFRESH_FAILED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SpliceError {
    #[error("range {from}..{to} is inverted")]
    Inverted { from: usize, to: usize },
    #[error("offset {offset} is past the end of a buffer of length {len}")]
    OutOfBounds { offset: usize, len: usize },
    #[error("offset {offset} falls inside a surrogate pair")]
    SplitsCodePoint { offset: usize },
}

/// Pulls a human-readable message out of a JSON error body, looking at
/// `error` first and then `message`.
pub fn extract_json_message(body: &str) -> Option<String> {
    let value = serde_json::from_str::<serde_json::Value>(body).ok()?;
    ["error", "message"]
        .iter()
        .find_map(|key| value.get(*key)?.as_str().map(String::from))
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}
