use reqwest::StatusCode;
use thiserror::Error;

/// Fixed message reported when the chat request itself is rejected.
pub const SEND_FAILED_MESSAGE: &str = "Failed to send message";
/// Fixed message reported when the thread listing is rejected.
pub const THREADS_FAILED_MESSAGE: &str = "Failed to fetch threads";
/// Fixed message reported when history retrieval is rejected.
pub const HISTORY_FAILED_MESSAGE: &str = "Failed to fetch history";

#[derive(Debug, Error)]
pub enum ChatApiError {
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{message} (HTTP {status})")]
    Status { status: StatusCode, message: String },

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("request was cancelled")]
    Cancelled,
}

impl ChatApiError {
    #[must_use]
    pub fn status(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// Returns the HTTP status carried by this error, if any.
    #[must_use]
    pub fn http_status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Request(error) => error.status(),
            _ => None,
        }
    }
}
