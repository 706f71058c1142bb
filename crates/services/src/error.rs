use reqwest::StatusCode;
use thiserror::Error;

use storage::StorageError;

/// Failures below the HTTP layer: the backend never produced a response.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors surfaced by the authenticated request pipeline.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    /// The backend could not be reached at all.
    #[error("backend unreachable: {0}")]
    Unreachable(#[from] TransportError),

    /// The backend answered with a non-success status.
    #[error("request failed with status {status}")]
    Status {
        status: StatusCode,
        detail: Option<String>,
    },

    /// A token refresh was attempted and failed; the local session has been
    /// cleared and the caller must re-authenticate.
    #[error("session expired")]
    SessionExpired(#[source] Box<ApiError>),

    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ApiError {
    /// Status code of the failed request, when the backend did answer.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::SessionExpired(inner) => inner.status(),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizTakeError {
    #[error("quiz session has no questions")]
    Empty,

    #[error("quiz session is closed or has expired")]
    Closed,

    #[error("no question at position {index}")]
    UnknownIndex { index: u32 },

    #[error(transparent)]
    Api(#[from] ApiError),
}
