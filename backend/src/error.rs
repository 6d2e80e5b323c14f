use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Failures surfaced by the match resolver.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("match store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("match store rejected the write: {0}")]
    StoreRejected(String),
}

/// Failures reported by a store implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("a record already exists for this pair")]
    Conflict,

    #[error("{0}")]
    Unavailable(String),

    /// A schema constraint refused the row. Retrying cannot help.
    #[error("constraint violation: {0}")]
    Rejected(String),
}

impl From<StoreError> for MatchError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict => {
                MatchError::StoreUnavailable("unresolved write conflict".to_string())
            }
            StoreError::Unavailable(reason) => MatchError::StoreUnavailable(reason),
            StoreError::Rejected(reason) => MatchError::StoreRejected(reason),
        }
    }
}

impl MatchError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, MatchError::StoreUnavailable(_))
    }
}

impl IntoResponse for MatchError {
    fn into_response(self) -> Response {
        match self {
            MatchError::InvalidInput(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
            }
            MatchError::StoreUnavailable(msg) => {
                tracing::error!("Match store unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(json!({
                        "error": "Match store unavailable. Please try again later.",
                        "retryable": true,
                    })),
                )
                    .into_response()
            }
            MatchError::StoreRejected(msg) => {
                tracing::error!("Match store rejected write: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "Request could not be stored.",
                        "retryable": false,
                    })),
                )
                    .into_response()
            }
        }
    }
}

/// Bearer token rejections.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Missing token")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    Expired,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AuthError::MissingToken => "Missing token",
            AuthError::InvalidToken | AuthError::Expired => "Invalid token",
        };
        (StatusCode::UNAUTHORIZED, Json(json!({ "error": message }))).into_response()
    }
}
