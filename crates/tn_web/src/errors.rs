use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("news item not found")]
    NotFound,

    #[error("a news item with this url already exists")]
    DuplicateUrl,

    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error(transparent)]
    Internal(#[from] tn_core::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::DuplicateUrl => (StatusCode::CONFLICT, self.to_string()),
            ApiError::InvalidUrl(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Internal(ref err) => {
                // Log the detail but don't expose it to the client.
                error!(error = %err, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
