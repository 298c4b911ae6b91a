use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;
use storage::error::RatingError;

/// Web layer errors
#[derive(Debug)]
pub enum WebError {
    Rating(RatingError),
    NotFound(String),
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rating(e) => write!(f, "Rating error: {}", e),
            Self::NotFound(msg) => write!(f, "Not found: {}", msg),
        }
    }
}

impl WebError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Rating(RatingError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Rating(RatingError::Conflict(_)) => StatusCode::CONFLICT,
            Self::Rating(RatingError::Validation(_)) => StatusCode::BAD_REQUEST,
            Self::Rating(RatingError::Storage(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        let message = match &self {
            Self::Rating(RatingError::Storage(e)) => {
                tracing::error!("Storage error: {:?}", e);
                "An internal error occurred".to_string()
            }
            Self::Rating(e) => e.to_string(),
            Self::NotFound(msg) => msg.clone(),
        };

        (status_code, Json(json!({ "error": message }))).into_response()
    }
}

impl From<RatingError> for WebError {
    fn from(error: RatingError) -> Self {
        Self::Rating(error)
    }
}

pub type ApiResult<T> = Result<T, WebError>;
