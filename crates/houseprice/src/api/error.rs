//! Request-level errors and their HTTP mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ml_model::PredictionError;
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

/// Everything a handler can fail with.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request body or one of its fields could not be used.
    #[error("{0}")]
    Validation(String),

    /// The model refused the input.
    #[error(transparent)]
    Prediction(#[from] PredictionError),

    /// The settings database failed.
    #[error(transparent)]
    Storage(#[from] sqlx::Error),
}

impl ApiError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Prediction(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Body returned for every failed request.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        warn!(status = status.as_u16(), error = %self, "Request failed");

        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
