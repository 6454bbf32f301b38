use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::db::DbError;
use crate::routes::health::HealthResponse;

/// Message returned by `/db-health` when the failure carries no text of its own
pub const DEFAULT_DB_ERROR: &str = "db error";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Database(#[from] DbError),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// Wrap a failed ping, substituting [`DEFAULT_DB_ERROR`] for an empty message.
    pub fn ping_failed(err: DbError) -> Self {
        if err.message().trim().is_empty() {
            AppError::Internal(DEFAULT_DB_ERROR.to_string())
        } else {
            AppError::Database(err)
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Request failed");

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(HealthResponse::failure(self.to_string())),
        )
            .into_response()
    }
}
