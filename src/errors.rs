use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bb8_postgres::tokio_postgres;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LocatorError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Chai spot {0} not found")]
    NotFound(String),

    #[error("Places provider error: {0}")]
    Upstream(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

pub type LocatorResult<T> = Result<T, LocatorError>;

impl LocatorError {
    pub fn kind(&self) -> &'static str {
        match self {
            LocatorError::Validation(_) => "validation",
            LocatorError::NotFound(_) => "not_found",
            LocatorError::Upstream(_) => "upstream",
            LocatorError::Storage(_) => "storage",
        }
    }

    /// Upstream and storage failures stay on 500 for existing clients,
    /// a missing spot is reported as 404 rather than the old 500.
    pub fn status_code(&self) -> StatusCode {
        match self {
            LocatorError::Validation(_) => StatusCode::BAD_REQUEST,
            LocatorError::NotFound(_) => StatusCode::NOT_FOUND,
            LocatorError::Upstream(_) | LocatorError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for LocatorError {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            Json(json!({
                "error": self.to_string(),
                "kind": self.kind(),
            })),
        )
            .into_response()
    }
}

impl From<tokio_postgres::Error> for LocatorError {
    fn from(err: tokio_postgres::Error) -> Self {
        LocatorError::Storage(err.to_string())
    }
}

impl From<JsonRejection> for LocatorError {
    fn from(rejection: JsonRejection) -> Self {
        LocatorError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for LocatorError {
    fn from(rejection: QueryRejection) -> Self {
        LocatorError::Validation(rejection.body_text())
    }
}
