//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config {key}: {message}")]
    Invalid { key: &'static str, message: String },
    #[error("unsupported database driver: {0}")]
    UnsupportedDriver(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Malformed, out-of-range or ambiguous parameter or record.
    #[error("{0}")]
    Validation(String),
    #[error("malformed request body: {0}")]
    BodyDecode(String),
    #[error("No handler for {verb} on {path}")]
    MethodNotAllowed { verb: String, path: String },
    /// A value could not be converted for statement binding.
    #[error("binding: {0}")]
    Binding(String),
    #[error("not implemented")]
    NotImplemented,
    /// The request could not be taken apart (path, query or body); carries the extractor's status.
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
}

impl AppError {
    pub fn rejected(status: StatusCode, message: impl Into<String>) -> Self {
        AppError::Rejected {
            status,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BodyDecode(_) => StatusCode::BAD_REQUEST,
            AppError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            AppError::NotImplemented => StatusCode::NOT_IMPLEMENTED,
            AppError::Rejected { status, .. } => *status,
            AppError::Config(_) | AppError::Binding(_) | AppError::Db(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Wire shape of every failure body.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        ErrorResponse {
            code: err.status().as_u16(),
            message: err.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!("error handling API request: {}", self);
        let status = self.status();
        (status, Json(ErrorResponse::from(&self))).into_response()
    }
}
