//! Error taxonomy for the challan integration.
//!
//! Configuration problems name the missing field so the operator can fix
//! the vendor record; authority rejections carry the remote message
//! verbatim. Nothing here is swallowed: handlers serialize every variant
//! into an `ErrorResponse` body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IntegrationError {
    /// Missing or invalid vendor configuration (client id, secret, base URL)
    #[error("configuration error: {0}")]
    Config(String),

    /// The authority answered 401 even after a forced token refresh
    #[error("authority authentication failed: {0}")]
    Unauthorized(String),

    /// The authority rejected the payload; message passed through verbatim
    #[error("authority rejected request: {0}")]
    RemoteValidation(String),

    /// Local input validation (jurisdiction mismatch, missing fields)
    #[error("validation error: {0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// The authority answered with a body we could not decode
    #[error("failed to parse authority response: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, IntegrationError>;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for IntegrationError {
    fn into_response(self) -> Response {
        let status = match &self {
            IntegrationError::Config(_) | IntegrationError::Validation(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            IntegrationError::RemoteValidation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            IntegrationError::NotFound(_) => StatusCode::NOT_FOUND,
            IntegrationError::Unauthorized(_) | IntegrationError::Network(_) => {
                StatusCode::BAD_GATEWAY
            }
            IntegrationError::Database(_)
            | IntegrationError::Parse(_)
            | IntegrationError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
