use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{error, warn};

use crate::tickets::TicketError;
use crate::utils::response::error as error_response;
use crate::validation::FieldError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(FieldError),

    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error")]
    DatabaseError(#[from] sqlx::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) | AppError::MalformedBody(_) => "VALIDATION_ERROR",
            AppError::Conflict(_) => "CONFLICT",
            AppError::DatabaseError(_) => "DATABASE_ERROR",
        }
    }

    /// Structured payload for the error envelope's `details` field.
    fn details(&self) -> Option<Value> {
        match self {
            AppError::ValidationError(e) => Some(json!({ "field": e.field, "rule": e.rule })),
            _ => None,
        }
    }

    fn log(&self) {
        match self {
            AppError::ValidationError(e) => {
                warn!(error = ?self, field = %e.field, "Request rejected");
            }
            AppError::MalformedBody(msg) | AppError::Conflict(msg) => {
                warn!(error = ?self, message = %msg, "Request rejected");
            }
            AppError::DatabaseError(e) => {
                error!(error = ?e, "Database error");
            }
        }
    }
}

impl From<TicketError> for AppError {
    fn from(err: TicketError) -> Self {
        match err {
            TicketError::Validation(e) => AppError::ValidationError(e),
            TicketError::Conflict(ticket_id) => AppError::Conflict(format!(
                "An e-ticket with ticket_id '{ticket_id}' already exists"
            )),
            TicketError::Store(e) => AppError::DatabaseError(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();
        let details = self.details();

        // Log internal details
        self.log();

        // Only expose high-level messages to the client
        let public_message = match &self {
            AppError::ValidationError(e) => e.to_string(),
            AppError::MalformedBody(msg) | AppError::Conflict(msg) => msg.clone(),
            AppError::DatabaseError(_) => "A database error occurred".to_string(),
        };

        error_response(code, public_message, details, status)
    }
}
