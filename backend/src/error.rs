//! Error handling for the stock ledger server
//!
//! Report endpoints wrap failures in a `ReportEnvelope`; the export endpoint
//! returns these errors directly as `{ error: { code, message } }`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::LedgerError;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Store errors
    #[error("Record store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Ledger data inconsistent: {0}")]
    Ledger(#[from] LedgerError),

    // Export errors
    #[error("Export failed: {0}")]
    Export(String),

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Internal errors
    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Ledger(_) => "LEDGER_INCONSISTENT",
            AppError::Export(_) => "EXPORT_ERROR",
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Message safe to hand back to callers
    pub fn public_message(&self) -> String {
        match self {
            AppError::DatabaseError(_) => "A database error occurred".to_string(),
            AppError::InternalError(_) => "An internal server error occurred".to_string(),
            other => other.to_string(),
        }
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::StoreUnavailable(_) | AppError::DatabaseError(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Ledger(_)
            | AppError::Export(_)
            | AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        let error = ErrorDetail {
            code: self.code().to_string(),
            message: self.public_message(),
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
