//! HTTP-facing errors for the auxiliary endpoints
//!
//! `/validate` never goes through this type: its failures are part of the
//! validation result body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::iban::CalculationError;

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Calculation error: {0}")]
    Calculation(#[from] CalculationError),

    #[error("Not found: {resource}")]
    NotFound { resource: String },
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Calculation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::Calculation(_) => "CALCULATION_ERROR",
            AppError::NotFound { .. } => "NOT_FOUND",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            AppError::Calculation(e) => e.to_string(),
            AppError::NotFound { resource } => format!("{} not found", resource),
        };

        let body = ErrorResponse {
            error: self.error_code().to_string(),
            message,
        };
        (status, Json(body)).into_response()
    }
}
