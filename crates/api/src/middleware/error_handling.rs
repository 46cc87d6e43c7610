//! # Error Handling Middleware
//!
//! Maps the domain error taxonomy to HTTP status codes and JSON error
//! responses, so every endpoint fails the same way.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use labwise_core::errors::LabError;
use serde_json::json;

/// Application error wrapper that provides HTTP status code mapping.
///
/// `AppError` wraps domain [`LabError`] instances and implements
/// `IntoResponse`, so handlers can return `Result<_, AppError>` and use `?`.
#[derive(Debug)]
pub struct AppError(pub LabError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map error types to HTTP status codes
        let status = match &self.0 {
            LabError::NotFound(_) => StatusCode::NOT_FOUND,
            LabError::Validation(_) => StatusCode::BAD_REQUEST,
            LabError::Authentication(_) => StatusCode::UNAUTHORIZED,
            LabError::Authorization(_) => StatusCode::FORBIDDEN,
            LabError::Overlap(_) => StatusCode::CONFLICT,
            LabError::CellOccupied(_) => StatusCode::CONFLICT,
            LabError::ReplaceWindow(_) => StatusCode::INTERNAL_SERVER_ERROR,
            LabError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            LabError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Get the error message and format as JSON
        let message = self.0.to_string();
        let body = Json(json!({ "error": message }));

        // Combine status code and JSON body into a response
        (status, body).into_response()
    }
}

/// Allows `?` on functions returning `Result<T, LabError>`.
impl From<LabError> for AppError {
    fn from(err: LabError) -> Self {
        AppError(err)
    }
}

/// Allows `?` on repository calls returning `Result<T, eyre::Report>`;
/// reports are treated as database failures.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(LabError::Database(err))
    }
}
