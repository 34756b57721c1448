//! # Error Handling Middleware
//!
//! This module provides a standardized way to handle errors in the Praxis
//! API. It maps domain-specific errors to appropriate HTTP status codes and
//! JSON error responses, ensuring a consistent error handling experience
//! across the entire API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use praxis_core::errors::PraxisError;
use serde_json::json;

/// Application error wrapper that provides HTTP status code mapping
///
/// `AppError` wraps domain-specific `PraxisError` instances and implements
/// `IntoResponse` to convert them into HTTP responses with appropriate
/// status codes and JSON payloads.
#[derive(Debug)]
pub struct AppError(pub PraxisError);

/// Converts application errors to HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map error types to HTTP status codes
        let status = match &self.0 {
            PraxisError::NotFound(_) => StatusCode::NOT_FOUND,
            PraxisError::Validation(_) => StatusCode::BAD_REQUEST,
            PraxisError::Authentication(_) => StatusCode::UNAUTHORIZED,
            PraxisError::Authorization(_) => StatusCode::FORBIDDEN,
            PraxisError::Conflict(_) => StatusCode::CONFLICT,
            PraxisError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            PraxisError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Get the error message and format as JSON
        let message = self.0.to_string();
        let body = Json(json!({ "error": message }));

        // Combine status code and JSON body into a response
        (status, body).into_response()
    }
}

/// Automatic conversion from PraxisError to AppError
///
/// Allows using the `?` operator with functions that return
/// `Result<T, PraxisError>` in handlers returning `Result<T, AppError>`.
impl From<PraxisError> for AppError {
    fn from(err: PraxisError) -> Self {
        AppError(err)
    }
}

/// Automatic conversion from eyre::Report to AppError
///
/// Repository failures arrive as `eyre::Report`; they surface as internal
/// database errors unless a handler maps them more precisely first.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(PraxisError::Database(err))
    }
}

/// Maps a repository error to a conflict when it was caused by a unique
/// constraint (duplicate email, duplicate token value, second profile for
/// one user), and to a database error otherwise.
pub fn conflict_or_db(err: eyre::Report, message: &str) -> AppError {
    if praxis_db::is_unique_violation(&err) {
        AppError(PraxisError::Conflict(message.to_string()))
    } else {
        AppError(PraxisError::Database(err))
    }
}
