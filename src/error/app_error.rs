use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

use crate::validation::FieldErrors;

#[derive(Debug)]
pub enum AppError {
    DatabaseError(sqlx::Error),
    ConfigError(String),
    InternalError(String),
    NotFound(String),
    BadRequest(String),
    Unauthorized(String),
    Validation(FieldErrors),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::DatabaseError(e) => write!(f, "Database error: {}", e),
            AppError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Validation(errors) => write!(f, "Validation failed: {} field(s)", errors.len()),
        }
    }
}

impl std::error::Error for AppError {}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::DatabaseError(err)
    }
}

impl From<std::env::VarError> for AppError {
    fn from(err: std::env::VarError) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            // Internal detail stays in server logs; clients get an opaque message.
            AppError::DatabaseError(ref e) => {
                tracing::error!("Database error: {:?}", e);
                error_body(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            AppError::ConfigError(ref msg) => {
                tracing::error!("Configuration error: {}", msg);
                error_body(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            AppError::InternalError(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                error_body(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            AppError::NotFound(ref msg) => error_body(StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(ref msg) => error_body(StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized(ref msg) => error_body(StatusCode::UNAUTHORIZED, msg),
            // Validation failures share 401 with auth failures, matching the
            // behavior clients already depend on.
            AppError::Validation(errors) => {
                let body = Json(json!({
                    "status": false,
                    "message": "validation error",
                    "errors": errors,
                }));
                (StatusCode::UNAUTHORIZED, body).into_response()
            }
        }
    }
}

fn error_body(status: StatusCode, message: &str) -> Response {
    let body = Json(json!({
        "status": false,
        "message": message,
    }));

    (status, body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::add_error;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::NotFound("Product not found".to_string())
                .into_response()
                .status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Unauthorized("Authentication required".to_string())
                .into_response()
                .status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::InternalError("boom".to_string())
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_validation_maps_to_401() {
        let mut errors = FieldErrors::new();
        add_error(&mut errors, "email", "The email field is required.");

        let response = AppError::Validation(errors).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_internal_display_is_not_leaked() {
        let err = AppError::DatabaseError(sqlx::Error::PoolClosed);
        // Display carries detail for logs, the response body must not.
        assert!(err.to_string().contains("Database error"));
    }
}
