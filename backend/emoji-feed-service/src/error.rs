/// Error types for Emoji Feed Service
///
/// Every failure is terminal for the request that triggered it; nothing here
/// is retried. Errors are converted to JSON HTTP responses for API clients.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use std::collections::BTreeMap;
use thiserror::Error;

/// Result type for emoji-feed-service operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Per-field validation messages, keyed by request field name
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Application error types
#[derive(Debug, Error)]
pub enum AppError {
    /// Request payload failed validation; user-correctable
    #[error("Validation error: {message}")]
    ValidationError {
        message: String,
        field_errors: FieldErrors,
    },

    /// No actor identity, or the bearer token could not be verified
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Actor is authenticated but does not own the resource
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// The post store and the identity directory disagree
    #[error("Integrity fault: {0}")]
    Integrity(String),

    /// Database operation failed
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Identity directory call failed
    #[error("Identity directory error: {0}")]
    Directory(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Validation failure on a single request field
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        let mut field_errors = FieldErrors::new();
        field_errors.insert(field.to_string(), vec![message.clone()]);
        AppError::ValidationError {
            message,
            field_errors,
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Directory(_) => StatusCode::BAD_GATEWAY,
            AppError::Integrity(_) | AppError::DatabaseError(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        // Internal details stay in the logs
        let error_msg = match self {
            AppError::Integrity(_) | AppError::DatabaseError(_) | AppError::Internal(_) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let mut body = serde_json::json!({
            "error": error_msg,
            "status": status.as_u16(),
        });
        if let AppError::ValidationError { field_errors, .. } = self {
            body["fieldErrors"] = serde_json::json!(field_errors);
        }

        HttpResponse::build(status).json(body)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Directory(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let field_errors: FieldErrors = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let messages = errs
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect();
                (field.to_string(), messages)
            })
            .collect();

        let message = field_errors
            .values()
            .flatten()
            .next()
            .cloned()
            .unwrap_or_else(|| "invalid request".to_string());

        AppError::ValidationError {
            message,
            field_errors,
        }
    }
}
