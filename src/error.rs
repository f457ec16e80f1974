use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

/// A single field-level validation failure, reported alongside every other
/// one so callers see the full list rather than just the first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, ThisError)]
pub enum DoormanError {
    #[error("request validation failed")]
    Validation(Vec<FieldViolation>),

    #[error("User already exists with this UserName")]
    Conflict,

    /// Deliberately identical for an unknown user name and a wrong
    /// password; the response must not reveal which one failed.
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("invalid or missing bearer token")]
    InvalidToken,

    #[error("bearer token expired")]
    TokenExpired,

    #[error("User with ID {0} not found")]
    NotFound(i64),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("database error: {0}")]
    Database(#[from] SqlxError),

    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("password hash error: {0}")]
    Hash(#[from] argon2::password_hash::Error),
}

impl IntoResponse for DoormanError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_body) = match self {
            DoormanError::Validation(fields) => (
                StatusCode::BAD_REQUEST,
                ApiErrorBody {
                    code: "VALIDATION_ERROR".to_string(),
                    message: "request validation failed".to_string(),
                    fields: Some(fields),
                },
            ),
            DoormanError::Conflict => (
                StatusCode::CONFLICT,
                ApiErrorBody::new("CONFLICT", "User already exists with this UserName"),
            ),
            DoormanError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ApiErrorBody::new("UNAUTHORIZED", "Invalid username or password"),
            ),
            DoormanError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                ApiErrorBody::new("UNAUTHORIZED", "invalid or missing bearer token"),
            ),
            DoormanError::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                ApiErrorBody::new("UNAUTHORIZED", "bearer token expired"),
            ),
            DoormanError::NotFound(id) => (
                StatusCode::NOT_FOUND,
                ApiErrorBody::new("NOT_FOUND", format!("User with ID {id} not found")),
            ),
            DoormanError::Storage(msg) => (
                StatusCode::BAD_REQUEST,
                ApiErrorBody::new("STORAGE_ERROR", msg),
            ),
            DoormanError::Database(_) | DoormanError::Token(_) | DoormanError::Hash(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiErrorBody::new("INTERNAL_ERROR", "An internal server error occurred."),
            ),
        };
        (status, Json(ApiErrorResponse { error: error_body })).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldViolation>>,
}

impl ApiErrorBody {
    fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            fields: None,
        }
    }
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}
