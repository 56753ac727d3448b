use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::ApiResponse;
use crate::services::AuthError;

/// One field-level problem inside a `ValidationError` payload.
#[derive(Debug, Clone, serde::Serialize)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

impl FieldIssue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),

    DatabaseError(String),

    ValidationError {
        message: String,
        fields: Vec<FieldIssue>,
    },

    Conflict(String),

    InternalError(String),

    /// Bad credentials / inactive account / passwordless account. One
    /// message for all sub-cases so accounts cannot be enumerated.
    AuthenticationFailed,

    /// No valid session. A missing token is treated identically to an
    /// invalid or expired one.
    Unauthenticated,

    /// Valid session, insufficient capability.
    Forbidden(String),

    /// Valid session and sufficient capability in general, but the
    /// operation targets the actor's own account in a disallowed way.
    SelfModification,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            ApiError::ValidationError { message, .. } => write!(f, "Validation error: {}", message),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            ApiError::AuthenticationFailed => write!(f, "Authentication failed"),
            ApiError::Unauthenticated => write!(f, "Not authenticated"),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::SelfModification => write!(f, "Self-modification not permitted"),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message, fields) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, Vec::new()),
            ApiError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                    Vec::new(),
                )
            }
            ApiError::ValidationError { message, fields } => {
                (StatusCode::BAD_REQUEST, message, fields)
            }
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg, Vec::new()),
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                    Vec::new(),
                )
            }
            ApiError::AuthenticationFailed => (
                StatusCode::UNAUTHORIZED,
                "Invalid credentials".to_string(),
                Vec::new(),
            ),
            ApiError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                "Not authenticated".to_string(),
                Vec::new(),
            ),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg, Vec::new()),
            ApiError::SelfModification => (
                StatusCode::FORBIDDEN,
                "Operation not permitted on your own account".to_string(),
                Vec::new(),
            ),
        };

        let body = if fields.is_empty() {
            ApiResponse::<()>::error(error_message)
        } else {
            ApiResponse::<()>::error_with_details(error_message, fields)
        };

        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed => ApiError::AuthenticationFailed,
            AuthError::Database(msg) => ApiError::DatabaseError(msg),
            AuthError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

impl ApiError {
    pub fn not_found(resource: &str, id: impl fmt::Display) -> Self {
        ApiError::NotFound(format!("{} {} not found", resource, id))
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::ValidationError {
            message: msg.into(),
            fields: Vec::new(),
        }
    }

    pub fn validation_fields(msg: impl Into<String>, fields: Vec<FieldIssue>) -> Self {
        ApiError::ValidationError {
            message: msg.into(),
            fields,
        }
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        ApiError::Conflict(msg.into())
    }

    pub fn forbidden(capability: impl fmt::Display) -> Self {
        ApiError::Forbidden(format!("Missing capability: {}", capability))
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        ApiError::InternalError(msg.into())
    }
}
