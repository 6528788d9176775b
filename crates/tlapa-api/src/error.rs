//! # API Error Type
//!
//! Unified error type for commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Tlapa POS                              │
//! │                                                                         │
//! │  Command Function                                                       │
//! │  Result<T, ApiError>                                                    │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ValidationError ─┐                                                     │
//! │  CoreError ───────┼──► kind() ──► ErrorCode + status ──► ApiError       │
//! │  DbError ─────────┘                                                     │
//! │                                                                         │
//! │  Validation → 400   NotFound → 404   Conflict → 409   Internal → 500    │
//! │                                                                         │
//! │  Internal: detail goes to the log, the caller gets a generic message    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Shape
//! Whatever transport sits in front of the commands answers with
//! [`ApiError::status`] and [`ApiError::body`]:
//! ```json
//! { "error": "Insufficient stock for \"Martillo\": available 2, requested 3" }
//! ```

use serde::Serialize;
use ts_rs::TS;

use tlapa_core::{CoreError, ErrorKind, ValidationError};
use tlapa_db::DbError;

const INTERNAL_MESSAGE: &str = "Internal server error";

/// API error returned from commands.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input validation failed (400)
    ValidationError,

    /// Resource not found (404)
    NotFound,

    /// Stock, state or uniqueness conflict (409)
    Conflict,

    /// Internal server error (500)
    Internal,
}

impl From<ErrorKind> for ErrorCode {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Validation => ErrorCode::ValidationError,
            ErrorKind::NotFound => ErrorCode::NotFound,
            ErrorKind::Conflict => ErrorCode::Conflict,
            ErrorKind::Internal => ErrorCode::Internal,
        }
    }
}

impl ErrorCode {
    /// The taxonomy kind behind this code.
    pub fn kind(self) -> ErrorKind {
        match self {
            ErrorCode::ValidationError => ErrorKind::Validation,
            ErrorCode::NotFound => ErrorKind::NotFound,
            ErrorCode::Conflict => ErrorKind::Conflict,
            ErrorCode::Internal => ErrorKind::Internal,
        }
    }
}

/// JSON body of a failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct ErrorBody {
    pub error: String,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: i64) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error. The detail is logged, not returned.
    pub fn internal(detail: impl std::fmt::Display) -> Self {
        tracing::error!(error = %detail, "Internal error");
        ApiError::new(ErrorCode::Internal, INTERNAL_MESSAGE)
    }

    /// HTTP-equivalent status code.
    pub fn status(&self) -> u16 {
        self.code.kind().status_code()
    }

    /// The `{error}` body sent to the caller.
    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            error: self.message.clone(),
        }
    }

    fn from_kind(kind: ErrorKind, err: &dyn std::error::Error) -> Self {
        match kind {
            ErrorKind::Internal => ApiError::internal(err),
            other => ApiError::new(other.into(), err.to_string()),
        }
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::ForeignKeyViolation { message } => {
                tracing::warn!(%message, "Foreign key violation");
                ApiError::validation("Invalid reference")
            }
            other => ApiError::from_kind(other.kind(), &other),
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        ApiError::from_kind(err.kind(), &err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// A request body that could not be decoded.
impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::validation(format!("Invalid request body: {}", err))
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
