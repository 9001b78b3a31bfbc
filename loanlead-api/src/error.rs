/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// All handlers return `Result<T, ApiError>`; library errors convert into it
/// with `?` and every variant is matched exhaustively when the response is
/// built.
///
/// # Response body
///
/// ```json
/// {
///   "error": "validation_error",
///   "message": "Mobile number is required",
///   "details": [{ "field": "mobileNumber", "message": "Mobile number is required" }]
/// }
/// ```
///
/// Internal errors are logged and answered with a generic message.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use loanlead_shared::{
    auth::AuthError,
    leads::{ExportError, FilterError, SubmissionError},
    storage::StorageError,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400), e.g. malformed JSON
    BadRequest(String),

    /// Rejected input (400); `message` is the first violated field's message
    ValidationError {
        message: String,
        details: Vec<ValidationErrorDetail>,
    },

    /// Unauthorized (401)
    Unauthorized(String),

    /// Forbidden (403)
    Forbidden(String),

    /// Not found (404)
    NotFound(String),

    /// Internal server error (500)
    InternalError(String),
}

/// Validation error detail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "bad_request", "forbidden")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl ApiError {
    /// Validation error for a single field
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        ApiError::ValidationError {
            details: vec![ValidationErrorDetail {
                field: field.to_string(),
                message: message.clone(),
            }],
            message,
        }
    }

    /// Converts `validator` errors, listing fields in `field_order`
    ///
    /// Fields missing from `field_order` sort last, by name.
    pub fn from_validation(errors: validator::ValidationErrors, field_order: &[&str]) -> Self {
        let mut details: Vec<ValidationErrorDetail> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid {}", field)),
                })
            })
            .collect();

        let rank = |field: &str| {
            field_order
                .iter()
                .position(|f| *f == field)
                .unwrap_or(field_order.len())
        };
        details.sort_by(|a, b| {
            rank(&a.field)
                .cmp(&rank(&b.field))
                .then_with(|| a.field.cmp(&b.field))
        });

        let message = details
            .first()
            .map(|d| d.message.clone())
            .unwrap_or_else(|| "Request validation failed".to_string());

        ApiError::ValidationError { message, details }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::ValidationError { message, details } => {
                write!(f, "Validation failed: {} ({} errors)", message, details.len())
            }
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::ValidationError { message, details } => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                message,
                Some(details),
            ),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg, None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Convert storage errors to API errors
impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        ApiError::InternalError(format!("Storage error: {}", err))
    }
}

/// Convert auth errors to API errors
impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => {
                ApiError::Unauthorized("Invalid credentials".to_string())
            }
            AuthError::AccessDenied => ApiError::Forbidden("Access denied".to_string()),
            AuthError::Storage(err) => err.into(),
            AuthError::Session(err) => ApiError::InternalError(format!("Session error: {}", err)),
        }
    }
}

/// Convert lead submission errors to API errors
impl From<SubmissionError> for ApiError {
    fn from(err: SubmissionError) -> Self {
        ApiError::ValidationError {
            message: err.message().to_string(),
            details: err
                .violations
                .iter()
                .map(|v| ValidationErrorDetail {
                    field: v.field.to_string(),
                    message: v.message.to_string(),
                })
                .collect(),
        }
    }
}

/// Convert filter parameter errors to API errors
impl From<FilterError> for ApiError {
    fn from(err: FilterError) -> Self {
        ApiError::invalid_field(err.field, err.to_string())
    }
}

/// Convert CSV export errors to API errors
impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        ApiError::InternalError(format!("Export failed: {}", err))
    }
}

/// Convert JSON body rejections to API errors
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loanlead_shared::leads::FieldViolation;
    use validator::Validate;

    #[derive(Validate)]
    struct Credentials {
        #[validate(length(min = 1, message = "Username is required"))]
        username: String,
        #[validate(length(min = 1, message = "Password is required"))]
        password: String,
    }

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid input");

        let err = ApiError::NotFound("Lead not found".to_string());
        assert_eq!(err.to_string(), "Not found: Lead not found");
    }

    #[test]
    fn test_status_codes() {
        let status = |err: ApiError| err.into_response().status();

        assert_eq!(status(ApiError::invalid_field("status", "Status is required")), StatusCode::BAD_REQUEST);
        assert_eq!(status(AuthError::InvalidCredentials.into()), StatusCode::UNAUTHORIZED);
        assert_eq!(status(AuthError::AccessDenied.into()), StatusCode::FORBIDDEN);
        assert_eq!(status(ApiError::NotFound("Lead not found".into())), StatusCode::NOT_FOUND);
        assert_eq!(
            status(StorageError::Conflict("users_username_key".into()).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_submission_error_keeps_first_message() {
        let err: ApiError = SubmissionError {
            violations: vec![
                FieldViolation {
                    field: "mobileNumber",
                    message: "Mobile number is required",
                },
                FieldViolation {
                    field: "occupationType",
                    message: "Please select an occupation type",
                },
            ],
        }
        .into();

        match err {
            ApiError::ValidationError { message, details } => {
                assert_eq!(message, "Mobile number is required");
                assert_eq!(details.len(), 2);
                assert_eq!(details[1].field, "occupationType");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_validation_follows_field_order() {
        let errors = Credentials {
            username: String::new(),
            password: String::new(),
        }
        .validate()
        .unwrap_err();

        match ApiError::from_validation(errors, &["username", "password"]) {
            ApiError::ValidationError { message, details } => {
                assert_eq!(message, "Username is required");
                assert_eq!(details[1].message, "Password is required");
            }
            other => panic!("unexpected error: {}", other),
        }
    }
}
