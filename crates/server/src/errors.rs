use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use service::auth::errors::AuthError;
use service::errors::ServiceError;
use service::validation::FieldErrors;

/// Boundary-level failure. Validation failures keep the handler-shaped
/// `{success, message, errors}` body; everything else uses the generic
/// error envelope `{success, error: {status_code, message, details}}`.
#[derive(Debug)]
pub enum ApiError {
    Validation { status: StatusCode, message: String, errors: FieldErrors },
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Internal(String),
}

impl ApiError {
    pub fn validation(message: impl Into<String>, errors: FieldErrors) -> Self {
        Self::Validation { status: StatusCode::BAD_REQUEST, message: message.into(), errors }
    }

    /// Login failures carry the validation body shape on a 401.
    pub fn login_failed(errors: FieldErrors) -> Self {
        Self::Validation { status: StatusCode::UNAUTHORIZED, message: "Login failed.".into(), errors }
    }

    /// Map a service failure onto the boundary, labeling validation error
    /// sets with the operation's failure message.
    pub fn from_service(err: ServiceError, failure_message: &str) -> Self {
        match err {
            ServiceError::Validation(errors) => Self::validation(failure_message, errors),
            ServiceError::NotFound(detail) => Self::NotFound(detail),
            ServiceError::Repository(detail) => Self::Internal(detail),
        }
    }

    fn class_message(status: StatusCode) -> &'static str {
        match status {
            StatusCode::BAD_REQUEST => "Validation error. Please check your input.",
            StatusCode::UNAUTHORIZED => "Authentication credentials were not provided or are invalid.",
            StatusCode::FORBIDDEN => "You do not have permission to perform this action.",
            StatusCode::NOT_FOUND => "The requested resource was not found.",
            StatusCode::METHOD_NOT_ALLOWED => "Method not allowed.",
            _ => "An internal server error occurred.",
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Validation(errors) => Self::validation("Validation failed.", errors),
            AuthError::HashError(detail) | AuthError::TokenError(detail) | AuthError::Repository(detail) => {
                Self::Internal(detail)
            }
            other => Self::Unauthorized(other.to_string()),
        }
    }
}

/// Generic error envelope for a status class.
pub fn error_response(status: StatusCode, details: serde_json::Value) -> Response {
    (
        status,
        Json(json!({
            "success": false,
            "error": {
                "status_code": status.as_u16(),
                "message": ApiError::class_message(status),
                "details": details,
            }
        })),
    )
        .into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation { status, message, errors } => (
                status,
                Json(json!({
                    "success": false,
                    "message": message,
                    "errors": errors,
                })),
            )
                .into_response(),
            ApiError::Unauthorized(detail) => error_response(StatusCode::UNAUTHORIZED, json!(detail)),
            ApiError::Forbidden(detail) => error_response(StatusCode::FORBIDDEN, json!(detail)),
            ApiError::NotFound(detail) => error_response(StatusCode::NOT_FOUND, json!(detail)),
            ApiError::Internal(detail) => {
                error!(error = %detail, "internal error");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, json!(detail))
            }
        }
    }
}
