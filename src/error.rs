// HTTP API Error Types
use axum::{extract::rejection::JsonRejection, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::auth::TokenError;
use crate::database::DatabaseError;
use crate::services::RegistrationError;

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    InvalidJson(String),

    // 401 Unauthorized
    Unauthorized(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict
    Conflict(String),

    // 500 Internal Server Error
    InternalServerError(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::InvalidJson(_) => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::Forbidden(_) => 403,
            ApiError::NotFound(_) => 404,
            ApiError::Conflict(_) => 409,
            ApiError::InternalServerError(_) => 500,
            ApiError::ServiceUnavailable(_) => 503,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::InvalidJson(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::InternalServerError(msg)
            | ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::InvalidJson(_) => "INVALID_JSON",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
            ApiError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        json!({
            "error": self.message(),
            "code": self.error_code()
        })
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn invalid_json(message: impl Into<String>) -> Self {
        ApiError::InvalidJson(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::Conflict(constraint) => {
                tracing::warn!("Unique constraint violated: {}", constraint);
                ApiError::conflict("Record conflicts with an existing record")
            }
            DatabaseError::ConfigMissing(_) | DatabaseError::InvalidDatabaseUrl => {
                tracing::error!("Database misconfigured: {}", err);
                ApiError::service_unavailable("Database temporarily unavailable")
            }
            DatabaseError::Sqlx(sqlx_err) => {
                // Log the real error but return generic message
                tracing::error!("SQLx error: {}", sqlx_err);
                ApiError::internal_server_error("Database error occurred")
            }
        }
    }
}

impl From<RegistrationError> for ApiError {
    fn from(err: RegistrationError) -> Self {
        match err {
            RegistrationError::Store(db_err) => db_err.into(),
            RegistrationError::Password(pw_err) => {
                tracing::error!("Password hashing failed: {}", pw_err);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        tracing::error!("Session token error: {}", err);
        ApiError::internal_server_error("Failed to establish session")
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::invalid_json(rejection.body_text())
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn error_body_carries_message_and_code() {
        let err = ApiError::forbidden("Unauthorized access");
        assert_eq!(err.status_code(), 403);
        assert_eq!(
            err.to_json(),
            json!({ "error": "Unauthorized access", "code": "FORBIDDEN" })
        );
    }

    #[test]
    fn storage_failures_are_not_leaked() {
        let sqlx_err = sqlx::Error::Protocol("relation \"x\" does not exist".to_string());
        let err: ApiError = DatabaseError::Sqlx(sqlx_err).into();
        assert_eq!(err.status_code(), 500);
        assert!(!err.message().contains("relation"));
    }

    #[test]
    fn conflicts_map_to_409() {
        let err: ApiError = DatabaseError::Conflict("user_particulars_email_idx".to_string()).into();
        assert_eq!(err.status_code(), 409);

        let err: ApiError = RegistrationError::Store(DatabaseError::Conflict("x".to_string())).into();
        assert_eq!(err.status_code(), 409);
    }
}
