//! Application error handling.
//!
//! Every fallible request path returns [`AppError`], which implements
//! `actix_web::ResponseError` so handlers can lean on `?` and still produce
//! a consistent JSON error body with the right status code.
//!
//! | Variant               | HTTP status |
//! |-----------------------|-------------|
//! | `ValidationError`     | 400         |
//! | `AuthenticationError` | 401         |
//! | `AuthorizationError`  | 403         |
//! | `NotFound`            | 404         |
//! | `ConflictError`       | 409         |
//! | `DatabaseError`       | 500         |
//! | `CacheError`          | 500         |
//! | `InternalError`       | 500         |
//!
//! Boot-time configuration failures use `config::ConfigError` instead; they
//! abort startup and never turn into HTTP responses.

use thiserror::Error;

/// Application-wide request error.
#[derive(Error, Debug)]
pub enum AppError {
    /// MongoDB operation failure. The readiness probe captures this kind of
    /// failure itself instead of propagating it, so a dependency outage is
    /// reported as 503 there and 500 everywhere else.
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Redis operation failure.
    #[error("Cache error: {0}")]
    CacheError(String),

    /// Client input failed validation.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Requested resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Business-rule conflict, e.g. duplicate registration.
    #[error("Conflict error: {0}")]
    ConflictError(String),

    /// Missing, invalid, expired or revoked credentials.
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// Authenticated but lacking the required role.
    #[error("Authorization error: {0}")]
    AuthorizationError(String),

    /// Anything unexpected.
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl actix_web::ResponseError for AppError {
    fn error_response(&self) -> actix_web::HttpResponse {
        use actix_web::http::StatusCode;

        let status = match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ConflictError(_) => StatusCode::CONFLICT,
            AppError::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
            AppError::AuthorizationError(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        actix_web::HttpResponse::build(status).json(serde_json::json!({
            "error": self.to_string()
        }))
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Attaches context while converting arbitrary errors into `AppError`.
pub trait ErrorContext<T> {
    fn context(self, msg: &str) -> AppResult<T>;

    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn context(self, msg: &str) -> AppResult<T> {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", msg, e)))
    }

    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", f(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;

    #[test]
    fn test_validation_error_response() {
        let error = AppError::ValidationError("Email is required".to_string());
        let response = error.error_response();

        assert_eq!(response.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_error_response() {
        let error = AppError::NotFound("User not found".to_string());
        let response = error.error_response();

        assert_eq!(response.status(), actix_web::http::StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_conflict_error_response() {
        let error = AppError::ConflictError("Email already registered".to_string());
        let response = error.error_response();

        assert_eq!(response.status(), actix_web::http::StatusCode::CONFLICT);
    }

    #[test]
    fn test_authentication_error_response() {
        let error = AppError::AuthenticationError("Invalid token".to_string());
        let response = error.error_response();

        assert_eq!(response.status(), actix_web::http::StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_authorization_error_response() {
        let error = AppError::AuthorizationError("Insufficient permissions".to_string());
        let response = error.error_response();

        assert_eq!(response.status(), actix_web::http::StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_dependency_error_responses_are_500() {
        for error in [
            AppError::DatabaseError("connection refused".to_string()),
            AppError::CacheError("connection refused".to_string()),
            AppError::InternalError("unexpected".to_string()),
        ] {
            let response = error.error_response();
            assert_eq!(
                response.status(),
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR
            );
        }
    }

    #[test]
    fn test_error_context_trait() {
        let result: Result<(), &str> = Err("original error");
        let app_result = result.context("Additional context");

        assert!(app_result.is_err());
        if let Err(AppError::InternalError(msg)) = app_result {
            assert!(msg.contains("Additional context"));
            assert!(msg.contains("original error"));
        } else {
            panic!("Expected InternalError");
        }
    }
}
