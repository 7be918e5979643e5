//! Error handling middleware - every failure becomes `{"error": "..."}`.

use std::fmt;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};

use thoughtlane_core::DomainError;
use thoughtlane_core::ports::AuthError;
use thoughtlane_shared::ErrorResponse;

/// Application-level error type rendered at the HTTP boundary.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    Conflict(String),
    /// Logged, never shown to the client.
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::NotFound(msg)
            | AppError::BadRequest(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::Conflict(msg) => ErrorResponse::new(msg.clone()),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, .. } => {
                AppError::NotFound(format!("{} not found", capitalize(entity_type)))
            }
            DomainError::Validation(msg) => AppError::BadRequest(msg),
            DomainError::Duplicate(msg) => AppError::Conflict(msg),
            DomainError::Unauthenticated(auth) => auth.into(),
            forbidden @ DomainError::Forbidden(_) => AppError::Forbidden(forbidden.to_string()),
            storage @ DomainError::Storage(_) => AppError::Internal(storage.to_string()),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidToken(detail) => {
                tracing::debug!(%detail, "Rejected session token");
                AppError::Unauthorized("Invalid token".to_string())
            }
            AuthError::HashingError(msg) => AppError::Internal(msg),
            other => AppError::Unauthorized(other.to_string()),
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use thoughtlane_core::ports::StorageError;
    use uuid::Uuid;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (DomainError::not_found("post", Uuid::nil()), StatusCode::NOT_FOUND),
            (DomainError::Validation("Title is required".into()), StatusCode::BAD_REQUEST),
            (DomainError::Duplicate("Username already taken".into()), StatusCode::CONFLICT),
            (AuthError::MissingAuth.into(), StatusCode::UNAUTHORIZED),
            (DomainError::Forbidden("comment"), StatusCode::FORBIDDEN),
            (
                StorageError::Upload("bucket down".into()).into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (DomainError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (domain, status) in cases {
            assert_eq!(AppError::from(domain).status_code(), status);
        }
    }

    #[test]
    fn test_not_found_message_names_entity() {
        let err = AppError::from(DomainError::not_found("post", Uuid::nil()));
        assert!(matches!(err, AppError::NotFound(ref msg) if msg == "Post not found"));
    }

    #[test]
    fn test_forbidden_message() {
        let err = AppError::from(DomainError::Forbidden("post"));
        assert!(
            matches!(err, AppError::Forbidden(ref msg) if msg == "You are not the author of this post")
        );
    }

    #[test]
    fn test_hashing_failure_is_internal() {
        let err = AppError::from(AuthError::HashingError("oom".into()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
