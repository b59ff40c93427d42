//! Service layer error types
//!
//! Provides a unified error type for all service operations.

use blog_common::{domain_status, AppError};
use blog_core::DomainError;
use std::fmt;

/// Broad failure categories a caller branches on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidOperation,
    Unauthorized,
    Validation,
    Conflict,
    Internal,
}

/// Service layer error type
#[derive(Debug)]
pub enum ServiceError {
    /// Domain rule violation or storage failure
    Domain(DomainError),

    /// Request input rejected before any storage access
    Validation(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain(e) => write!(f, "{e}"),
            Self::Validation(msg) => write!(f, "Validation error: {msg}"),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Domain(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

impl ServiceError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Domain(e) if e.is_not_found() => ErrorKind::NotFound,
            Self::Domain(e) if e.is_invalid_operation() => ErrorKind::InvalidOperation,
            Self::Domain(e) if e.is_authorization() => ErrorKind::Unauthorized,
            Self::Domain(e) if e.is_validation() => ErrorKind::Validation,
            Self::Domain(e) if e.is_conflict() => ErrorKind::Conflict,
            Self::Domain(_) => ErrorKind::Internal,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Domain(e) => domain_status(e),
            Self::Validation(_) => 400,
        }
    }

    /// Get the error code for API responses
    pub fn error_code(&self) -> &str {
        match self {
            Self::Domain(e) => e.code(),
            Self::Validation(_) => "VALIDATION_ERROR",
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Domain(e) => AppError::Domain(e),
            ServiceError::Validation(msg) => AppError::Validation(msg),
        }
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use blog_core::EntityId;

    #[test]
    fn test_not_found_error() {
        let err = ServiceError::from(DomainError::ArticleNotFound(EntityId::new(10)));
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.error_code(), "UNKNOWN_ARTICLE");
        assert!(err.to_string().contains("Article not found: 10"));
    }

    #[test]
    fn test_invalid_operation_error() {
        let err = ServiceError::from(DomainError::SelfFollow);
        assert_eq!(err.kind(), ErrorKind::InvalidOperation);
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_unauthorized_error() {
        let err = ServiceError::from(DomainError::NotCommentAuthor);
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert_eq!(err.status_code(), 403);
    }

    #[test]
    fn test_validation_error() {
        let err = ServiceError::validation("Comment content is required");
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_conflict_error() {
        let err = ServiceError::from(DomainError::UsernameTaken);
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(err.status_code(), 409);
    }

    #[test]
    fn test_convert_to_app_error() {
        let service_err = ServiceError::from(DomainError::CommentNotFound(EntityId::new(456)));
        let app_err: AppError = service_err.into();
        assert_eq!(app_err.status_code(), 404);
    }
}
