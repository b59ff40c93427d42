//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::EntityId;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(EntityId),

    #[error("Article not found: {0}")]
    ArticleNotFound(EntityId),

    #[error("Comment not found: {0}")]
    CommentNotFound(EntityId),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Content too long: max {max} characters")]
    ContentTooLong { max: usize },

    #[error("Reply nesting too deep: max depth {max}")]
    ReplyTooDeep { max: i32 },

    // =========================================================================
    // Invalid Operations
    // =========================================================================
    #[error("Cannot follow yourself")]
    SelfFollow,

    #[error("Invalid {entity} transition: {from} -> {to}")]
    InvalidStatusTransition {
        entity: &'static str,
        from: &'static str,
        to: &'static str,
    },

    #[error("Permissions of a blocked user cannot be changed")]
    UserBlocked,

    #[error("Permissions of a reported user cannot be changed until the report is settled")]
    UserUnderReview,

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Not comment author")]
    NotCommentAuthor,

    #[error("Not article author")]
    NotArticleAuthor,

    #[error("Missing permission: {0}")]
    MissingPermission(&'static str),

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Username already in use")]
    UsernameTaken,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::ArticleNotFound(_) => "UNKNOWN_ARTICLE",
            Self::CommentNotFound(_) => "UNKNOWN_COMMENT",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::ContentTooLong { .. } => "CONTENT_TOO_LONG",
            Self::ReplyTooDeep { .. } => "REPLY_TOO_DEEP",

            // Invalid operations
            Self::SelfFollow => "SELF_FOLLOW",
            Self::InvalidStatusTransition { .. } => "INVALID_STATUS_TRANSITION",
            Self::UserBlocked => "USER_BLOCKED",
            Self::UserUnderReview => "USER_UNDER_REVIEW",

            // Authorization
            Self::NotCommentAuthor => "NOT_COMMENT_AUTHOR",
            Self::NotArticleAuthor => "NOT_ARTICLE_AUTHOR",
            Self::MissingPermission(_) => "MISSING_PERMISSIONS",

            // Conflict
            Self::UsernameTaken => "USERNAME_TAKEN",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_) | Self::ArticleNotFound(_) | Self::CommentNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_) | Self::ContentTooLong { .. } | Self::ReplyTooDeep { .. }
        )
    }

    /// Check if the request asked for something the model never allows
    pub fn is_invalid_operation(&self) -> bool {
        matches!(
            self,
            Self::SelfFollow
                | Self::InvalidStatusTransition { .. }
                | Self::UserBlocked
                | Self::UserUnderReview
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::NotCommentAuthor | Self::NotArticleAuthor | Self::MissingPermission(_)
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::UsernameTaken)
    }
}
