//! Request DTOs
//!
//! All request DTOs implement `Deserialize`; the ones carrying free-form
//! input also implement `Validate`.

use blog_core::EntityId;
use serde::Deserialize;
use validator::{Validate, ValidationError};

// ============================================================================
// User Requests
// ============================================================================

/// Account registration request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterUserRequest {
    #[validate(
        length(min = 2, max = 32, message = "Username must be 2-32 characters"),
        custom(function = "validate_username")
    )]
    pub username: String,

    #[validate(length(min = 1, max = 32, message = "Nickname must be 1-32 characters"))]
    pub nickname: String,
}

impl RegisterUserRequest {
    pub fn new(username: impl Into<String>, nickname: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            nickname: nickname.into(),
        }
    }
}

/// Usernames are ASCII letters, digits, `_` and `.`
fn validate_username(username: &str) -> Result<(), ValidationError> {
    let valid = username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
    if valid {
        Ok(())
    } else {
        let mut err = ValidationError::new("username_charset");
        err.message = Some("Username may only contain letters, digits, '_' and '.'".into());
        Err(err)
    }
}

// ============================================================================
// Article Requests
// ============================================================================

/// New article request; length limits come from configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PublishArticleRequest {
    pub title: String,
    pub content: String,
}

impl PublishArticleRequest {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

/// Article edit request; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EditArticleRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl EditArticleRequest {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }
}

// ============================================================================
// Comment Requests
// ============================================================================

/// New comment or reply
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCommentRequest {
    pub content: String,
    /// Comment being replied to
    #[serde(default)]
    pub parent_id: Option<EntityId>,
}

impl CreateCommentRequest {
    /// A comment directly on the article
    pub fn root(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            parent_id: None,
        }
    }

    /// A reply to `parent_id`
    pub fn reply(parent_id: EntityId, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            parent_id: Some(parent_id),
        }
    }
}

/// Comment edit request
#[derive(Debug, Clone, Deserialize)]
pub struct EditCommentRequest {
    pub content: String,
}

impl EditCommentRequest {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_validation() {
        assert!(RegisterUserRequest::new("reader_01", "Reader").validate().is_ok());

        // Too short
        assert!(RegisterUserRequest::new("a", "Reader").validate().is_err());

        // Whitespace and punctuation rejected
        assert!(RegisterUserRequest::new("two words", "Reader").validate().is_err());
        assert!(RegisterUserRequest::new("semi;colon", "Reader").validate().is_err());

        // Empty nickname
        assert!(RegisterUserRequest::new("reader", "").validate().is_err());
    }

    #[test]
    fn test_edit_article_request_is_empty() {
        assert!(EditArticleRequest::default().is_empty());
        let request = EditArticleRequest {
            title: Some("New".to_string()),
            content: None,
        };
        assert!(!request.is_empty());
    }

    #[test]
    fn test_create_comment_parent_defaults_to_none() {
        let request: CreateCommentRequest = serde_json::from_str(r#"{"content":"hi"}"#).unwrap();
        assert!(request.parent_id.is_none());
    }

    #[test]
    fn test_create_comment_parent_accepts_string_id() {
        let request: CreateCommentRequest =
            serde_json::from_str(r#"{"content":"hi","parent_id":"42"}"#).unwrap();
        assert_eq!(request.parent_id, Some(EntityId::new(42)));

        let json = r#"{"content":"hi","parent_id":"forty-two"}"#;
        assert!(serde_json::from_str::<CreateCommentRequest>(json).is_err());
    }
}
