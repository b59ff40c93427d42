//! Response DTOs
//!
//! All response DTOs implement `Serialize` for JSON output.
//! Ids are serialized as strings for JavaScript compatibility.

use blog_core::{
    ArticleStatus, CommentStatus, CounterKind, RelationshipKind, UserStatus, Visibility,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

// ============================================================================
// Relationship Responses
// ============================================================================

/// One relationship row
#[derive(Debug, Clone, Serialize)]
pub struct RelationshipResponse {
    pub actor_id: String,
    pub target_id: String,
    pub kind: RelationshipKind,
    pub created_at: DateTime<Utc>,
}

/// Follow facts between the caller and another user
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct FollowStatusResponse {
    pub is_following: bool,
    pub is_followed_by: bool,
    pub is_mutual: bool,
}

/// Stored follow counters of a user
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct FollowCounts {
    pub following: i64,
    pub followers: i64,
}

// ============================================================================
// Content Responses
// ============================================================================

/// User profile with counters
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub nickname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intro: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub status: UserStatus,
    pub can_publish: bool,
    pub can_comment: bool,
    pub follower_count: i64,
    pub following_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Article with counters
#[derive(Debug, Clone, Serialize)]
pub struct ArticleResponse {
    pub id: String,
    pub author_id: String,
    pub title: String,
    pub content: String,
    pub status: ArticleStatus,
    pub visibility: Visibility,
    pub like_count: i64,
    pub favorite_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Comment with counters
#[derive(Debug, Clone, Serialize)]
pub struct CommentResponse {
    pub id: String,
    pub article_id: String,
    pub author_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub content: String,
    pub depth: i32,
    pub status: CommentStatus,
    pub like_count: i64,
    pub reply_count: i64,
    pub created_at: DateTime<Utc>,
}

/// A live comment together with the user who wrote it
#[derive(Debug, Clone, Serialize)]
pub struct CommenterResponse {
    pub author: UserResponse,
    pub comment: CommentResponse,
}

// ============================================================================
// Audit Responses
// ============================================================================

/// One counter compared against its recount
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DriftResponse {
    pub owner_id: String,
    pub kind: CounterKind,
    pub stored: i64,
    pub live: i64,
    pub delta: i64,
}

/// Audit of every counter of one kind
#[derive(Debug, Clone, Serialize)]
pub struct AuditSummaryResponse {
    pub kind: CounterKind,
    pub checked: usize,
    pub drifted: Vec<DriftResponse>,
    pub repaired: bool,
}
