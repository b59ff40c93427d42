//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain values to response DTOs.

use blog_core::entities::{Article, Comment, DriftReport, FollowStatus, Relationship, User};

use super::responses::{
    ArticleResponse, AuditSummaryResponse, CommentResponse, CommenterResponse, DriftResponse,
    FollowStatusResponse, RelationshipResponse, UserResponse,
};
use crate::services::AuditSummary;

// ============================================================================
// Relationship Mappers
// ============================================================================

impl From<&Relationship> for RelationshipResponse {
    fn from(relationship: &Relationship) -> Self {
        Self {
            actor_id: relationship.actor_id.to_string(),
            target_id: relationship.target_id.to_string(),
            kind: relationship.kind,
            created_at: relationship.created_at,
        }
    }
}

impl From<Relationship> for RelationshipResponse {
    fn from(relationship: Relationship) -> Self {
        Self::from(&relationship)
    }
}

impl From<FollowStatus> for FollowStatusResponse {
    fn from(status: FollowStatus) -> Self {
        Self {
            is_following: status.is_following,
            is_followed_by: status.is_followed_by,
            is_mutual: status.is_mutual(),
        }
    }
}

// ============================================================================
// Content Mappers
// ============================================================================

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            nickname: user.nickname.clone(),
            gender: user.gender.clone(),
            intro: user.intro.clone(),
            avatar: user.avatar.clone(),
            status: user.status,
            can_publish: user.can_publish(),
            can_comment: user.can_comment(),
            follower_count: user.follower_count,
            following_count: user.following_count,
            created_at: user.created_at,
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

impl From<&Article> for ArticleResponse {
    fn from(article: &Article) -> Self {
        Self {
            id: article.id.to_string(),
            author_id: article.author_id.to_string(),
            title: article.title.clone(),
            content: article.content.clone(),
            status: article.status,
            visibility: article.visibility,
            like_count: article.like_count,
            favorite_count: article.favorite_count,
            created_at: article.created_at,
            updated_at: article.updated_at,
        }
    }
}

impl From<Article> for ArticleResponse {
    fn from(article: Article) -> Self {
        Self::from(&article)
    }
}

impl From<&Comment> for CommentResponse {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id.to_string(),
            article_id: comment.article_id.to_string(),
            author_id: comment.author_id.to_string(),
            parent_id: comment.parent_id.map(|id| id.to_string()),
            content: comment.content.clone(),
            depth: comment.depth,
            status: comment.status,
            like_count: comment.like_count,
            reply_count: comment.reply_count,
            created_at: comment.created_at,
        }
    }
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self::from(&comment)
    }
}

/// Comment with its author, fetched in the same transaction
#[derive(Debug, Clone)]
pub struct CommentWithAuthor {
    pub comment: Comment,
    pub author: User,
}

impl From<&CommentWithAuthor> for CommenterResponse {
    fn from(entry: &CommentWithAuthor) -> Self {
        Self {
            author: UserResponse::from(&entry.author),
            comment: CommentResponse::from(&entry.comment),
        }
    }
}

// ============================================================================
// Audit Mappers
// ============================================================================

impl From<&DriftReport> for DriftResponse {
    fn from(report: &DriftReport) -> Self {
        Self {
            owner_id: report.counter.owner_id.to_string(),
            kind: report.counter.kind,
            stored: report.stored,
            live: report.live,
            delta: report.delta(),
        }
    }
}

impl From<DriftReport> for DriftResponse {
    fn from(report: DriftReport) -> Self {
        Self::from(&report)
    }
}

impl From<&AuditSummary> for AuditSummaryResponse {
    fn from(summary: &AuditSummary) -> Self {
        Self {
            kind: summary.kind,
            checked: summary.checked,
            drifted: summary.drifted.iter().map(DriftResponse::from).collect(),
            repaired: summary.repaired,
        }
    }
}
