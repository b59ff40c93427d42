//! Comment entity - a root comment on an article or a reply to another comment

use chrono::{DateTime, Utc};

use crate::value_objects::{CommentStatus, EntityId};

/// Comment entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: EntityId,
    pub article_id: EntityId,
    pub author_id: EntityId,
    pub parent_id: Option<EntityId>,
    pub content: String,
    /// 1 for root comments, parent.depth + 1 for replies
    pub depth: i32,
    pub status: CommentStatus,
    /// Denormalized count of CommentLike rows
    pub like_count: i64,
    /// Denormalized count of direct replies that are not deleted
    pub reply_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    /// Create a root comment on an article
    pub fn root(id: EntityId, article_id: EntityId, author_id: EntityId, content: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            article_id,
            author_id,
            parent_id: None,
            content,
            depth: 1,
            status: CommentStatus::Normal,
            like_count: 0,
            reply_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a reply one level below `parent`, on the parent's article
    pub fn reply_to(parent: &Comment, id: EntityId, author_id: EntityId, content: String) -> Self {
        Self {
            parent_id: Some(parent.id),
            depth: parent.depth + 1,
            ..Self::root(id, parent.article_id, author_id, content)
        }
    }

    #[inline]
    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }

    /// Deleted comments behave as missing everywhere in the ledger
    #[inline]
    pub fn is_live(&self) -> bool {
        !self.status.is_deleted()
    }

    #[inline]
    pub fn is_authored_by(&self, user_id: EntityId) -> bool {
        self.author_id == user_id
    }
}
