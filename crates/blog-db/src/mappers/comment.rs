//! Comment entity <-> model mapper

use blog_core::entities::Comment;
use blog_core::error::DomainError;
use blog_core::value_objects::{CommentStatus, EntityId};

use super::label;
use crate::models::CommentModel;

/// Convert CommentModel to Comment entity
impl TryFrom<CommentModel> for Comment {
    type Error = DomainError;

    fn try_from(model: CommentModel) -> Result<Self, Self::Error> {
        Ok(Comment {
            id: EntityId::new(model.id),
            article_id: EntityId::new(model.article_id),
            author_id: EntityId::new(model.author_id),
            parent_id: model.parent_id.map(EntityId::new),
            content: model.content,
            depth: model.depth,
            status: label("comment status", &model.status, CommentStatus::parse)?,
            like_count: model.like_count,
            reply_count: model.reply_count,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn model(status: &str) -> CommentModel {
        CommentModel {
            id: 30,
            article_id: 10,
            author_id: 5,
            parent_id: Some(20),
            content: "agreed".to_string(),
            depth: 2,
            status: status.to_string(),
            like_count: 0,
            reply_count: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_reply_row_keeps_parent() {
        let comment = Comment::try_from(model("deleted")).unwrap();
        assert_eq!(comment.parent_id, Some(EntityId::new(20)));
        assert_eq!(comment.depth, 2);
        assert!(comment.status.is_deleted());
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let err = Comment::try_from(model("hidden")).unwrap_err();
        assert!(matches!(err, DomainError::DatabaseError(_)));
    }
}
