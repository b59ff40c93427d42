//! Article entity - a published blog post

use chrono::{DateTime, Utc};

use crate::value_objects::{ArticleStatus, EntityId, Visibility};

/// Article entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub id: EntityId,
    pub author_id: EntityId,
    pub title: String,
    pub content: String,
    pub status: ArticleStatus,
    pub visibility: Visibility,
    /// Denormalized count of Like rows
    pub like_count: i64,
    /// Denormalized count of Favorite rows
    pub favorite_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Article {
    /// Create a new public, active article
    pub fn new(id: EntityId, author_id: EntityId, title: String, content: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            author_id,
            title,
            content,
            status: ArticleStatus::Active,
            visibility: Visibility::Public,
            like_count: 0,
            favorite_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Soft-deleted articles behave as missing everywhere in the ledger
    #[inline]
    pub fn is_live(&self) -> bool {
        self.status != ArticleStatus::Deleted
    }

    #[inline]
    pub fn is_authored_by(&self, user_id: EntityId) -> bool {
        self.author_id == user_id
    }

    /// Replace title and/or content
    pub fn edit(&mut self, title: Option<String>, content: Option<String>) {
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(content) = content {
            self.content = content;
        }
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_creation() {
        let article = Article::new(
            EntityId::new(10),
            EntityId::new(5),
            "Title".to_string(),
            "Body".to_string(),
        );
        assert!(article.is_live());
        assert!(article.is_authored_by(EntityId::new(5)));
        assert_eq!(article.like_count, 0);
        assert_eq!(article.visibility, Visibility::Public);
    }

    #[test]
    fn test_deleted_article_is_not_live() {
        let mut article = Article::new(
            EntityId::new(10),
            EntityId::new(5),
            "Title".to_string(),
            "Body".to_string(),
        );
        article.status = ArticleStatus::Banned;
        assert!(article.is_live());
        article.status = ArticleStatus::Deleted;
        assert!(!article.is_live());
    }

    #[test]
    fn test_edit_keeps_missing_fields() {
        let mut article = Article::new(
            EntityId::new(10),
            EntityId::new(5),
            "Title".to_string(),
            "Body".to_string(),
        );
        article.edit(None, Some("New body".to_string()));
        assert_eq!(article.title, "Title");
        assert_eq!(article.content, "New body");
    }
}
