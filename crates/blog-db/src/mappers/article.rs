//! Article entity <-> model mapper

use blog_core::entities::Article;
use blog_core::error::DomainError;
use blog_core::value_objects::{ArticleStatus, EntityId, Visibility};

use super::label;
use crate::models::ArticleModel;

/// Convert ArticleModel to Article entity
impl TryFrom<ArticleModel> for Article {
    type Error = DomainError;

    fn try_from(model: ArticleModel) -> Result<Self, Self::Error> {
        Ok(Article {
            id: EntityId::new(model.id),
            author_id: EntityId::new(model.author_id),
            title: model.title,
            content: model.content,
            status: label("article status", &model.status, ArticleStatus::parse)?,
            visibility: label("article visibility", &model.visibility, Visibility::parse)?,
            like_count: model.like_count,
            favorite_count: model.favorite_count,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
