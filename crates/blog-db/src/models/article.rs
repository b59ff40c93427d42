//! Article database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for articles table
#[derive(Debug, Clone, FromRow)]
pub struct ArticleModel {
    pub id: i64,
    pub author_id: i64,
    pub title: String,
    pub content: String,
    pub status: String,
    pub visibility: String,
    pub like_count: i64,
    pub favorite_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

