//! Relationship database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for relationships table
#[derive(Debug, Clone, FromRow)]
pub struct RelationshipModel {
    pub actor_id: i64,
    pub target_id: i64,
    pub kind: String,
    pub created_at: DateTime<Utc>,
}
