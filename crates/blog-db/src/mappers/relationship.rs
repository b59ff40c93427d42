//! Relationship entity <-> model mapper

use blog_core::entities::{Relationship, RelationshipKind};
use blog_core::error::DomainError;
use blog_core::value_objects::EntityId;

use crate::models::RelationshipModel;

/// Convert RelationshipModel to Relationship entity
///
/// Fails on a kind label this build does not know.
impl TryFrom<RelationshipModel> for Relationship {
    type Error = DomainError;

    fn try_from(model: RelationshipModel) -> Result<Self, Self::Error> {
        let kind = RelationshipKind::parse(&model.kind).ok_or_else(|| {
            DomainError::DatabaseError(format!("unknown relationship kind: {}", model.kind))
        })?;

        Ok(Relationship {
            actor_id: EntityId::new(model.actor_id),
            target_id: EntityId::new(model.target_id),
            kind,
            created_at: model.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn model(kind: &str) -> RelationshipModel {
        RelationshipModel {
            actor_id: 5,
            target_id: 10,
            kind: kind.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_known_kind() {
        let rel = Relationship::try_from(model("comment_like")).expect("known kind");
        assert_eq!(rel.kind, RelationshipKind::CommentLike);
        assert_eq!(rel.actor_id, EntityId::new(5));
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let err = Relationship::try_from(model("bookmark")).unwrap_err();
        assert!(matches!(err, DomainError::DatabaseError(_)));
    }
}
