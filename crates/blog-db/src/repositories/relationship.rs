//! Relationship statements
//!
//! The primary key on (actor_id, target_id, kind) is what serializes
//! concurrent toggles: a second insert of the same key blocks until the
//! first transaction ends and then hits the conflict clause.

use sqlx::PgConnection;
use tracing::instrument;

use blog_core::entities::{Relationship, RelationshipKey, RelationshipKind};
use blog_core::traits::RepoResult;
use blog_core::value_objects::EntityId;

use crate::models::RelationshipModel;

use super::error::map_db_error;

/// Returns `true` only when a new row was written
#[instrument(skip(conn, relationship), fields(key = ?relationship.key()))]
pub async fn insert(conn: &mut PgConnection, relationship: &Relationship) -> RepoResult<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO relationships (actor_id, target_id, kind, created_at)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (actor_id, target_id, kind) DO NOTHING
        "#,
    )
    .bind(relationship.actor_id.into_inner())
    .bind(relationship.target_id.into_inner())
    .bind(relationship.kind.as_str())
    .bind(relationship.created_at)
    .execute(conn)
    .await
    .map_err(map_db_error)?;

    Ok(result.rows_affected() == 1)
}

#[instrument(skip(conn))]
pub async fn delete(conn: &mut PgConnection, key: RelationshipKey) -> RepoResult<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM relationships WHERE actor_id = $1 AND target_id = $2 AND kind = $3
        "#,
    )
    .bind(key.actor_id.into_inner())
    .bind(key.target_id.into_inner())
    .bind(key.kind.as_str())
    .execute(conn)
    .await
    .map_err(map_db_error)?;

    Ok(result.rows_affected() == 1)
}

#[instrument(skip(conn))]
pub async fn exists(conn: &mut PgConnection, key: RelationshipKey) -> RepoResult<bool> {
    sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM relationships WHERE actor_id = $1 AND target_id = $2 AND kind = $3
        )
        "#,
    )
    .bind(key.actor_id.into_inner())
    .bind(key.target_id.into_inner())
    .bind(key.kind.as_str())
    .fetch_one(conn)
    .await
    .map_err(map_db_error)
}

#[instrument(skip(conn))]
pub async fn by_target(
    conn: &mut PgConnection,
    target_id: EntityId,
    kind: RelationshipKind,
) -> RepoResult<Vec<Relationship>> {
    let rows = sqlx::query_as::<_, RelationshipModel>(
        r#"
        SELECT actor_id, target_id, kind, created_at
        FROM relationships
        WHERE target_id = $1 AND kind = $2
        ORDER BY created_at DESC, actor_id DESC
        "#,
    )
    .bind(target_id.into_inner())
    .bind(kind.as_str())
    .fetch_all(conn)
    .await
    .map_err(map_db_error)?;

    rows.into_iter().map(Relationship::try_from).collect()
}

#[instrument(skip(conn))]
pub async fn by_actor(
    conn: &mut PgConnection,
    actor_id: EntityId,
    kind: RelationshipKind,
) -> RepoResult<Vec<Relationship>> {
    let rows = sqlx::query_as::<_, RelationshipModel>(
        r#"
        SELECT actor_id, target_id, kind, created_at
        FROM relationships
        WHERE actor_id = $1 AND kind = $2
        ORDER BY created_at DESC, target_id DESC
        "#,
    )
    .bind(actor_id.into_inner())
    .bind(kind.as_str())
    .fetch_all(conn)
    .await
    .map_err(map_db_error)?;

    rows.into_iter().map(Relationship::try_from).collect()
}
