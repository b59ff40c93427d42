//! Counter statements
//!
//! Table and column names come from a closed match on [`CounterKind`], never
//! from input, so interpolating them into SQL is safe.

use sqlx::PgConnection;
use tracing::instrument;

use blog_core::entities::{Counter, CounterKind, CounterSource, TargetKind};
use blog_core::error::DomainError;
use blog_core::traits::RepoResult;
use blog_core::value_objects::EntityId;

use super::error::map_db_error;

/// (table, column) holding a counter
fn counter_column(kind: CounterKind) -> (&'static str, &'static str) {
    match kind {
        CounterKind::ArticleLikes => ("articles", "like_count"),
        CounterKind::ArticleFavorites => ("articles", "favorite_count"),
        CounterKind::CommentLikes => ("comments", "like_count"),
        CounterKind::CommentReplies => ("comments", "reply_count"),
        CounterKind::UserFollowers => ("users", "follower_count"),
        CounterKind::UserFollowing => ("users", "following_count"),
    }
}

/// Relative update evaluated by the database, floored at zero
#[instrument(skip(conn))]
pub async fn adjust(conn: &mut PgConnection, counter: Counter, delta: i64) -> RepoResult<Option<i64>> {
    let (table, column) = counter_column(counter.kind);
    let sql = format!(
        "UPDATE {table} SET {column} = GREATEST({column} + $2, 0) WHERE id = $1 RETURNING {column}"
    );

    sqlx::query_scalar::<_, i64>(&sql)
        .bind(counter.owner_id.into_inner())
        .bind(delta)
        .fetch_optional(conn)
        .await
        .map_err(map_db_error)
}

#[instrument(skip(conn))]
pub async fn read(conn: &mut PgConnection, counter: Counter) -> RepoResult<Option<i64>> {
    let (table, column) = counter_column(counter.kind);
    let sql = format!("SELECT {column} FROM {table} WHERE id = $1");

    sqlx::query_scalar::<_, i64>(&sql)
        .bind(counter.owner_id.into_inner())
        .fetch_optional(conn)
        .await
        .map_err(map_db_error)
}

#[instrument(skip(conn))]
pub async fn overwrite(conn: &mut PgConnection, counter: Counter, value: i64) -> RepoResult<()> {
    let (table, column) = counter_column(counter.kind);
    let sql = format!("UPDATE {table} SET {column} = $2 WHERE id = $1");

    let result = sqlx::query(&sql)
        .bind(counter.owner_id.into_inner())
        .bind(value.max(0))
        .execute(conn)
        .await
        .map_err(map_db_error)?;

    if result.rows_affected() == 0 {
        return Err(owner_not_found(counter));
    }
    Ok(())
}

#[instrument(skip(conn))]
pub async fn count_live(conn: &mut PgConnection, counter: Counter) -> RepoResult<i64> {
    let owner = counter.owner_id.into_inner();
    let query = match counter.kind.source() {
        CounterSource::Targeted(kind) => sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM relationships WHERE target_id = $1 AND kind = $2",
        )
        .bind(owner)
        .bind(kind.as_str()),
        CounterSource::Acted(kind) => sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM relationships WHERE actor_id = $1 AND kind = $2",
        )
        .bind(owner)
        .bind(kind.as_str()),
        CounterSource::LiveReplies => sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM comments WHERE parent_id = $1 AND status <> 'deleted'",
        )
        .bind(owner),
    };

    query.fetch_one(conn).await.map_err(map_db_error)
}

#[instrument(skip(conn))]
pub async fn owners(conn: &mut PgConnection, kind: CounterKind) -> RepoResult<Vec<EntityId>> {
    let (table, _) = counter_column(kind);
    let sql = format!("SELECT id FROM {table} ORDER BY id");

    let ids = sqlx::query_scalar::<_, i64>(&sql)
        .fetch_all(conn)
        .await
        .map_err(map_db_error)?;

    Ok(ids.into_iter().map(EntityId::new).collect())
}

fn owner_not_found(counter: Counter) -> DomainError {
    match counter.kind.owner() {
        TargetKind::Article => DomainError::ArticleNotFound(counter.owner_id),
        TargetKind::Comment => DomainError::CommentNotFound(counter.owner_id),
        TargetKind::User => DomainError::UserNotFound(counter.owner_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_counter_has_a_column_on_its_owner() {
        for kind in CounterKind::ALL {
            let (table, column) = counter_column(kind);
            assert!(column.ends_with("_count"));
            let expected = match kind.owner() {
                TargetKind::Article => "articles",
                TargetKind::Comment => "comments",
                TargetKind::User => "users",
            };
            assert_eq!(table, expected);
        }
    }
}
