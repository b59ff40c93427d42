//! Comment statements

use sqlx::PgConnection;
use tracing::instrument;

use blog_core::entities::Comment;
use blog_core::error::DomainError;
use blog_core::traits::RepoResult;
use blog_core::value_objects::{CommentStatus, EntityId, Lifecycle};

use crate::models::CommentModel;

use super::error::map_db_error;

const COMMENT_COLUMNS: &str = "id, article_id, author_id, parent_id, content, depth, status, \
                               like_count, reply_count, created_at, updated_at";

#[instrument(skip(conn))]
pub async fn find_by_id(conn: &mut PgConnection, id: EntityId) -> RepoResult<Option<Comment>> {
    let sql = format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1");
    let result = sqlx::query_as::<_, CommentModel>(&sql)
        .bind(id.into_inner())
        .fetch_optional(conn)
        .await
        .map_err(map_db_error)?;

    result.map(Comment::try_from).transpose()
}

#[instrument(skip(conn, comment), fields(comment_id = %comment.id))]
pub async fn insert(conn: &mut PgConnection, comment: &Comment) -> RepoResult<()> {
    sqlx::query(
        r#"
        INSERT INTO comments (id, article_id, author_id, parent_id, content, depth, status,
                              like_count, reply_count, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        "#,
    )
    .bind(comment.id.into_inner())
    .bind(comment.article_id.into_inner())
    .bind(comment.author_id.into_inner())
    .bind(comment.parent_id.map(EntityId::into_inner))
    .bind(&comment.content)
    .bind(comment.depth)
    .bind(comment.status.as_str())
    .bind(comment.like_count)
    .bind(comment.reply_count)
    .bind(comment.created_at)
    .bind(comment.updated_at)
    .execute(conn)
    .await
    .map_err(map_db_error)?;

    Ok(())
}

#[instrument(skip(conn, comment), fields(comment_id = %comment.id))]
pub async fn update_content(conn: &mut PgConnection, comment: &Comment) -> RepoResult<()> {
    let result = sqlx::query(
        r#"
        UPDATE comments SET content = $2, updated_at = NOW() WHERE id = $1
        "#,
    )
    .bind(comment.id.into_inner())
    .bind(&comment.content)
    .execute(conn)
    .await
    .map_err(map_db_error)?;

    if result.rows_affected() == 0 {
        return Err(DomainError::CommentNotFound(comment.id));
    }
    Ok(())
}

/// Compare-and-set on the status column
///
/// A concurrent writer that changed the row first makes this match nothing;
/// under READ COMMITTED the `WHERE` is re-checked once that writer commits.
#[instrument(skip(conn))]
pub async fn transition_status(
    conn: &mut PgConnection,
    id: EntityId,
    from: CommentStatus,
    to: CommentStatus,
) -> RepoResult<bool> {
    let result = sqlx::query(
        r#"
        UPDATE comments SET status = $3, updated_at = NOW() WHERE id = $1 AND status = $2
        "#,
    )
    .bind(id.into_inner())
    .bind(from.as_str())
    .bind(to.as_str())
    .execute(conn)
    .await
    .map_err(map_db_error)?;

    Ok(result.rows_affected() == 1)
}

/// Comments written by `author_id`, newest first
///
/// Without a status filter, deleted comments are left out.
#[instrument(skip(conn))]
pub async fn by_author(
    conn: &mut PgConnection,
    author_id: EntityId,
    status: Option<CommentStatus>,
) -> RepoResult<Vec<Comment>> {
    let sql = format!(
        "SELECT {COMMENT_COLUMNS} FROM comments \
         WHERE author_id = $1 AND (($2::text IS NULL AND status <> 'deleted') OR status = $2) \
         ORDER BY created_at DESC, id DESC"
    );
    let rows = sqlx::query_as::<_, CommentModel>(&sql)
        .bind(author_id.into_inner())
        .bind(status.map(Lifecycle::as_str))
        .fetch_all(conn)
        .await
        .map_err(map_db_error)?;

    rows.into_iter().map(Comment::try_from).collect()
}

/// Live comments on an article, newest first
#[instrument(skip(conn))]
pub async fn by_article(conn: &mut PgConnection, article_id: EntityId) -> RepoResult<Vec<Comment>> {
    let sql = format!(
        "SELECT {COMMENT_COLUMNS} FROM comments \
         WHERE article_id = $1 AND status <> 'deleted' \
         ORDER BY created_at DESC, id DESC"
    );
    let rows = sqlx::query_as::<_, CommentModel>(&sql)
        .bind(article_id.into_inner())
        .fetch_all(conn)
        .await
        .map_err(map_db_error)?;

    rows.into_iter().map(Comment::try_from).collect()
}
