//! Article statements

use sqlx::PgConnection;
use tracing::instrument;

use blog_core::entities::Article;
use blog_core::error::DomainError;
use blog_core::traits::RepoResult;
use blog_core::value_objects::{ArticleStatus, EntityId, Lifecycle, Visibility};

use crate::models::ArticleModel;

use super::error::map_db_error;

#[instrument(skip(conn))]
pub async fn find_by_id(conn: &mut PgConnection, id: EntityId) -> RepoResult<Option<Article>> {
    let result = sqlx::query_as::<_, ArticleModel>(
        r#"
        SELECT id, author_id, title, content, status, visibility, like_count, favorite_count,
               created_at, updated_at
        FROM articles
        WHERE id = $1
        "#,
    )
    .bind(id.into_inner())
    .fetch_optional(conn)
    .await
    .map_err(map_db_error)?;

    result.map(Article::try_from).transpose()
}

#[instrument(skip(conn, article), fields(article_id = %article.id))]
pub async fn insert(conn: &mut PgConnection, article: &Article) -> RepoResult<()> {
    sqlx::query(
        r#"
        INSERT INTO articles (id, author_id, title, content, status, visibility, like_count,
                              favorite_count, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        "#,
    )
    .bind(article.id.into_inner())
    .bind(article.author_id.into_inner())
    .bind(&article.title)
    .bind(&article.content)
    .bind(article.status.as_str())
    .bind(article.visibility.as_str())
    .bind(article.like_count)
    .bind(article.favorite_count)
    .bind(article.created_at)
    .bind(article.updated_at)
    .execute(conn)
    .await
    .map_err(map_db_error)?;

    Ok(())
}

#[instrument(skip(conn, article), fields(article_id = %article.id))]
pub async fn update_content(conn: &mut PgConnection, article: &Article) -> RepoResult<()> {
    let result = sqlx::query(
        r#"
        UPDATE articles SET title = $2, content = $3, updated_at = NOW() WHERE id = $1
        "#,
    )
    .bind(article.id.into_inner())
    .bind(&article.title)
    .bind(&article.content)
    .execute(conn)
    .await
    .map_err(map_db_error)?;

    if result.rows_affected() == 0 {
        return Err(DomainError::ArticleNotFound(article.id));
    }
    Ok(())
}

#[instrument(skip(conn))]
pub async fn set_status(conn: &mut PgConnection, id: EntityId, status: ArticleStatus) -> RepoResult<()> {
    set_label(conn, id, "status", status.as_str()).await
}

#[instrument(skip(conn))]
pub async fn set_visibility(
    conn: &mut PgConnection,
    id: EntityId,
    visibility: Visibility,
) -> RepoResult<()> {
    set_label(conn, id, "visibility", visibility.as_str()).await
}

async fn set_label(
    conn: &mut PgConnection,
    id: EntityId,
    column: &'static str,
    value: &'static str,
) -> RepoResult<()> {
    let sql = format!("UPDATE articles SET {column} = $2, updated_at = NOW() WHERE id = $1");
    let result = sqlx::query(&sql)
        .bind(id.into_inner())
        .bind(value)
        .execute(conn)
        .await
        .map_err(map_db_error)?;

    if result.rows_affected() == 0 {
        return Err(DomainError::ArticleNotFound(id));
    }
    Ok(())
}
