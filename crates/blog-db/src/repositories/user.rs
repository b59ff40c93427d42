//! User statements

use sqlx::PgConnection;
use tracing::instrument;

use blog_core::entities::User;
use blog_core::error::DomainError;
use blog_core::traits::RepoResult;
use blog_core::value_objects::{EntityId, Lifecycle, UserPermissions, UserStatus};

use crate::mappers::ProfileColumns;
use crate::models::UserModel;

use super::error::{map_db_error, map_unique_violation};

const USER_COLUMNS: &str = "id, username, nickname, gender, intro, avatar, status, permissions, \
                            follower_count, following_count, created_at, updated_at";

#[instrument(skip(conn))]
pub async fn find_by_id(conn: &mut PgConnection, id: EntityId) -> RepoResult<Option<User>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
    let result = sqlx::query_as::<_, UserModel>(&sql)
        .bind(id.into_inner())
        .fetch_optional(conn)
        .await
        .map_err(map_db_error)?;

    result.map(User::try_from).transpose()
}

#[instrument(skip(conn))]
pub async fn find_by_username(conn: &mut PgConnection, username: &str) -> RepoResult<Option<User>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");
    let result = sqlx::query_as::<_, UserModel>(&sql)
        .bind(username)
        .fetch_optional(conn)
        .await
        .map_err(map_db_error)?;

    result.map(User::try_from).transpose()
}

#[instrument(skip(conn, user), fields(user_id = %user.id))]
pub async fn insert(conn: &mut PgConnection, user: &User) -> RepoResult<()> {
    sqlx::query(
        r#"
        INSERT INTO users (id, username, nickname, gender, intro, avatar, status, permissions,
                           follower_count, following_count, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        "#,
    )
    .bind(user.id.into_inner())
    .bind(&user.username)
    .bind(&user.nickname)
    .bind(user.gender.as_deref())
    .bind(user.intro.as_deref())
    .bind(user.avatar.as_deref())
    .bind(user.status.as_str())
    .bind(user.permissions.bits())
    .bind(user.follower_count)
    .bind(user.following_count)
    .bind(user.created_at)
    .bind(user.updated_at)
    .execute(conn)
    .await
    .map_err(|e| map_unique_violation(e, || DomainError::UsernameTaken))?;

    Ok(())
}

#[instrument(skip(conn, user), fields(user_id = %user.id))]
pub async fn update_profile(conn: &mut PgConnection, user: &User) -> RepoResult<()> {
    let columns = ProfileColumns::new(user);
    let result = sqlx::query(
        r#"
        UPDATE users
        SET nickname = $2, gender = $3, intro = $4, avatar = $5, updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(columns.id)
    .bind(columns.nickname)
    .bind(columns.gender)
    .bind(columns.intro)
    .bind(columns.avatar)
    .execute(conn)
    .await
    .map_err(map_db_error)?;

    if result.rows_affected() == 0 {
        return Err(DomainError::UserNotFound(user.id));
    }
    Ok(())
}

/// Status and permissions land in the same row update
#[instrument(skip(conn))]
pub async fn set_standing(
    conn: &mut PgConnection,
    id: EntityId,
    status: UserStatus,
    permissions: UserPermissions,
) -> RepoResult<()> {
    let result = sqlx::query(
        r#"
        UPDATE users SET status = $2, permissions = $3, updated_at = NOW() WHERE id = $1
        "#,
    )
    .bind(id.into_inner())
    .bind(status.as_str())
    .bind(permissions.bits())
    .execute(conn)
    .await
    .map_err(map_db_error)?;

    if result.rows_affected() == 0 {
        return Err(DomainError::UserNotFound(id));
    }
    Ok(())
}
