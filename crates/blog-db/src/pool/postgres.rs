//! PostgreSQL connection pool management

use blog_common::DatabaseConfig;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{info, instrument};

/// Schema applied by [`run_migrations`]
const INIT_SCHEMA: &str = include_str!("../../migrations/0001_init.sql");

/// Create a new PostgreSQL connection pool
#[instrument(skip(config), fields(max = config.max_connections))]
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections.min(config.max_connections))
        .acquire_timeout(config.acquire_timeout())
        .idle_timeout(config.idle_timeout())
        .max_lifetime(config.max_lifetime())
        .connect(&config.url)
        .await?;

    info!("database pool ready");
    Ok(pool)
}

/// Apply the schema; every statement is idempotent
#[instrument(skip(pool))]
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(INIT_SCHEMA).execute(pool).await?;
    info!("schema applied");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_declares_relationship_key() {
        assert!(INIT_SCHEMA.contains("PRIMARY KEY (actor_id, target_id, kind)"));
        assert!(INIT_SCHEMA.contains("CREATE TABLE IF NOT EXISTS comments"));
    }
}
