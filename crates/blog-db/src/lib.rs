//! # blog-db
//!
//! Storage adapters for the ledger's transaction port.
//!
//! ## Overview
//!
//! - [`PgLedgerStore`]: PostgreSQL via SQLx, one database transaction per
//!   ledger transaction
//! - [`MemoryLedgerStore`]: in-process state behind an async mutex, used by
//!   tests and embedded setups
//! - Connection pool creation and schema setup
//!
//! ## Usage
//!
//! ```rust,ignore
//! use blog_common::DatabaseConfig;
//! use blog_db::{create_pool, run_migrations, PgLedgerStore};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&DatabaseConfig::with_url("postgres://localhost/blog")).await?;
//!     run_migrations(&pool).await?;
//!     let store = PgLedgerStore::new(pool);
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use memory::{MemoryLedgerStore, MemoryLedgerTransaction};
pub use pool::{create_pool, run_migrations, PgPool};
pub use repositories::{PgLedgerStore, PgLedgerTransaction};
