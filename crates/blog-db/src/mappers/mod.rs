//! Entity to model mappers
//!
//! - `TryFrom<Model> for Entity`: convert database rows to domain objects,
//!   rejecting labels this build does not know
//! - `*Columns` structs: borrow entity data for binding

mod article;
mod comment;
mod relationship;
mod user;

pub use user::ProfileColumns;

use blog_core::error::DomainError;

/// Decode a text label column
fn label<T>(column: &'static str, raw: &str, parse: fn(&str) -> Option<T>) -> Result<T, DomainError> {
    parse(raw).ok_or_else(|| DomainError::DatabaseError(format!("unknown {column}: {raw}")))
}
