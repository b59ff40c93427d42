//! # blog-core
//!
//! Domain layer containing entities, value objects, moderation lifecycles,
//! and the storage ports the interaction ledger runs against.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    Article, Comment, Counter, CounterKind, CounterSource, DriftReport, FollowStatus,
    PermissionUpdate, ProfileUpdate, RelationState, Relationship, RelationshipKey,
    RelationshipKind, TargetKind, ToggleOutcome, User,
};
pub use error::DomainError;
pub use traits::{LedgerStore, LedgerTransaction, RepoResult};
pub use value_objects::{
    ArticleStatus, CommentStatus, EntityId, IdGenerator, IdParseError, Lifecycle,
    UserPermissions, UserStatus, Visibility,
};
