//! Domain entities - core business objects

mod article;
mod comment;
mod relationship;
mod user;

pub use article::Article;
pub use comment::Comment;
pub use relationship::{
    Counter, CounterKind, CounterSource, DriftReport, FollowStatus, RelationState, Relationship,
    RelationshipKey, RelationshipKind, TargetKind, ToggleOutcome,
};
pub use user::{PermissionUpdate, ProfileUpdate, User};
