//! Database models - SQLx-compatible structs for PostgreSQL tables

mod article;
mod comment;
mod relationship;
mod user;

pub use article::ArticleModel;
pub use comment::CommentModel;
pub use relationship::RelationshipModel;
pub use user::UserModel;
