//! Value objects - immutable types that represent domain concepts

mod id;
mod permissions;
mod status;

pub use id::{EntityId, IdGenerator, IdParseError};
pub use permissions::UserPermissions;
pub use status::{ArticleStatus, CommentStatus, Lifecycle, UserStatus, Visibility};
