//! User entity <-> model mapper

use blog_core::entities::User;
use blog_core::error::DomainError;
use blog_core::value_objects::{EntityId, UserPermissions, UserStatus};

use super::label;
use crate::models::UserModel;

/// Convert UserModel to User entity
impl TryFrom<UserModel> for User {
    type Error = DomainError;

    fn try_from(model: UserModel) -> Result<Self, Self::Error> {
        Ok(User {
            id: EntityId::new(model.id),
            username: model.username,
            nickname: model.nickname,
            gender: model.gender,
            intro: model.intro,
            avatar: model.avatar,
            status: label("user status", &model.status, UserStatus::parse)?,
            permissions: UserPermissions::from_column(model.permissions),
            follower_count: model.follower_count,
            following_count: model.following_count,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

/// Values bound by the profile update statement
pub struct ProfileColumns<'a> {
    pub id: i64,
    pub nickname: &'a str,
    pub gender: Option<&'a str>,
    pub intro: Option<&'a str>,
    pub avatar: Option<&'a str>,
}

impl<'a> ProfileColumns<'a> {
    pub fn new(user: &'a User) -> Self {
        Self {
            id: user.id.into_inner(),
            nickname: &user.nickname,
            gender: user.gender.as_deref(),
            intro: user.intro.as_deref(),
            avatar: user.avatar.as_deref(),
        }
    }
}
