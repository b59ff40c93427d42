//! User entity - an account that writes, likes, and follows

use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use crate::value_objects::{EntityId, UserPermissions, UserStatus};

/// User entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: EntityId,
    pub username: String,
    pub nickname: String,
    pub gender: Option<String>,
    pub intro: Option<String>,
    pub avatar: Option<String>,
    pub status: UserStatus,
    pub permissions: UserPermissions,
    /// Denormalized count of Follow rows targeting this user
    pub follower_count: i64,
    /// Denormalized count of Follow rows created by this user
    pub following_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new account in good standing
    pub fn new(id: EntityId, username: String, nickname: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            username,
            nickname,
            gender: None,
            intro: None,
            avatar: None,
            status: UserStatus::Normal,
            permissions: UserPermissions::DEFAULT,
            follower_count: 0,
            following_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[inline]
    pub fn can_publish(&self) -> bool {
        !self.status.is_blocked() && self.permissions.can_publish()
    }

    #[inline]
    pub fn can_comment(&self) -> bool {
        !self.status.is_blocked() && self.permissions.can_comment()
    }

    /// Permission set that accompanies a move to `next`
    ///
    /// Entering Blocked clears every flag; leaving Blocked restores the
    /// defaults. Other moves keep whatever a moderator last granted.
    pub fn permissions_after(&self, next: UserStatus) -> UserPermissions {
        if next.is_blocked() {
            UserPermissions::empty()
        } else if self.status.is_blocked() {
            UserPermissions::DEFAULT
        } else {
            self.permissions
        }
    }

    /// Merge a profile update into this user; returns whether anything changed
    pub fn apply_profile(&mut self, update: &ProfileUpdate) -> bool {
        let mut changed = false;

        if let Some(nickname) = update.nickname.as_deref().map(str::trim) {
            if nickname != self.nickname {
                self.nickname = nickname.to_string();
                changed = true;
            }
        }
        changed |= merge_optional(&mut self.gender, update.gender.as_deref());
        changed |= merge_optional(&mut self.intro, update.intro.as_deref());
        changed |= merge_optional(&mut self.avatar, update.avatar.as_deref());

        if changed {
            self.updated_at = Utc::now();
        }
        changed
    }
}

// An empty string clears the field, absence leaves it untouched
fn merge_optional(field: &mut Option<String>, incoming: Option<&str>) -> bool {
    let Some(value) = incoming.map(str::trim) else {
        return false;
    };
    let next = (!value.is_empty()).then(|| value.to_string());
    if *field == next {
        return false;
    }
    *field = next;
    true
}

/// Profile fields a user may change about themselves
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ProfileUpdate {
    #[validate(length(min = 1, max = 32, message = "Nickname must be 1-32 characters"))]
    pub nickname: Option<String>,

    #[validate(length(max = 16, message = "Gender must be at most 16 characters"))]
    pub gender: Option<String>,

    #[validate(length(max = 500, message = "Intro must be at most 500 characters"))]
    pub intro: Option<String>,

    #[validate(length(max = 255, message = "Avatar must be at most 255 characters"))]
    pub avatar: Option<String>,
}

/// Permission flags a moderator wants to change; absent fields stay as they are
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PermissionUpdate {
    pub publish: Option<bool>,
    pub comment: Option<bool>,
}

impl PermissionUpdate {
    pub fn is_empty(&self) -> bool {
        self.publish.is_none() && self.comment.is_none()
    }

    /// Apply the requested flags on top of `current`
    pub fn merge(&self, current: UserPermissions) -> UserPermissions {
        let mut next = current;
        if let Some(publish) = self.publish {
            next.set(UserPermissions::PUBLISH, publish);
        }
        if let Some(comment) = self.comment {
            next.set(UserPermissions::COMMENT, comment);
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User::new(EntityId::new(1), "alice".to_string(), "Alice".to_string())
    }

    #[test]
    fn test_new_user_can_do_everything() {
        let u = user();
        assert!(u.can_publish());
        assert!(u.can_comment());
        assert_eq!(u.follower_count, 0);
    }

    #[test]
    fn test_blocked_user_cannot_act_even_with_flags() {
        let mut u = user();
        u.status = UserStatus::Blocked;
        assert!(!u.can_publish());
        assert!(!u.can_comment());
    }

    #[test]
    fn test_permissions_after_ban_and_unban() {
        let mut u = user();
        assert_eq!(u.permissions_after(UserStatus::Blocked), UserPermissions::empty());

        u.status = UserStatus::Blocked;
        u.permissions = UserPermissions::empty();
        assert_eq!(u.permissions_after(UserStatus::Normal), UserPermissions::DEFAULT);
    }

    #[test]
    fn test_permissions_after_report_keeps_flags() {
        let mut u = user();
        u.permissions = UserPermissions::COMMENT;
        assert_eq!(u.permissions_after(UserStatus::Reported), UserPermissions::COMMENT);
    }

    #[test]
    fn test_apply_profile_merges_only_present_fields() {
        let mut u = user();
        u.intro = Some("hi".to_string());
        let changed = u.apply_profile(&ProfileUpdate {
            nickname: Some("Al".to_string()),
            avatar: Some("a.png".to_string()),
            ..Default::default()
        });
        assert!(changed);
        assert_eq!(u.nickname, "Al");
        assert_eq!(u.avatar.as_deref(), Some("a.png"));
        assert_eq!(u.intro.as_deref(), Some("hi"));
    }

    #[test]
    fn test_apply_profile_empty_string_clears() {
        let mut u = user();
        u.intro = Some("hi".to_string());
        assert!(u.apply_profile(&ProfileUpdate {
            intro: Some(String::new()),
            ..Default::default()
        }));
        assert_eq!(u.intro, None);
        assert!(!u.apply_profile(&ProfileUpdate::default()));
    }

    #[test]
    fn test_profile_validation() {
        let update = ProfileUpdate {
            nickname: Some(String::new()),
            ..Default::default()
        };
        assert!(update.validate().is_err());

        let update = ProfileUpdate {
            nickname: Some("ok".to_string()),
            ..Default::default()
        };
        assert!(update.validate().is_ok());
    }

    #[test]
    fn test_permission_update_merge() {
        let update = PermissionUpdate {
            publish: Some(false),
            comment: None,
        };
        assert_eq!(update.merge(UserPermissions::DEFAULT), UserPermissions::COMMENT);
        assert!(!update.is_empty());
        assert!(PermissionUpdate::default().is_empty());
    }
}
