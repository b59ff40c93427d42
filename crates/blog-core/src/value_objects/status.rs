//! Moderation states for users, articles, and comments
//!
//! Each state enum owns an explicit transition table. Moderation code never
//! writes a state directly; it asks [`Lifecycle::transition_to`] first.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A state enum with an explicit transition table
pub trait Lifecycle: Copy + Eq + std::fmt::Debug {
    /// Name used in error messages
    const NAME: &'static str;

    /// Whether moving from `self` to `next` is permitted
    fn allows(self, next: Self) -> bool;

    /// Stable lowercase label, also the database representation
    fn as_str(self) -> &'static str;

    /// Validate a transition, returning the new state
    fn transition_to(self, next: Self) -> Result<Self, DomainError> {
        if self.allows(next) {
            Ok(next)
        } else {
            Err(DomainError::InvalidStatusTransition {
                entity: Self::NAME,
                from: self.as_str(),
                to: next.as_str(),
            })
        }
    }
}

// ============================================================================
// User status
// ============================================================================

/// Account standing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Normal,
    /// Banned: no publishing, no commenting, no profile edits
    Blocked,
    /// Flagged for review; keeps its permissions until a decision
    Reported,
}

impl Lifecycle for UserStatus {
    const NAME: &'static str = "user";

    fn allows(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Normal, Self::Blocked | Self::Reported)
                | (Self::Reported, Self::Normal | Self::Blocked)
                | (Self::Blocked, Self::Normal)
        )
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Blocked => "blocked",
            Self::Reported => "reported",
        }
    }
}

impl UserStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "normal" => Some(Self::Normal),
            "blocked" => Some(Self::Blocked),
            "reported" => Some(Self::Reported),
            _ => None,
        }
    }

    #[inline]
    pub fn is_blocked(self) -> bool {
        matches!(self, Self::Blocked)
    }
}

// ============================================================================
// Article status and visibility
// ============================================================================

/// Article moderation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    #[default]
    Active,
    /// Hidden by a moderator, can be restored
    Banned,
    /// Soft-deleted, terminal
    Deleted,
}

impl Lifecycle for ArticleStatus {
    const NAME: &'static str = "article";

    fn allows(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Active, Self::Banned | Self::Deleted) | (Self::Banned, Self::Active | Self::Deleted)
        )
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Banned => "banned",
            Self::Deleted => "deleted",
        }
    }
}

impl ArticleStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "banned" => Some(Self::Banned),
            "deleted" => Some(Self::Deleted),
            _ => None,
        }
    }
}

/// Who may read an article
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

impl Lifecycle for Visibility {
    const NAME: &'static str = "visibility";

    // Visibility is a plain switch; re-applying the current value is a no-op
    fn allows(self, _next: Self) -> bool {
        true
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
        }
    }
}

impl Visibility {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "public" => Some(Self::Public),
            "private" => Some(Self::Private),
            _ => None,
        }
    }
}

// ============================================================================
// Comment status
// ============================================================================

/// Comment moderation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CommentStatus {
    #[default]
    Normal,
    Reported,
    /// Soft-deleted, terminal, excluded from the parent's reply_count
    Deleted,
}

impl Lifecycle for CommentStatus {
    const NAME: &'static str = "comment";

    fn allows(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Normal, Self::Reported | Self::Deleted) | (Self::Reported, Self::Normal | Self::Deleted)
        )
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Reported => "reported",
            Self::Deleted => "deleted",
        }
    }
}

impl CommentStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "normal" => Some(Self::Normal),
            "reported" => Some(Self::Reported),
            "deleted" => Some(Self::Deleted),
            _ => None,
        }
    }

    #[inline]
    pub fn is_deleted(self) -> bool {
        matches!(self, Self::Deleted)
    }
}
