//! Relationship entity - one actor's like, favorite, follow, or comment-like
//! on a target, and the denormalized counters that mirror those rows

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::EntityId;

/// What the actor did to the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    /// Actor liked an article
    Like,
    /// Actor saved an article to their favorites
    Favorite,
    /// Actor follows another user
    Follow,
    /// Actor liked a comment
    CommentLike,
}

/// The kind of row a relationship points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    Article,
    Comment,
    User,
}

impl RelationshipKind {
    pub const ALL: [RelationshipKind; 4] = [Self::Like, Self::Favorite, Self::Follow, Self::CommentLike];

    /// Database and wire label
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Favorite => "favorite",
            Self::Follow => "follow",
            Self::CommentLike => "comment_like",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "like" => Some(Self::Like),
            "favorite" => Some(Self::Favorite),
            "follow" => Some(Self::Follow),
            "comment_like" => Some(Self::CommentLike),
            _ => None,
        }
    }

    pub fn target_kind(self) -> TargetKind {
        match self {
            Self::Like | Self::Favorite => TargetKind::Article,
            Self::CommentLike => TargetKind::Comment,
            Self::Follow => TargetKind::User,
        }
    }

    /// Counter on the target that mirrors rows of this kind
    pub fn target_counter(self) -> CounterKind {
        match self {
            Self::Like => CounterKind::ArticleLikes,
            Self::Favorite => CounterKind::ArticleFavorites,
            Self::CommentLike => CounterKind::CommentLikes,
            Self::Follow => CounterKind::UserFollowers,
        }
    }

    /// Counter on the actor that also mirrors rows of this kind, if any
    pub fn actor_counter(self) -> Option<CounterKind> {
        match self {
            Self::Follow => Some(CounterKind::UserFollowing),
            _ => None,
        }
    }
}

/// Identity of a relationship row: at most one row exists per key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelationshipKey {
    pub actor_id: EntityId,
    pub target_id: EntityId,
    pub kind: RelationshipKind,
}

impl RelationshipKey {
    pub fn new(actor_id: EntityId, target_id: EntityId, kind: RelationshipKind) -> Self {
        Self {
            actor_id,
            target_id,
            kind,
        }
    }

    #[inline]
    pub fn is_self_referential(&self) -> bool {
        self.actor_id == self.target_id
    }
}

/// Relationship entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub actor_id: EntityId,
    pub target_id: EntityId,
    pub kind: RelationshipKind,
    pub created_at: DateTime<Utc>,
}

impl Relationship {
    pub fn new(key: RelationshipKey) -> Self {
        Self {
            actor_id: key.actor_id,
            target_id: key.target_id,
            kind: key.kind,
            created_at: Utc::now(),
        }
    }

    pub fn key(&self) -> RelationshipKey {
        RelationshipKey::new(self.actor_id, self.target_id, self.kind)
    }
}

/// Whether a relationship row exists for a key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationState {
    Absent,
    Present,
}

impl RelationState {
    #[inline]
    pub fn is_present(self) -> bool {
        matches!(self, Self::Present)
    }
}

impl From<bool> for RelationState {
    fn from(present: bool) -> Self {
        if present {
            Self::Present
        } else {
            Self::Absent
        }
    }
}

/// Result of a toggle: whether the state changed, and the counter afterwards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleOutcome {
    pub applied: bool,
    pub count: i64,
    pub state: RelationState,
}

impl ToggleOutcome {
    pub fn new(applied: bool, count: i64, state: RelationState) -> Self {
        Self {
            applied,
            count,
            state,
        }
    }
}

/// Directional follow facts between two users
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FollowStatus {
    pub is_following: bool,
    pub is_followed_by: bool,
}

impl FollowStatus {
    /// Mutual follow is derived, never stored
    #[inline]
    pub fn is_mutual(&self) -> bool {
        self.is_following && self.is_followed_by
    }
}

// ============================================================================
// Counters
// ============================================================================

/// A denormalized counter column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterKind {
    ArticleLikes,
    ArticleFavorites,
    CommentLikes,
    CommentReplies,
    UserFollowers,
    UserFollowing,
}

impl CounterKind {
    pub const ALL: [CounterKind; 6] = [
        Self::ArticleLikes,
        Self::ArticleFavorites,
        Self::CommentLikes,
        Self::CommentReplies,
        Self::UserFollowers,
        Self::UserFollowing,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ArticleLikes => "article_likes",
            Self::ArticleFavorites => "article_favorites",
            Self::CommentLikes => "comment_likes",
            Self::CommentReplies => "comment_replies",
            Self::UserFollowers => "user_followers",
            Self::UserFollowing => "user_following",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == s)
    }

    /// Table that owns the counter column
    pub fn owner(self) -> TargetKind {
        match self {
            Self::ArticleLikes | Self::ArticleFavorites => TargetKind::Article,
            Self::CommentLikes | Self::CommentReplies => TargetKind::Comment,
            Self::UserFollowers | Self::UserFollowing => TargetKind::User,
        }
    }

    /// How live rows are recounted for this counter
    pub fn source(self) -> CounterSource {
        match self {
            Self::ArticleLikes => CounterSource::Targeted(RelationshipKind::Like),
            Self::ArticleFavorites => CounterSource::Targeted(RelationshipKind::Favorite),
            Self::CommentLikes => CounterSource::Targeted(RelationshipKind::CommentLike),
            Self::UserFollowers => CounterSource::Targeted(RelationshipKind::Follow),
            Self::UserFollowing => CounterSource::Acted(RelationshipKind::Follow),
            Self::CommentReplies => CounterSource::LiveReplies,
        }
    }
}

/// Rows a counter must equal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterSource {
    /// Relationships of this kind whose target is the owner
    Targeted(RelationshipKind),
    /// Relationships of this kind whose actor is the owner
    Acted(RelationshipKind),
    /// Direct child comments that are not deleted
    LiveReplies,
}

/// One counter column on one row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Counter {
    pub owner_id: EntityId,
    pub kind: CounterKind,
}

impl Counter {
    pub fn new(owner_id: EntityId, kind: CounterKind) -> Self {
        Self { owner_id, kind }
    }
}

/// Stored value vs. live recount for one counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriftReport {
    pub counter: Counter,
    pub stored: i64,
    pub live: i64,
}

impl DriftReport {
    #[inline]
    pub fn is_drifted(&self) -> bool {
        self.stored != self.live
    }

    /// Positive when the stored value over-counts
    #[inline]
    pub fn delta(&self) -> i64 {
        self.stored - self.live
    }
}
