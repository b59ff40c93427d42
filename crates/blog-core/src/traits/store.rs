//! Storage ports - the interface the ledger needs from a relational store
//!
//! The domain layer never holds an ambient database handle. Every operation
//! asks a [`LedgerStore`] for a fresh [`LedgerTransaction`], does its reads
//! and writes through it, and ends it with `commit` or `rollback`. A
//! transaction dropped without `commit` must leave no trace.
//!
//! Counter changes go through [`LedgerTransaction::adjust_counter`], which
//! is a relative update evaluated by the store. Implementations must never
//! turn it into a read followed by an absolute write.

use async_trait::async_trait;

use crate::entities::{
    Article, Comment, Counter, CounterKind, Relationship, RelationshipKey, RelationshipKind, User,
};
use crate::error::DomainError;
use crate::value_objects::{ArticleStatus, CommentStatus, EntityId, UserPermissions, UserStatus, Visibility};

/// Result type for storage operations
pub type RepoResult<T> = Result<T, DomainError>;

/// Factory for transaction scopes
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Open a new transaction
    async fn begin(&self) -> RepoResult<Box<dyn LedgerTransaction>>;
}

/// One atomic unit of work against the store
#[async_trait]
pub trait LedgerTransaction: Send {
    // ========================================================================
    // Transaction control
    // ========================================================================

    /// Make every write in this transaction visible
    async fn commit(&mut self) -> RepoResult<()>;

    /// Discard every write in this transaction
    async fn rollback(&mut self) -> RepoResult<()>;

    // ========================================================================
    // Users
    // ========================================================================

    async fn find_user(&mut self, id: EntityId) -> RepoResult<Option<User>>;

    async fn find_user_by_username(&mut self, username: &str) -> RepoResult<Option<User>>;

    /// Insert a new user; a taken username fails with `UsernameTaken`
    async fn insert_user(&mut self, user: &User) -> RepoResult<()>;

    /// Persist profile fields only (never counters or standing)
    async fn update_user_profile(&mut self, user: &User) -> RepoResult<()>;

    /// Write status and permissions together in one row update
    async fn set_user_standing(
        &mut self,
        id: EntityId,
        status: UserStatus,
        permissions: UserPermissions,
    ) -> RepoResult<()>;

    // ========================================================================
    // Articles
    // ========================================================================

    async fn find_article(&mut self, id: EntityId) -> RepoResult<Option<Article>>;

    async fn insert_article(&mut self, article: &Article) -> RepoResult<()>;

    /// Persist title and content only
    async fn update_article_content(&mut self, article: &Article) -> RepoResult<()>;

    async fn set_article_status(&mut self, id: EntityId, status: ArticleStatus) -> RepoResult<()>;

    async fn set_article_visibility(&mut self, id: EntityId, visibility: Visibility) -> RepoResult<()>;

    // ========================================================================
    // Comments
    // ========================================================================

    async fn find_comment(&mut self, id: EntityId) -> RepoResult<Option<Comment>>;

    async fn insert_comment(&mut self, comment: &Comment) -> RepoResult<()>;

    /// Persist content only
    async fn update_comment_content(&mut self, comment: &Comment) -> RepoResult<()>;

    /// Move a comment from `from` to `to` if it is still in `from`
    ///
    /// Returns `false` when the row is missing or a concurrent transaction
    /// already moved it; nothing is written in that case.
    async fn transition_comment_status(
        &mut self,
        id: EntityId,
        from: CommentStatus,
        to: CommentStatus,
    ) -> RepoResult<bool>;

    /// Comments written by `author_id`, newest first
    ///
    /// `None` returns every comment that is not deleted; `Some` returns only
    /// comments in that status.
    async fn comments_by_author(
        &mut self,
        author_id: EntityId,
        status: Option<CommentStatus>,
    ) -> RepoResult<Vec<Comment>>;

    /// Comments on an article that are not deleted, newest first
    async fn comments_by_article(&mut self, article_id: EntityId) -> RepoResult<Vec<Comment>>;

    // ========================================================================
    // Relationships
    // ========================================================================

    /// Insert a relationship row
    ///
    /// Returns `false` when a row with the same key already exists, including
    /// one committed by a concurrent transaction while this insert waited.
    async fn insert_relationship(&mut self, relationship: &Relationship) -> RepoResult<bool>;

    /// Delete a relationship row; returns `false` when none existed
    async fn delete_relationship(&mut self, key: RelationshipKey) -> RepoResult<bool>;

    async fn relationship_exists(&mut self, key: RelationshipKey) -> RepoResult<bool>;

    /// Relationships of `kind` pointing at `target_id`, newest first
    async fn relationships_by_target(
        &mut self,
        target_id: EntityId,
        kind: RelationshipKind,
    ) -> RepoResult<Vec<Relationship>>;

    /// Relationships of `kind` created by `actor_id`, newest first
    async fn relationships_by_actor(
        &mut self,
        actor_id: EntityId,
        kind: RelationshipKind,
    ) -> RepoResult<Vec<Relationship>>;

    // ========================================================================
    // Counters
    // ========================================================================

    /// Add `delta` to a counter, flooring the result at zero
    ///
    /// Returns the value after the change, or `None` if the owning row does
    /// not exist.
    async fn adjust_counter(&mut self, counter: Counter, delta: i64) -> RepoResult<Option<i64>>;

    /// Current stored value, or `None` if the owning row does not exist
    async fn read_counter(&mut self, counter: Counter) -> RepoResult<Option<i64>>;

    /// Overwrite a counter with an absolute value (drift repair only)
    async fn overwrite_counter(&mut self, counter: Counter, value: i64) -> RepoResult<()>;

    /// Recount the rows a counter is supposed to mirror
    async fn count_live(&mut self, counter: Counter) -> RepoResult<i64>;

    /// Ids of every row that owns a counter of this kind
    async fn counter_owners(&mut self, kind: CounterKind) -> RepoResult<Vec<EntityId>>;
}
