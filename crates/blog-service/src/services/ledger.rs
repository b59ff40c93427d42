//! Relationship ledger service
//!
//! The only code that writes relationship rows or touches the denormalized
//! counters that mirror them. Each public operation runs in exactly one
//! transaction: the row change and every counter change it implies commit
//! together or not at all.

use blog_core::entities::{
    Comment, Counter, CounterKind, FollowStatus, RelationState, Relationship, RelationshipKey,
    RelationshipKind, ToggleOutcome,
};
use blog_core::traits::LedgerTransaction;
use blog_core::{CommentStatus, DomainError, EntityId, Lifecycle};
use tracing::{debug, info, instrument};

use crate::dto::{CommentWithAuthor, CreateCommentRequest, FollowCounts};

use super::context::{finish, ServiceContext};
use super::error::ServiceResult;
use super::{lookup, text};

/// Relationship ledger service
pub struct LedgerService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> LedgerService<'a> {
    /// Create a new LedgerService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    // ========================================================================
    // Toggles
    // ========================================================================

    /// Make the relationship present
    ///
    /// A second call for the same key is a no-op reporting `applied = false`.
    #[instrument(skip(self))]
    pub async fn toggle_on(
        &self,
        actor_id: EntityId,
        target_id: EntityId,
        kind: RelationshipKind,
    ) -> ServiceResult<ToggleOutcome> {
        let key = RelationshipKey::new(actor_id, target_id, kind);
        if kind == RelationshipKind::Follow && key.is_self_referential() {
            return Err(DomainError::SelfFollow.into());
        }

        let mut tx = self.ctx.begin().await?;
        let result = Self::apply_on(tx.as_mut(), key).await;
        let outcome = finish(tx, result).await?;

        if outcome.applied {
            info!(
                actor_id = %actor_id,
                target_id = %target_id,
                kind = kind.as_str(),
                count = outcome.count,
                "Relationship added"
            );
        }
        Ok(outcome)
    }

    /// Make the relationship absent
    ///
    /// Removing an absent relationship is a no-op reporting `applied = false`.
    #[instrument(skip(self))]
    pub async fn toggle_off(
        &self,
        actor_id: EntityId,
        target_id: EntityId,
        kind: RelationshipKind,
    ) -> ServiceResult<ToggleOutcome> {
        let key = RelationshipKey::new(actor_id, target_id, kind);

        let mut tx = self.ctx.begin().await?;
        let result = Self::apply_off(tx.as_mut(), key).await;
        let outcome = finish(tx, result).await?;

        if outcome.applied {
            info!(
                actor_id = %actor_id,
                target_id = %target_id,
                kind = kind.as_str(),
                count = outcome.count,
                "Relationship removed"
            );
        }
        Ok(outcome)
    }

    async fn apply_on(tx: &mut dyn LedgerTransaction, key: RelationshipKey) -> ServiceResult<ToggleOutcome> {
        lookup::user(tx, key.actor_id).await?;
        lookup::ensure_target(tx, key.kind.target_kind(), key.target_id).await?;

        let target = Counter::new(key.target_id, key.kind.target_counter());
        let applied = tx.insert_relationship(&Relationship::new(key)).await?;

        let count = if applied {
            adjust_for(tx, key, 1).await?
        } else {
            debug!(key = ?key, "relationship already present");
            read(tx, target).await?
        };

        Ok(ToggleOutcome::new(applied, count, RelationState::Present))
    }

    async fn apply_off(tx: &mut dyn LedgerTransaction, key: RelationshipKey) -> ServiceResult<ToggleOutcome> {
        lookup::ensure_target(tx, key.kind.target_kind(), key.target_id).await?;

        let target = Counter::new(key.target_id, key.kind.target_counter());
        let applied = tx.delete_relationship(key).await?;

        let count = if applied {
            adjust_for(tx, key, -1).await?
        } else {
            debug!(key = ?key, "relationship already absent");
            read(tx, target).await?
        };

        Ok(ToggleOutcome::new(applied, count, RelationState::Absent))
    }

    // ========================================================================
    // Comments
    // ========================================================================

    /// Create a root comment, or a reply when the request names a parent
    ///
    /// The parent must be live and on the same article; its `reply_count`
    /// moves in the same transaction as the insert.
    #[instrument(skip(self, request))]
    pub async fn create_comment(
        &self,
        actor_id: EntityId,
        article_id: EntityId,
        request: CreateCommentRequest,
    ) -> ServiceResult<Comment> {
        let limits = *self.ctx.limits();
        let content = text::normalize(&request.content, "Comment content", limits.max_comment_length)?;
        let comment_id = self.ctx.generate_id();

        let mut tx = self.ctx.begin().await?;
        let result = Self::insert_comment(
            tx.as_mut(),
            actor_id,
            article_id,
            request.parent_id,
            comment_id,
            content,
            limits.max_comment_depth,
        )
        .await;
        let comment = finish(tx, result).await?;

        info!(
            comment_id = %comment.id,
            article_id = %article_id,
            depth = comment.depth,
            "Comment created"
        );
        Ok(comment)
    }

    /// Soft-delete a comment written by `actor_id`
    #[instrument(skip(self))]
    pub async fn delete_comment(&self, comment_id: EntityId, actor_id: EntityId) -> ServiceResult<()> {
        let mut tx = self.ctx.begin().await?;
        let result = Self::remove_comment(tx.as_mut(), comment_id, actor_id).await;
        finish(tx, result).await?;

        info!(comment_id = %comment_id, "Comment deleted");
        Ok(())
    }

    async fn insert_comment(
        tx: &mut dyn LedgerTransaction,
        actor_id: EntityId,
        article_id: EntityId,
        parent_id: Option<EntityId>,
        comment_id: EntityId,
        content: String,
        max_depth: i32,
    ) -> ServiceResult<Comment> {
        let actor = lookup::user(tx, actor_id).await?;
        if !actor.can_comment() {
            return Err(DomainError::MissingPermission("COMMENT").into());
        }
        lookup::live_article(tx, article_id).await?;

        let comment = match parent_id {
            None => Comment::root(comment_id, article_id, actor_id, content),
            Some(parent_id) => {
                let parent = lookup::live_comment(tx, parent_id).await?;
                if parent.article_id != article_id {
                    return Err(DomainError::CommentNotFound(parent_id).into());
                }
                if parent.depth >= max_depth {
                    return Err(DomainError::ReplyTooDeep { max: max_depth }.into());
                }
                Comment::reply_to(&parent, comment_id, actor_id, content)
            }
        };

        tx.insert_comment(&comment).await?;
        if let Some(parent_id) = comment.parent_id {
            adjust(tx, Counter::new(parent_id, CounterKind::CommentReplies), 1).await?;
        }
        Ok(comment)
    }

    async fn remove_comment(
        tx: &mut dyn LedgerTransaction,
        comment_id: EntityId,
        actor_id: EntityId,
    ) -> ServiceResult<()> {
        let comment = lookup::live_comment(tx, comment_id).await?;
        if !comment.is_authored_by(actor_id) {
            return Err(DomainError::NotCommentAuthor.into());
        }
        retire_comment(tx, &comment).await
    }

    async fn follow_status_in(
        tx: &mut dyn LedgerTransaction,
        actor_id: EntityId,
        other_id: EntityId,
    ) -> ServiceResult<FollowStatus> {
        let is_following = tx
            .relationship_exists(RelationshipKey::new(actor_id, other_id, RelationshipKind::Follow))
            .await?;
        let is_followed_by = tx
            .relationship_exists(RelationshipKey::new(other_id, actor_id, RelationshipKind::Follow))
            .await?;
        Ok(FollowStatus {
            is_following,
            is_followed_by,
        })
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Number of relationship rows of `kind` pointing at `target_id`
    #[instrument(skip(self))]
    pub async fn count_relationships(&self, target_id: EntityId, kind: RelationshipKind) -> ServiceResult<i64> {
        let mut tx = self.ctx.begin().await?;
        let result = tx
            .count_live(Counter::new(target_id, kind.target_counter()))
            .await
            .map_err(Into::into);
        finish(tx, result).await
    }

    /// Whether `actor_id` currently holds a relationship of `kind` on `target_id`
    #[instrument(skip(self))]
    pub async fn relationship_state(
        &self,
        actor_id: EntityId,
        target_id: EntityId,
        kind: RelationshipKind,
    ) -> ServiceResult<RelationState> {
        let mut tx = self.ctx.begin().await?;
        let result = tx
            .relationship_exists(RelationshipKey::new(actor_id, target_id, kind))
            .await
            .map(RelationState::from)
            .map_err(Into::into);
        finish(tx, result).await
    }

    /// Follow relationship in both directions between two users
    #[instrument(skip(self))]
    pub async fn follow_status(&self, actor_id: EntityId, other_id: EntityId) -> ServiceResult<FollowStatus> {
        let mut tx = self.ctx.begin().await?;
        let result = Self::follow_status_in(tx.as_mut(), actor_id, other_id).await;
        finish(tx, result).await
    }

    /// Who holds a relationship of `kind` on `target_id` (likers, favoriters,
    /// followers), newest first
    #[instrument(skip(self))]
    pub async fn list_actors(&self, target_id: EntityId, kind: RelationshipKind) -> ServiceResult<Vec<Relationship>> {
        let mut tx = self.ctx.begin().await?;
        let result = tx.relationships_by_target(target_id, kind).await.map_err(Into::into);
        finish(tx, result).await
    }

    /// What `actor_id` holds a relationship of `kind` on, newest first
    #[instrument(skip(self))]
    pub async fn list_targets(&self, actor_id: EntityId, kind: RelationshipKind) -> ServiceResult<Vec<Relationship>> {
        let mut tx = self.ctx.begin().await?;
        let result = tx.relationships_by_actor(actor_id, kind).await.map_err(Into::into);
        finish(tx, result).await
    }

    /// Comments written by a user, newest first
    ///
    /// Without a status only comments that are not deleted are returned.
    #[instrument(skip(self))]
    pub async fn user_comments(
        &self,
        user_id: EntityId,
        status: Option<CommentStatus>,
    ) -> ServiceResult<Vec<Comment>> {
        let mut tx = self.ctx.begin().await?;
        let result = Self::comments_of(tx.as_mut(), user_id, status).await;
        finish(tx, result).await
    }

    async fn comments_of(
        tx: &mut dyn LedgerTransaction,
        user_id: EntityId,
        status: Option<CommentStatus>,
    ) -> ServiceResult<Vec<Comment>> {
        lookup::user(tx, user_id).await?;
        Ok(tx.comments_by_author(user_id, status).await?)
    }

    /// Live comments on a live article paired with their authors, newest first
    #[instrument(skip(self))]
    pub async fn commenters(&self, article_id: EntityId) -> ServiceResult<Vec<CommentWithAuthor>> {
        let mut tx = self.ctx.begin().await?;
        let result = Self::commenters_of(tx.as_mut(), article_id).await;
        finish(tx, result).await
    }

    async fn commenters_of(
        tx: &mut dyn LedgerTransaction,
        article_id: EntityId,
    ) -> ServiceResult<Vec<CommentWithAuthor>> {
        lookup::live_article(tx, article_id).await?;
        let comments = tx.comments_by_article(article_id).await?;

        let mut entries = Vec::with_capacity(comments.len());
        for comment in comments {
            let author = lookup::user(tx, comment.author_id).await?;
            entries.push(CommentWithAuthor { comment, author });
        }
        Ok(entries)
    }

    /// Stored follow counters of a user
    #[instrument(skip(self))]
    pub async fn follow_counts(&self, user_id: EntityId) -> ServiceResult<FollowCounts> {
        let mut tx = self.ctx.begin().await?;
        let result = lookup::user(tx.as_mut(), user_id)
            .await
            .map(|user| FollowCounts {
                following: user.following_count,
                followers: user.follower_count,
            })
            .map_err(Into::into);
        finish(tx, result).await
    }
}

/// Mark a live comment deleted and release its slot in the parent's reply count
pub(crate) async fn retire_comment(tx: &mut dyn LedgerTransaction, comment: &Comment) -> ServiceResult<()> {
    write_comment_status(tx, comment, CommentStatus::Deleted).await?;
    if let Some(parent_id) = comment.parent_id {
        adjust(tx, Counter::new(parent_id, CounterKind::CommentReplies), -1).await?;
    }
    Ok(())
}

/// Move `comment` to `status`, provided no other transaction moved it first
///
/// `comment` is the copy read earlier in this transaction. If the row no
/// longer holds that status the write is refused, so side effects tied to
/// the transition (the parent's reply count) run at most once.
pub(crate) async fn write_comment_status(
    tx: &mut dyn LedgerTransaction,
    comment: &Comment,
    status: CommentStatus,
) -> ServiceResult<CommentStatus> {
    let next = comment.status.transition_to(status)?;
    if tx.transition_comment_status(comment.id, comment.status, next).await? {
        return Ok(next);
    }

    let current = tx.find_comment(comment.id).await?;
    debug!(comment_id = %comment.id, "comment status changed concurrently");
    match current {
        Some(current) if !current.status.is_deleted() => Err(DomainError::InvalidStatusTransition {
            entity: CommentStatus::NAME,
            from: current.status.as_str(),
            to: next.as_str(),
        }
        .into()),
        _ => Err(DomainError::CommentNotFound(comment.id).into()),
    }
}

/// Counter changes for a relationship row that was just added or removed
///
/// Returns the target counter after the change.
async fn adjust_for(tx: &mut dyn LedgerTransaction, key: RelationshipKey, delta: i64) -> ServiceResult<i64> {
    let target = Counter::new(key.target_id, key.kind.target_counter());
    let Some(kind) = key.kind.actor_counter() else {
        return adjust(tx, target, delta).await;
    };

    // Both counters live on users rows; lock them in id order
    let actor = Counter::new(key.actor_id, kind);
    if actor.owner_id < target.owner_id {
        adjust(tx, actor, delta).await?;
        adjust(tx, target, delta).await
    } else {
        let count = adjust(tx, target, delta).await?;
        adjust(tx, actor, delta).await?;
        Ok(count)
    }
}

/// Relative counter change; the owner row was checked earlier in the transaction
async fn adjust(tx: &mut dyn LedgerTransaction, counter: Counter, delta: i64) -> ServiceResult<i64> {
    tx.adjust_counter(counter, delta)
        .await?
        .ok_or_else(|| owner_missing(counter).into())
}

async fn read(tx: &mut dyn LedgerTransaction, counter: Counter) -> ServiceResult<i64> {
    tx.read_counter(counter)
        .await?
        .ok_or_else(|| owner_missing(counter).into())
}

fn owner_missing(counter: Counter) -> DomainError {
    DomainError::InternalError(format!(
        "counter {} has no owner row {}",
        counter.kind.as_str(),
        counter.owner_id
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use blog_core::entities::{Article, User};
    use blog_core::traits::LedgerStore;
    use blog_db::MemoryLedgerStore;

    use crate::ServiceError;

    /// Root 20 with live reply 21, on article 10 by user 1
    async fn thread(store: &MemoryLedgerStore) -> (Comment, Comment) {
        let mut tx = store.begin().await.unwrap();
        let author = User::new(EntityId::new(1), "author".to_string(), "author".to_string());
        tx.insert_user(&author).await.unwrap();
        tx.insert_article(&Article::new(
            EntityId::new(10),
            author.id,
            "Title".to_string(),
            "Body".to_string(),
        ))
        .await
        .unwrap();
        let mut root = Comment::root(EntityId::new(20), EntityId::new(10), author.id, "root".to_string());
        root.reply_count = 1;
        let reply = Comment::reply_to(&root, EntityId::new(21), author.id, "reply".to_string());
        tx.insert_comment(&root).await.unwrap();
        tx.insert_comment(&reply).await.unwrap();
        tx.commit().await.unwrap();
        (root, reply)
    }

    #[tokio::test]
    async fn test_retire_with_stale_copy_leaves_parent_alone() {
        let store = MemoryLedgerStore::new();
        let (root, reply) = thread(&store).await;

        let mut tx = store.begin().await.unwrap();
        retire_comment(tx.as_mut(), &reply).await.unwrap();
        // `reply` still says Normal, as a second deleter would have read it
        let err = retire_comment(tx.as_mut(), &reply).await.unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::CommentNotFound(id)) if id == reply.id));

        let replies = Counter::new(root.id, CounterKind::CommentReplies);
        assert_eq!(tx.read_counter(replies).await.unwrap(), Some(0));
        assert_eq!(tx.count_live(replies).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_status_write_refused_when_row_moved() {
        let store = MemoryLedgerStore::new();
        let (_, reply) = thread(&store).await;

        let mut tx = store.begin().await.unwrap();
        write_comment_status(tx.as_mut(), &reply, CommentStatus::Reported)
            .await
            .unwrap();
        let err = write_comment_status(tx.as_mut(), &reply, CommentStatus::Reported)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Domain(DomainError::InvalidStatusTransition { from: "reported", .. })
        ));
    }

    #[test]
    fn test_owner_missing_names_counter() {
        let err = owner_missing(Counter::new(EntityId::new(3), CounterKind::CommentReplies));
        assert!(err.to_string().contains("comment_replies"));
        assert!(err.to_string().contains('3'));
    }
}
