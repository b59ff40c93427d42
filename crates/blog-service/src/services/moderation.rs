//! Moderation service
//!
//! Status changes for users, articles, and comments. Every change is checked
//! against the state's transition table before it is written.

use blog_core::entities::{Article, Comment, PermissionUpdate, User};
use blog_core::traits::LedgerTransaction;
use blog_core::{ArticleStatus, CommentStatus, DomainError, EntityId, Lifecycle, UserStatus, Visibility};
use tracing::{info, instrument};

use super::context::{finish, ServiceContext};
use super::error::{ServiceError, ServiceResult};
use super::ledger::{retire_comment, write_comment_status};
use super::lookup;

/// Moderation service
pub struct ModerationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ModerationService<'a> {
    /// Create a new ModerationService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    // ========================================================================
    // Users
    // ========================================================================

    /// Move a user to a new status
    ///
    /// Entering Blocked revokes every permission and leaving it restores the
    /// defaults, in the same write as the status.
    #[instrument(skip(self))]
    pub async fn set_user_status(&self, user_id: EntityId, status: UserStatus) -> ServiceResult<User> {
        let mut tx = self.ctx.begin().await?;
        let result = Self::change_standing(tx.as_mut(), user_id, status).await;
        let user = finish(tx, result).await?;

        info!(user_id = %user_id, status = status.as_str(), "User status changed");
        Ok(user)
    }

    async fn change_standing(
        tx: &mut dyn LedgerTransaction,
        user_id: EntityId,
        status: UserStatus,
    ) -> ServiceResult<User> {
        let mut user = lookup::user(tx, user_id).await?;
        let next = user.status.transition_to(status)?;
        let permissions = user.permissions_after(next);

        tx.set_user_standing(user_id, next, permissions).await?;
        user.status = next;
        user.permissions = permissions;
        Ok(user)
    }

    /// Grant or revoke individual permissions
    ///
    /// Only users in normal standing can be edited: blocked users keep an
    /// empty set until unblocked, and reported users keep theirs until the
    /// report is settled.
    #[instrument(skip(self))]
    pub async fn update_user_permissions(
        &self,
        user_id: EntityId,
        update: PermissionUpdate,
    ) -> ServiceResult<User> {
        if update.is_empty() {
            return Err(ServiceError::validation("No permission change requested"));
        }

        let mut tx = self.ctx.begin().await?;
        let result = Self::merge_permissions(tx.as_mut(), user_id, update).await;
        let user = finish(tx, result).await?;

        info!(
            user_id = %user_id,
            can_publish = user.permissions.can_publish(),
            can_comment = user.permissions.can_comment(),
            "User permissions updated"
        );
        Ok(user)
    }

    async fn merge_permissions(
        tx: &mut dyn LedgerTransaction,
        user_id: EntityId,
        update: PermissionUpdate,
    ) -> ServiceResult<User> {
        let mut user = lookup::user(tx, user_id).await?;
        match user.status {
            UserStatus::Normal => {}
            UserStatus::Reported => return Err(DomainError::UserUnderReview.into()),
            UserStatus::Blocked => return Err(DomainError::UserBlocked.into()),
        }

        let permissions = update.merge(user.permissions);
        if permissions != user.permissions {
            tx.set_user_standing(user_id, user.status, permissions).await?;
            user.permissions = permissions;
        }
        Ok(user)
    }

    // ========================================================================
    // Articles
    // ========================================================================

    /// Ban, restore, or delete an article
    #[instrument(skip(self))]
    pub async fn set_article_status(&self, article_id: EntityId, status: ArticleStatus) -> ServiceResult<Article> {
        let mut tx = self.ctx.begin().await?;
        let result = Self::change_article_status(tx.as_mut(), article_id, status).await;
        let article = finish(tx, result).await?;

        info!(article_id = %article_id, status = status.as_str(), "Article status changed");
        Ok(article)
    }

    async fn change_article_status(
        tx: &mut dyn LedgerTransaction,
        article_id: EntityId,
        status: ArticleStatus,
    ) -> ServiceResult<Article> {
        // Deleted rows are looked up too so the transition table can refuse them
        let mut article = lookup::any_article(tx, article_id).await?;
        let next = article.status.transition_to(status)?;
        tx.set_article_status(article_id, next).await?;
        article.status = next;
        Ok(article)
    }

    /// Change who can see an article; setting the current value is a no-op
    #[instrument(skip(self))]
    pub async fn set_article_visibility(
        &self,
        article_id: EntityId,
        visibility: Visibility,
    ) -> ServiceResult<Article> {
        let mut tx = self.ctx.begin().await?;
        let result = Self::change_visibility(tx.as_mut(), article_id, visibility).await;
        finish(tx, result).await
    }

    async fn change_visibility(
        tx: &mut dyn LedgerTransaction,
        article_id: EntityId,
        visibility: Visibility,
    ) -> ServiceResult<Article> {
        let mut article = lookup::live_article(tx, article_id).await?;
        if article.visibility == visibility {
            return Ok(article);
        }
        let next = article.visibility.transition_to(visibility)?;
        tx.set_article_visibility(article_id, next).await?;
        article.visibility = next;
        info!(article_id = %article_id, visibility = next.as_str(), "Article visibility changed");
        Ok(article)
    }

    // ========================================================================
    // Comments
    // ========================================================================

    /// Flag a comment for review
    #[instrument(skip(self))]
    pub async fn report_comment(&self, comment_id: EntityId) -> ServiceResult<Comment> {
        let mut tx = self.ctx.begin().await?;
        let result = Self::flag_comment(tx.as_mut(), comment_id).await;
        let comment = finish(tx, result).await?;

        info!(comment_id = %comment_id, "Comment reported");
        Ok(comment)
    }

    async fn flag_comment(tx: &mut dyn LedgerTransaction, comment_id: EntityId) -> ServiceResult<Comment> {
        let mut comment = lookup::live_comment(tx, comment_id).await?;
        comment.status = write_comment_status(tx, &comment, CommentStatus::Reported).await?;
        Ok(comment)
    }

    /// Settle a report: approval restores the comment, rejection deletes it
    /// with the same parent cascade as an author's delete
    #[instrument(skip(self))]
    pub async fn review_comment(&self, comment_id: EntityId, approve: bool) -> ServiceResult<Comment> {
        let mut tx = self.ctx.begin().await?;
        let result = Self::settle_report(tx.as_mut(), comment_id, approve).await;
        let comment = finish(tx, result).await?;

        info!(comment_id = %comment_id, approve, "Comment report reviewed");
        Ok(comment)
    }

    async fn settle_report(
        tx: &mut dyn LedgerTransaction,
        comment_id: EntityId,
        approve: bool,
    ) -> ServiceResult<Comment> {
        let mut comment = lookup::live_comment(tx, comment_id).await?;
        let verdict = if approve {
            CommentStatus::Normal
        } else {
            CommentStatus::Deleted
        };
        if comment.status != CommentStatus::Reported {
            return Err(DomainError::InvalidStatusTransition {
                entity: CommentStatus::NAME,
                from: comment.status.as_str(),
                to: verdict.as_str(),
            }
            .into());
        }

        if approve {
            write_comment_status(tx, &comment, verdict).await?;
        } else {
            retire_comment(tx, &comment).await?;
        }
        comment.status = verdict;
        Ok(comment)
    }
}
