//! Content service
//!
//! Registration, profiles, articles, and comment edits: the rows the ledger
//! counts relationships against.

use blog_core::entities::{Article, Comment, ProfileUpdate, User};
use blog_core::traits::LedgerTransaction;
use blog_core::{ArticleStatus, DomainError, EntityId, Lifecycle, UserStatus};
use tracing::{info, instrument};
use validator::Validate;

use crate::dto::{EditArticleRequest, EditCommentRequest, PublishArticleRequest, RegisterUserRequest};

use super::context::{finish, ServiceContext};
use super::error::{ServiceError, ServiceResult};
use super::{lookup, text};

/// Content service
pub struct ContentService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ContentService<'a> {
    /// Create a new ContentService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    // ========================================================================
    // Users
    // ========================================================================

    /// Create an account; the username must be unused
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn register_user(&self, request: RegisterUserRequest) -> ServiceResult<User> {
        request.validate()?;
        let username = request.username.trim().to_string();
        let nickname = request.nickname.trim().to_string();
        if nickname.is_empty() {
            return Err(ServiceError::validation("Nickname is required"));
        }

        let user = User::new(self.ctx.generate_id(), username, nickname);
        let mut tx = self.ctx.begin().await?;
        let result = Self::insert_user(tx.as_mut(), &user).await;
        finish(tx, result).await?;

        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    async fn insert_user(tx: &mut dyn LedgerTransaction, user: &User) -> ServiceResult<()> {
        if tx.find_user_by_username(&user.username).await?.is_some() {
            return Err(DomainError::UsernameTaken.into());
        }
        // The store still rejects a username claimed concurrently
        tx.insert_user(user).await?;
        Ok(())
    }

    /// Apply a profile update to a user who is not blocked
    #[instrument(skip(self, update))]
    pub async fn update_profile(&self, user_id: EntityId, update: ProfileUpdate) -> ServiceResult<User> {
        update.validate()?;
        if update.nickname.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(ServiceError::validation("Nickname cannot be blank"));
        }

        let mut tx = self.ctx.begin().await?;
        let result = Self::merge_profile(tx.as_mut(), user_id, &update).await;
        finish(tx, result).await
    }

    async fn merge_profile(
        tx: &mut dyn LedgerTransaction,
        user_id: EntityId,
        update: &ProfileUpdate,
    ) -> ServiceResult<User> {
        let mut user = lookup::user(tx, user_id).await?;
        if user.status.is_blocked() {
            return Err(DomainError::MissingPermission("PROFILE").into());
        }

        if user.apply_profile(update) {
            tx.update_user_profile(&user).await?;
            info!(user_id = %user_id, "Profile updated");
        }
        Ok(user)
    }

    // ========================================================================
    // Articles
    // ========================================================================

    /// Publish a new article; the author must be in good standing with the
    /// publish permission
    #[instrument(skip(self, request))]
    pub async fn publish_article(
        &self,
        author_id: EntityId,
        request: PublishArticleRequest,
    ) -> ServiceResult<Article> {
        let limits = self.ctx.limits();
        let title = text::normalize(&request.title, "Title", limits.max_title_length)?;
        let content = text::normalize(&request.content, "Content", limits.max_article_length)?;

        let article = Article::new(self.ctx.generate_id(), author_id, title, content);
        let mut tx = self.ctx.begin().await?;
        let result = Self::insert_article(tx.as_mut(), &article).await;
        finish(tx, result).await?;

        info!(article_id = %article.id, author_id = %author_id, "Article published");
        Ok(article)
    }

    async fn insert_article(tx: &mut dyn LedgerTransaction, article: &Article) -> ServiceResult<()> {
        let author = lookup::user(tx, article.author_id).await?;
        // Reported authors keep their flags but may not publish until cleared
        if author.status != UserStatus::Normal || !author.can_publish() {
            return Err(DomainError::MissingPermission("PUBLISH").into());
        }
        tx.insert_article(article).await?;
        Ok(())
    }

    /// Change the title and/or content of an article the caller wrote
    #[instrument(skip(self, request))]
    pub async fn edit_article(
        &self,
        author_id: EntityId,
        article_id: EntityId,
        request: EditArticleRequest,
    ) -> ServiceResult<Article> {
        if request.is_empty() {
            return Err(ServiceError::validation("Nothing to update"));
        }
        let limits = self.ctx.limits();
        let title = request
            .title
            .as_deref()
            .map(|t| text::normalize(t, "Title", limits.max_title_length))
            .transpose()?;
        let content = request
            .content
            .as_deref()
            .map(|c| text::normalize(c, "Content", limits.max_article_length))
            .transpose()?;

        let mut tx = self.ctx.begin().await?;
        let result = Self::rewrite_article(tx.as_mut(), author_id, article_id, title, content).await;
        let article = finish(tx, result).await?;

        info!(article_id = %article_id, "Article edited");
        Ok(article)
    }

    async fn rewrite_article(
        tx: &mut dyn LedgerTransaction,
        author_id: EntityId,
        article_id: EntityId,
        title: Option<String>,
        content: Option<String>,
    ) -> ServiceResult<Article> {
        let mut article = lookup::live_article(tx, article_id).await?;
        if !article.is_authored_by(author_id) {
            return Err(DomainError::NotArticleAuthor.into());
        }
        article.edit(title, content);
        tx.update_article_content(&article).await?;
        Ok(article)
    }

    /// Soft-delete an article the caller wrote
    ///
    /// Relationship rows and their counters are left as they are, so the two
    /// stay equal.
    #[instrument(skip(self))]
    pub async fn delete_article(&self, author_id: EntityId, article_id: EntityId) -> ServiceResult<()> {
        let mut tx = self.ctx.begin().await?;
        let result = Self::retire_article(tx.as_mut(), author_id, article_id).await;
        finish(tx, result).await?;

        info!(article_id = %article_id, "Article deleted");
        Ok(())
    }

    async fn retire_article(
        tx: &mut dyn LedgerTransaction,
        author_id: EntityId,
        article_id: EntityId,
    ) -> ServiceResult<()> {
        let article = lookup::live_article(tx, article_id).await?;
        if !article.is_authored_by(author_id) {
            return Err(DomainError::NotArticleAuthor.into());
        }
        let next = article.status.transition_to(ArticleStatus::Deleted)?;
        tx.set_article_status(article_id, next).await?;
        Ok(())
    }

    // ========================================================================
    // Comments
    // ========================================================================

    /// Replace the text of a comment the caller wrote
    #[instrument(skip(self, request))]
    pub async fn edit_comment(
        &self,
        author_id: EntityId,
        comment_id: EntityId,
        request: EditCommentRequest,
    ) -> ServiceResult<Comment> {
        let limit = self.ctx.limits().max_comment_length;
        let content = text::normalize(&request.content, "Comment content", limit)?;

        let mut tx = self.ctx.begin().await?;
        let result = Self::rewrite_comment(tx.as_mut(), author_id, comment_id, content).await;
        finish(tx, result).await
    }

    async fn rewrite_comment(
        tx: &mut dyn LedgerTransaction,
        author_id: EntityId,
        comment_id: EntityId,
        content: String,
    ) -> ServiceResult<Comment> {
        let mut comment = lookup::live_comment(tx, comment_id).await?;
        if !comment.is_authored_by(author_id) {
            return Err(DomainError::NotCommentAuthor.into());
        }
        comment.content = content;
        comment.updated_at = chrono::Utc::now();
        tx.update_comment_content(&comment).await?;
        Ok(comment)
    }
}
