//! Row lookups shared by the services
//!
//! Soft-deleted articles and comments are reported as missing.

use blog_core::entities::{Article, Comment, TargetKind, User};
use blog_core::traits::{LedgerTransaction, RepoResult};
use blog_core::{DomainError, EntityId};

pub async fn user(tx: &mut dyn LedgerTransaction, id: EntityId) -> RepoResult<User> {
    tx.find_user(id).await?.ok_or(DomainError::UserNotFound(id))
}

pub async fn live_article(tx: &mut dyn LedgerTransaction, id: EntityId) -> RepoResult<Article> {
    tx.find_article(id)
        .await?
        .filter(Article::is_live)
        .ok_or(DomainError::ArticleNotFound(id))
}

/// Any article row, deleted ones included
pub async fn any_article(tx: &mut dyn LedgerTransaction, id: EntityId) -> RepoResult<Article> {
    tx.find_article(id).await?.ok_or(DomainError::ArticleNotFound(id))
}

pub async fn live_comment(tx: &mut dyn LedgerTransaction, id: EntityId) -> RepoResult<Comment> {
    tx.find_comment(id)
        .await?
        .filter(Comment::is_live)
        .ok_or(DomainError::CommentNotFound(id))
}

/// Check that a relationship target exists and is live
pub async fn ensure_target(
    tx: &mut dyn LedgerTransaction,
    kind: TargetKind,
    id: EntityId,
) -> RepoResult<()> {
    match kind {
        TargetKind::Article => live_article(tx, id).await.map(drop),
        TargetKind::Comment => live_comment(tx, id).await.map(drop),
        TargetKind::User => user(tx, id).await.map(drop),
    }
}
