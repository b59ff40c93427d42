//! PostgreSQL implementation of LedgerStore

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use tracing::{debug, instrument};

use blog_core::entities::{
    Article, Comment, Counter, CounterKind, Relationship, RelationshipKey, RelationshipKind, User,
};
use blog_core::traits::{LedgerStore, LedgerTransaction, RepoResult};
use blog_core::value_objects::{
    ArticleStatus, CommentStatus, EntityId, UserPermissions, UserStatus, Visibility,
};

use super::error::{map_db_error, transaction_finished};
use super::{article, comment, counter, relationship, user};

/// PostgreSQL implementation of LedgerStore
#[derive(Clone)]
pub struct PgLedgerStore {
    pool: PgPool,
}

impl PgLedgerStore {
    /// Create a new PgLedgerStore
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl LedgerStore for PgLedgerStore {
    #[instrument(skip(self))]
    async fn begin(&self) -> RepoResult<Box<dyn LedgerTransaction>> {
        let tx = self.pool.begin().await.map_err(map_db_error)?;
        Ok(Box::new(PgLedgerTransaction { tx: Some(tx) }))
    }
}

/// One database transaction
///
/// Dropping it without `commit` rolls the transaction back.
pub struct PgLedgerTransaction {
    tx: Option<Transaction<'static, Postgres>>,
}

impl PgLedgerTransaction {
    fn conn(&mut self) -> RepoResult<&mut PgConnection> {
        self.tx.as_deref_mut().ok_or_else(transaction_finished)
    }
}

#[async_trait]
impl LedgerTransaction for PgLedgerTransaction {
    async fn commit(&mut self) -> RepoResult<()> {
        let tx = self.tx.take().ok_or_else(transaction_finished)?;
        tx.commit().await.map_err(map_db_error)?;
        debug!("transaction committed");
        Ok(())
    }

    async fn rollback(&mut self) -> RepoResult<()> {
        if let Some(tx) = self.tx.take() {
            tx.rollback().await.map_err(map_db_error)?;
            debug!("transaction rolled back");
        }
        Ok(())
    }

    async fn find_user(&mut self, id: EntityId) -> RepoResult<Option<User>> {
        user::find_by_id(self.conn()?, id).await
    }

    async fn find_user_by_username(&mut self, username: &str) -> RepoResult<Option<User>> {
        user::find_by_username(self.conn()?, username).await
    }

    async fn insert_user(&mut self, new_user: &User) -> RepoResult<()> {
        user::insert(self.conn()?, new_user).await
    }

    async fn update_user_profile(&mut self, updated: &User) -> RepoResult<()> {
        user::update_profile(self.conn()?, updated).await
    }

    async fn set_user_standing(
        &mut self,
        id: EntityId,
        status: UserStatus,
        permissions: UserPermissions,
    ) -> RepoResult<()> {
        user::set_standing(self.conn()?, id, status, permissions).await
    }

    async fn find_article(&mut self, id: EntityId) -> RepoResult<Option<Article>> {
        article::find_by_id(self.conn()?, id).await
    }

    async fn insert_article(&mut self, new_article: &Article) -> RepoResult<()> {
        article::insert(self.conn()?, new_article).await
    }

    async fn update_article_content(&mut self, updated: &Article) -> RepoResult<()> {
        article::update_content(self.conn()?, updated).await
    }

    async fn set_article_status(&mut self, id: EntityId, status: ArticleStatus) -> RepoResult<()> {
        article::set_status(self.conn()?, id, status).await
    }

    async fn set_article_visibility(&mut self, id: EntityId, visibility: Visibility) -> RepoResult<()> {
        article::set_visibility(self.conn()?, id, visibility).await
    }

    async fn find_comment(&mut self, id: EntityId) -> RepoResult<Option<Comment>> {
        comment::find_by_id(self.conn()?, id).await
    }

    async fn insert_comment(&mut self, new_comment: &Comment) -> RepoResult<()> {
        comment::insert(self.conn()?, new_comment).await
    }

    async fn update_comment_content(&mut self, updated: &Comment) -> RepoResult<()> {
        comment::update_content(self.conn()?, updated).await
    }

    async fn transition_comment_status(
        &mut self,
        id: EntityId,
        from: CommentStatus,
        to: CommentStatus,
    ) -> RepoResult<bool> {
        comment::transition_status(self.conn()?, id, from, to).await
    }

    async fn comments_by_author(
        &mut self,
        author_id: EntityId,
        status: Option<CommentStatus>,
    ) -> RepoResult<Vec<Comment>> {
        comment::by_author(self.conn()?, author_id, status).await
    }

    async fn comments_by_article(&mut self, article_id: EntityId) -> RepoResult<Vec<Comment>> {
        comment::by_article(self.conn()?, article_id).await
    }

    async fn insert_relationship(&mut self, rel: &Relationship) -> RepoResult<bool> {
        relationship::insert(self.conn()?, rel).await
    }

    async fn delete_relationship(&mut self, key: RelationshipKey) -> RepoResult<bool> {
        relationship::delete(self.conn()?, key).await
    }

    async fn relationship_exists(&mut self, key: RelationshipKey) -> RepoResult<bool> {
        relationship::exists(self.conn()?, key).await
    }

    async fn relationships_by_target(
        &mut self,
        target_id: EntityId,
        kind: RelationshipKind,
    ) -> RepoResult<Vec<Relationship>> {
        relationship::by_target(self.conn()?, target_id, kind).await
    }

    async fn relationships_by_actor(
        &mut self,
        actor_id: EntityId,
        kind: RelationshipKind,
    ) -> RepoResult<Vec<Relationship>> {
        relationship::by_actor(self.conn()?, actor_id, kind).await
    }

    async fn adjust_counter(&mut self, target: Counter, delta: i64) -> RepoResult<Option<i64>> {
        counter::adjust(self.conn()?, target, delta).await
    }

    async fn read_counter(&mut self, target: Counter) -> RepoResult<Option<i64>> {
        counter::read(self.conn()?, target).await
    }

    async fn overwrite_counter(&mut self, target: Counter, value: i64) -> RepoResult<()> {
        counter::overwrite(self.conn()?, target, value).await
    }

    async fn count_live(&mut self, target: Counter) -> RepoResult<i64> {
        counter::count_live(self.conn()?, target).await
    }

    async fn counter_owners(&mut self, kind: CounterKind) -> RepoResult<Vec<EntityId>> {
        counter::owners(self.conn()?, kind).await
    }
}
