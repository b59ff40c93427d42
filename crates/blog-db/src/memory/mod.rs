//! In-process LedgerStore
//!
//! A transaction takes the store's async mutex for its whole lifetime and
//! works on a private copy of the state. `commit` swaps the copy in; any
//! other ending (rollback, error, drop) throws it away. Holding the lock
//! for the whole transaction serializes writers the same way the
//! relationship primary key does in PostgreSQL.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, instrument};

use blog_core::entities::{
    Article, Comment, Counter, CounterKind, CounterSource, Relationship, RelationshipKey,
    RelationshipKind, TargetKind, User,
};
use blog_core::error::DomainError;
use blog_core::traits::{LedgerStore, LedgerTransaction, RepoResult};
use blog_core::value_objects::{
    ArticleStatus, CommentStatus, EntityId, UserPermissions, UserStatus, Visibility,
};

use crate::repositories::transaction_finished;

#[derive(Debug, Clone, Default)]
struct MemoryState {
    users: BTreeMap<EntityId, User>,
    articles: BTreeMap<EntityId, Article>,
    comments: BTreeMap<EntityId, Comment>,
    relationships: BTreeMap<RelationshipKey, Relationship>,
}

impl MemoryState {
    fn counter_slot(&mut self, counter: Counter) -> Option<&mut i64> {
        let id = counter.owner_id;
        match counter.kind {
            CounterKind::ArticleLikes => self.articles.get_mut(&id).map(|a| &mut a.like_count),
            CounterKind::ArticleFavorites => self.articles.get_mut(&id).map(|a| &mut a.favorite_count),
            CounterKind::CommentLikes => self.comments.get_mut(&id).map(|c| &mut c.like_count),
            CounterKind::CommentReplies => self.comments.get_mut(&id).map(|c| &mut c.reply_count),
            CounterKind::UserFollowers => self.users.get_mut(&id).map(|u| &mut u.follower_count),
            CounterKind::UserFollowing => self.users.get_mut(&id).map(|u| &mut u.following_count),
        }
    }

    fn newest_first(mut rows: Vec<Relationship>) -> Vec<Relationship> {
        rows.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.key().cmp(&a.key()))
        });
        rows
    }

    fn newest_comments_first(mut rows: Vec<Comment>) -> Vec<Comment> {
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        rows
    }
}

/// In-memory implementation of LedgerStore
#[derive(Clone, Default)]
pub struct MemoryLedgerStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerStore for MemoryLedgerStore {
    #[instrument(skip(self))]
    async fn begin(&self) -> RepoResult<Box<dyn LedgerTransaction>> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(MemoryLedgerTransaction {
            guard: Some(guard),
            staged,
        }))
    }
}

/// Transaction over [`MemoryLedgerStore`]
pub struct MemoryLedgerTransaction {
    guard: Option<OwnedMutexGuard<MemoryState>>,
    staged: MemoryState,
}

impl MemoryLedgerTransaction {
    fn state(&mut self) -> RepoResult<&mut MemoryState> {
        if self.guard.is_some() {
            Ok(&mut self.staged)
        } else {
            Err(transaction_finished())
        }
    }
}

fn owner_not_found(counter: Counter) -> DomainError {
    match counter.kind.owner() {
        TargetKind::Article => DomainError::ArticleNotFound(counter.owner_id),
        TargetKind::Comment => DomainError::CommentNotFound(counter.owner_id),
        TargetKind::User => DomainError::UserNotFound(counter.owner_id),
    }
}

fn missing_reference(what: &str, id: EntityId) -> DomainError {
    DomainError::DatabaseError(format!("foreign key violation: {what} {id} does not exist"))
}

#[async_trait]
impl LedgerTransaction for MemoryLedgerTransaction {
    async fn commit(&mut self) -> RepoResult<()> {
        let mut guard = self.guard.take().ok_or_else(transaction_finished)?;
        *guard = std::mem::take(&mut self.staged);
        debug!("memory transaction committed");
        Ok(())
    }

    async fn rollback(&mut self) -> RepoResult<()> {
        if self.guard.take().is_some() {
            self.staged = MemoryState::default();
            debug!("memory transaction rolled back");
        }
        Ok(())
    }

    async fn find_user(&mut self, id: EntityId) -> RepoResult<Option<User>> {
        Ok(self.state()?.users.get(&id).cloned())
    }

    async fn find_user_by_username(&mut self, username: &str) -> RepoResult<Option<User>> {
        Ok(self
            .state()?
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn insert_user(&mut self, user: &User) -> RepoResult<()> {
        let state = self.state()?;
        if state.users.values().any(|u| u.username == user.username) {
            return Err(DomainError::UsernameTaken);
        }
        if state.users.contains_key(&user.id) {
            return Err(DomainError::DatabaseError(format!("duplicate user id {}", user.id)));
        }
        state.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn update_user_profile(&mut self, user: &User) -> RepoResult<()> {
        let stored = self
            .state()?
            .users
            .get_mut(&user.id)
            .ok_or(DomainError::UserNotFound(user.id))?;
        stored.nickname.clone_from(&user.nickname);
        stored.gender.clone_from(&user.gender);
        stored.intro.clone_from(&user.intro);
        stored.avatar.clone_from(&user.avatar);
        stored.updated_at = chrono::Utc::now();
        Ok(())
    }

    async fn set_user_standing(
        &mut self,
        id: EntityId,
        status: UserStatus,
        permissions: UserPermissions,
    ) -> RepoResult<()> {
        let stored = self
            .state()?
            .users
            .get_mut(&id)
            .ok_or(DomainError::UserNotFound(id))?;
        stored.status = status;
        stored.permissions = permissions;
        stored.updated_at = chrono::Utc::now();
        Ok(())
    }

    async fn find_article(&mut self, id: EntityId) -> RepoResult<Option<Article>> {
        Ok(self.state()?.articles.get(&id).cloned())
    }

    async fn insert_article(&mut self, article: &Article) -> RepoResult<()> {
        let state = self.state()?;
        if !state.users.contains_key(&article.author_id) {
            return Err(missing_reference("user", article.author_id));
        }
        state.articles.insert(article.id, article.clone());
        Ok(())
    }

    async fn update_article_content(&mut self, article: &Article) -> RepoResult<()> {
        let stored = self
            .state()?
            .articles
            .get_mut(&article.id)
            .ok_or(DomainError::ArticleNotFound(article.id))?;
        stored.title.clone_from(&article.title);
        stored.content.clone_from(&article.content);
        stored.updated_at = chrono::Utc::now();
        Ok(())
    }

    async fn set_article_status(&mut self, id: EntityId, status: ArticleStatus) -> RepoResult<()> {
        let stored = self
            .state()?
            .articles
            .get_mut(&id)
            .ok_or(DomainError::ArticleNotFound(id))?;
        stored.status = status;
        stored.updated_at = chrono::Utc::now();
        Ok(())
    }

    async fn set_article_visibility(&mut self, id: EntityId, visibility: Visibility) -> RepoResult<()> {
        let stored = self
            .state()?
            .articles
            .get_mut(&id)
            .ok_or(DomainError::ArticleNotFound(id))?;
        stored.visibility = visibility;
        stored.updated_at = chrono::Utc::now();
        Ok(())
    }

    async fn find_comment(&mut self, id: EntityId) -> RepoResult<Option<Comment>> {
        Ok(self.state()?.comments.get(&id).cloned())
    }

    async fn insert_comment(&mut self, comment: &Comment) -> RepoResult<()> {
        let state = self.state()?;
        if !state.articles.contains_key(&comment.article_id) {
            return Err(missing_reference("article", comment.article_id));
        }
        if !state.users.contains_key(&comment.author_id) {
            return Err(missing_reference("user", comment.author_id));
        }
        if let Some(parent_id) = comment.parent_id {
            if !state.comments.contains_key(&parent_id) {
                return Err(missing_reference("comment", parent_id));
            }
        }
        state.comments.insert(comment.id, comment.clone());
        Ok(())
    }

    async fn update_comment_content(&mut self, comment: &Comment) -> RepoResult<()> {
        let stored = self
            .state()?
            .comments
            .get_mut(&comment.id)
            .ok_or(DomainError::CommentNotFound(comment.id))?;
        stored.content.clone_from(&comment.content);
        stored.updated_at = chrono::Utc::now();
        Ok(())
    }

    async fn transition_comment_status(
        &mut self,
        id: EntityId,
        from: CommentStatus,
        to: CommentStatus,
    ) -> RepoResult<bool> {
        match self.state()?.comments.get_mut(&id) {
            Some(stored) if stored.status == from => {
                stored.status = to;
                stored.updated_at = chrono::Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn comments_by_author(
        &mut self,
        author_id: EntityId,
        status: Option<CommentStatus>,
    ) -> RepoResult<Vec<Comment>> {
        let rows = self
            .state()?
            .comments
            .values()
            .filter(|c| c.author_id == author_id)
            .filter(|c| match status {
                Some(wanted) => c.status == wanted,
                None => !c.status.is_deleted(),
            })
            .cloned()
            .collect();
        Ok(MemoryState::newest_comments_first(rows))
    }

    async fn comments_by_article(&mut self, article_id: EntityId) -> RepoResult<Vec<Comment>> {
        let rows = self
            .state()?
            .comments
            .values()
            .filter(|c| c.article_id == article_id && !c.status.is_deleted())
            .cloned()
            .collect();
        Ok(MemoryState::newest_comments_first(rows))
    }

    async fn insert_relationship(&mut self, relationship: &Relationship) -> RepoResult<bool> {
        let state = self.state()?;
        if !state.users.contains_key(&relationship.actor_id) {
            return Err(missing_reference("user", relationship.actor_id));
        }
        let key = relationship.key();
        if state.relationships.contains_key(&key) {
            return Ok(false);
        }
        state.relationships.insert(key, relationship.clone());
        Ok(true)
    }

    async fn delete_relationship(&mut self, key: RelationshipKey) -> RepoResult<bool> {
        Ok(self.state()?.relationships.remove(&key).is_some())
    }

    async fn relationship_exists(&mut self, key: RelationshipKey) -> RepoResult<bool> {
        Ok(self.state()?.relationships.contains_key(&key))
    }

    async fn relationships_by_target(
        &mut self,
        target_id: EntityId,
        kind: RelationshipKind,
    ) -> RepoResult<Vec<Relationship>> {
        let rows = self
            .state()?
            .relationships
            .values()
            .filter(|r| r.target_id == target_id && r.kind == kind)
            .cloned()
            .collect();
        Ok(MemoryState::newest_first(rows))
    }

    async fn relationships_by_actor(
        &mut self,
        actor_id: EntityId,
        kind: RelationshipKind,
    ) -> RepoResult<Vec<Relationship>> {
        let rows = self
            .state()?
            .relationships
            .values()
            .filter(|r| r.actor_id == actor_id && r.kind == kind)
            .cloned()
            .collect();
        Ok(MemoryState::newest_first(rows))
    }

    async fn adjust_counter(&mut self, counter: Counter, delta: i64) -> RepoResult<Option<i64>> {
        Ok(self.state()?.counter_slot(counter).map(|slot| {
            *slot = (*slot + delta).max(0);
            *slot
        }))
    }

    async fn read_counter(&mut self, counter: Counter) -> RepoResult<Option<i64>> {
        Ok(self.state()?.counter_slot(counter).map(|slot| *slot))
    }

    async fn overwrite_counter(&mut self, counter: Counter, value: i64) -> RepoResult<()> {
        let slot = self
            .state()?
            .counter_slot(counter)
            .ok_or_else(|| owner_not_found(counter))?;
        *slot = value.max(0);
        Ok(())
    }

    async fn count_live(&mut self, counter: Counter) -> RepoResult<i64> {
        let state = self.state()?;
        let owner = counter.owner_id;
        let live = match counter.kind.source() {
            CounterSource::Targeted(kind) => state
                .relationships
                .values()
                .filter(|r| r.kind == kind && r.target_id == owner)
                .count(),
            CounterSource::Acted(kind) => state
                .relationships
                .values()
                .filter(|r| r.kind == kind && r.actor_id == owner)
                .count(),
            CounterSource::LiveReplies => state
                .comments
                .values()
                .filter(|c| c.parent_id == Some(owner) && !c.status.is_deleted())
                .count(),
        };
        Ok(live as i64)
    }

    async fn counter_owners(&mut self, kind: CounterKind) -> RepoResult<Vec<EntityId>> {
        let state = self.state()?;
        let ids = match kind.owner() {
            TargetKind::Article => state.articles.keys().copied().collect(),
            TargetKind::Comment => state.comments.keys().copied().collect(),
            TargetKind::User => state.users.keys().copied().collect(),
        };
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64, name: &str) -> User {
        User::new(EntityId::new(id), name.to_string(), name.to_string())
    }

    async fn seeded() -> MemoryLedgerStore {
        let store = MemoryLedgerStore::new();
        let mut tx = store.begin().await.unwrap();
        tx.insert_user(&user(1, "alice")).await.unwrap();
        tx.insert_user(&user(2, "bob")).await.unwrap();
        tx.insert_article(&Article::new(
            EntityId::new(10),
            EntityId::new(1),
            "Title".to_string(),
            "Body".to_string(),
        ))
        .await
        .unwrap();
        tx.commit().await.unwrap();
        store
    }

    fn like(actor: i64, target: i64) -> Relationship {
        Relationship::new(RelationshipKey::new(
            EntityId::new(actor),
            EntityId::new(target),
            RelationshipKind::Like,
        ))
    }

    #[tokio::test]
    async fn test_dropped_transaction_leaves_no_trace() {
        let store = seeded().await;
        let counter = Counter::new(EntityId::new(10), CounterKind::ArticleLikes);

        {
            let mut tx = store.begin().await.unwrap();
            assert!(tx.insert_relationship(&like(2, 10)).await.unwrap());
            assert_eq!(tx.adjust_counter(counter, 1).await.unwrap(), Some(1));
            // dropped without commit
        }

        let mut tx = store.begin().await.unwrap();
        assert_eq!(tx.read_counter(counter).await.unwrap(), Some(0));
        assert!(!tx.relationship_exists(like(2, 10).key()).await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_insert_reports_false() {
        let store = seeded().await;
        let mut tx = store.begin().await.unwrap();
        assert!(tx.insert_relationship(&like(2, 10)).await.unwrap());
        assert!(!tx.insert_relationship(&like(2, 10)).await.unwrap());
        tx.commit().await.unwrap();
    }

    #[tokio::test]
    async fn test_adjust_counter_floors_at_zero() {
        let store = seeded().await;
        let mut tx = store.begin().await.unwrap();
        let counter = Counter::new(EntityId::new(10), CounterKind::ArticleFavorites);
        assert_eq!(tx.adjust_counter(counter, -1).await.unwrap(), Some(0));

        let missing = Counter::new(EntityId::new(99), CounterKind::ArticleFavorites);
        assert_eq!(tx.adjust_counter(missing, 1).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_username_uniqueness() {
        let store = seeded().await;
        let mut tx = store.begin().await.unwrap();
        let err = tx.insert_user(&user(3, "alice")).await.unwrap_err();
        assert!(matches!(err, DomainError::UsernameTaken));
    }

    #[tokio::test]
    async fn test_finished_transaction_rejects_statements() {
        let store = seeded().await;
        let mut tx = store.begin().await.unwrap();
        tx.commit().await.unwrap();
        assert!(tx.find_user(EntityId::new(1)).await.is_err());
        assert!(tx.commit().await.is_err());
        // rollback after the end is a no-op
        tx.rollback().await.unwrap();
    }

    #[tokio::test]
    async fn test_count_live_ignores_deleted_replies() {
        let store = seeded().await;
        let mut tx = store.begin().await.unwrap();
        let root = Comment::root(
            EntityId::new(20),
            EntityId::new(10),
            EntityId::new(1),
            "root".to_string(),
        );
        let keep = Comment::reply_to(&root, EntityId::new(21), EntityId::new(2), "a".to_string());
        let mut gone = Comment::reply_to(&root, EntityId::new(22), EntityId::new(2), "b".to_string());
        gone.status = CommentStatus::Deleted;
        tx.insert_comment(&root).await.unwrap();
        tx.insert_comment(&keep).await.unwrap();
        tx.insert_comment(&gone).await.unwrap();

        let replies = Counter::new(root.id, CounterKind::CommentReplies);
        assert_eq!(tx.count_live(replies).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_status_transition_is_compare_and_set() {
        let store = seeded().await;
        let mut tx = store.begin().await.unwrap();
        let root = Comment::root(
            EntityId::new(20),
            EntityId::new(10),
            EntityId::new(1),
            "root".to_string(),
        );
        tx.insert_comment(&root).await.unwrap();

        assert!(tx
            .transition_comment_status(root.id, CommentStatus::Normal, CommentStatus::Deleted)
            .await
            .unwrap());
        // second writer saw Normal but the row has moved on
        assert!(!tx
            .transition_comment_status(root.id, CommentStatus::Normal, CommentStatus::Deleted)
            .await
            .unwrap());
        assert!(!tx
            .transition_comment_status(EntityId::new(99), CommentStatus::Normal, CommentStatus::Deleted)
            .await
            .unwrap());

        let stored = tx.find_comment(root.id).await.unwrap().unwrap();
        assert_eq!(stored.status, CommentStatus::Deleted);
    }

    #[tokio::test]
    async fn test_comments_by_author_filters_status() {
        let store = seeded().await;
        let mut tx = store.begin().await.unwrap();
        let mut older = Comment::root(
            EntityId::new(20),
            EntityId::new(10),
            EntityId::new(2),
            "first".to_string(),
        );
        older.created_at -= chrono::Duration::seconds(5);
        let mut flagged = Comment::root(
            EntityId::new(21),
            EntityId::new(10),
            EntityId::new(2),
            "second".to_string(),
        );
        flagged.status = CommentStatus::Reported;
        let mut gone = Comment::root(
            EntityId::new(22),
            EntityId::new(10),
            EntityId::new(2),
            "third".to_string(),
        );
        gone.status = CommentStatus::Deleted;
        let theirs = Comment::root(
            EntityId::new(23),
            EntityId::new(10),
            EntityId::new(1),
            "other".to_string(),
        );
        for comment in [&older, &flagged, &gone, &theirs] {
            tx.insert_comment(comment).await.unwrap();
        }

        let ids = |rows: Vec<Comment>| rows.iter().map(|c| c.id.into_inner()).collect::<Vec<_>>();
        let live = tx.comments_by_author(EntityId::new(2), None).await.unwrap();
        assert_eq!(ids(live), vec![21, 20]);

        let reported = tx
            .comments_by_author(EntityId::new(2), Some(CommentStatus::Reported))
            .await
            .unwrap();
        assert_eq!(ids(reported), vec![21]);

        let deleted = tx
            .comments_by_author(EntityId::new(2), Some(CommentStatus::Deleted))
            .await
            .unwrap();
        assert_eq!(ids(deleted), vec![22]);

        let on_article = tx.comments_by_article(EntityId::new(10)).await.unwrap();
        assert_eq!(ids(on_article), vec![23, 21, 20]);
    }

    #[tokio::test]
    async fn test_listing_is_newest_first() {
        let store = seeded().await;
        let mut tx = store.begin().await.unwrap();
        let mut older = like(1, 10);
        older.created_at -= chrono::Duration::seconds(5);
        tx.insert_relationship(&older).await.unwrap();
        tx.insert_relationship(&like(2, 10)).await.unwrap();

        let rows = tx
            .relationships_by_target(EntityId::new(10), RelationshipKind::Like)
            .await
            .unwrap();
        let actors: Vec<i64> = rows.iter().map(|r| r.actor_id.into_inner()).collect();
        assert_eq!(actors, vec![2, 1]);
    }
}
