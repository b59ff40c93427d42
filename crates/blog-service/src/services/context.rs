//! Service context - dependency container for services
//!
//! Holds the ledger store, the id generator, and the content limits.

use std::sync::Arc;

use blog_common::{AppConfig, ContentLimits};
use blog_core::traits::{LedgerStore, LedgerTransaction};
use blog_core::{EntityId, IdGenerator};
use tracing::warn;

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    store: Arc<dyn LedgerStore>,
    id_generator: Arc<IdGenerator>,
    limits: ContentLimits,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(store: Arc<dyn LedgerStore>, id_generator: Arc<IdGenerator>, limits: ContentLimits) -> Self {
        Self {
            store,
            id_generator,
            limits,
        }
    }

    /// Context wired from loaded configuration
    pub fn from_config(store: Arc<dyn LedgerStore>, config: &AppConfig) -> Self {
        Self::new(store, Arc::new(IdGenerator::new(config.worker_id)), config.content)
    }

    /// Get the ledger store
    pub fn store(&self) -> &dyn LedgerStore {
        self.store.as_ref()
    }

    /// Open a transaction scope on the ledger store
    pub async fn begin(&self) -> ServiceResult<Box<dyn LedgerTransaction>> {
        Ok(self.store.begin().await?)
    }

    pub fn limits(&self) -> &ContentLimits {
        &self.limits
    }

    /// Generate a new entity id
    pub fn generate_id(&self) -> EntityId {
        self.id_generator.next_id()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("store", &"dyn LedgerStore")
            .field("worker_id", &self.id_generator.worker_id())
            .field("limits", &self.limits)
            .finish()
    }
}

/// End a transaction scope: commit on success, roll back on failure
///
/// The operation's own error wins over a rollback failure, which is only logged.
pub async fn finish<T>(mut tx: Box<dyn LedgerTransaction>, result: ServiceResult<T>) -> ServiceResult<T> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!(error = %rollback_err, "rollback failed");
            }
            Err(err)
        }
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    store: Option<Arc<dyn LedgerStore>>,
    id_generator: Option<Arc<IdGenerator>>,
    limits: Option<ContentLimits>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(mut self, store: Arc<dyn LedgerStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn id_generator(mut self, generator: Arc<IdGenerator>) -> Self {
        self.id_generator = Some(generator);
        self
    }

    pub fn limits(mut self, limits: ContentLimits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Build the ServiceContext
    ///
    /// Missing limits fall back to the defaults; a missing id generator
    /// uses worker 0.
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if no store was given
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.store
                .ok_or_else(|| ServiceError::validation("store is required"))?,
            self.id_generator
                .unwrap_or_else(|| Arc::new(IdGenerator::new(0))),
            self.limits.unwrap_or_default(),
        ))
    }
}
