//! Counter drift audit
//!
//! Recounts the rows behind a denormalized counter and, when asked, writes
//! the recount back. The ledger never needs this to stay correct; it exists
//! for rows edited outside the ledger.

use blog_core::entities::{Counter, CounterKind, DriftReport, TargetKind};
use blog_core::traits::LedgerTransaction;
use blog_core::DomainError;
use tracing::{info, instrument, warn};

use super::context::{finish, ServiceContext};
use super::error::ServiceResult;

/// Outcome of auditing every counter of one kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditSummary {
    pub kind: CounterKind,
    pub checked: usize,
    /// Counters whose stored value differed from the recount
    pub drifted: Vec<DriftReport>,
    pub repaired: bool,
}

/// Counter audit service
pub struct AuditService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuditService<'a> {
    /// Create a new AuditService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Compare one counter with a recount of its rows
    #[instrument(skip(self))]
    pub async fn audit(&self, counter: Counter) -> ServiceResult<DriftReport> {
        let mut tx = self.ctx.begin().await?;
        let result = Self::inspect(tx.as_mut(), counter).await;
        finish(tx, result).await
    }

    /// Audit one counter and overwrite it with the recount if it drifted
    ///
    /// Returns the report from before the repair.
    #[instrument(skip(self))]
    pub async fn repair(&self, counter: Counter) -> ServiceResult<DriftReport> {
        let mut tx = self.ctx.begin().await?;
        let result = Self::inspect_and_fix(tx.as_mut(), counter).await;
        finish(tx, result).await
    }

    /// Audit (and optionally repair) every counter of `kind`
    ///
    /// Each counter is handled in its own transaction.
    #[instrument(skip(self))]
    pub async fn audit_all(&self, kind: CounterKind, repair: bool) -> ServiceResult<AuditSummary> {
        let mut tx = self.ctx.begin().await?;
        let result = tx.counter_owners(kind).await.map_err(Into::into);
        let owners = finish(tx, result).await?;

        let mut drifted = Vec::new();
        for owner_id in &owners {
            let counter = Counter::new(*owner_id, kind);
            let report = if repair {
                self.repair(counter).await?
            } else {
                self.audit(counter).await?
            };
            if report.is_drifted() {
                drifted.push(report);
            }
        }

        info!(
            kind = kind.as_str(),
            checked = owners.len(),
            drifted = drifted.len(),
            repair,
            "Counter audit finished"
        );
        Ok(AuditSummary {
            kind,
            checked: owners.len(),
            drifted,
            repaired: repair,
        })
    }

    async fn inspect(tx: &mut dyn LedgerTransaction, counter: Counter) -> ServiceResult<DriftReport> {
        let stored = tx
            .read_counter(counter)
            .await?
            .ok_or_else(|| owner_not_found(counter))?;
        let live = tx.count_live(counter).await?;

        let report = DriftReport { counter, stored, live };
        if report.is_drifted() {
            warn!(
                kind = counter.kind.as_str(),
                owner_id = %counter.owner_id,
                stored,
                live,
                "Counter drift detected"
            );
        }
        Ok(report)
    }

    async fn inspect_and_fix(tx: &mut dyn LedgerTransaction, counter: Counter) -> ServiceResult<DriftReport> {
        let report = Self::inspect(tx, counter).await?;
        if report.is_drifted() {
            tx.overwrite_counter(counter, report.live).await?;
            info!(
                kind = counter.kind.as_str(),
                owner_id = %counter.owner_id,
                value = report.live,
                "Counter repaired"
            );
        }
        Ok(report)
    }
}

fn owner_not_found(counter: Counter) -> DomainError {
    match counter.kind.owner() {
        TargetKind::Article => DomainError::ArticleNotFound(counter.owner_id),
        TargetKind::Comment => DomainError::CommentNotFound(counter.owner_id),
        TargetKind::User => DomainError::UserNotFound(counter.owner_id),
    }
}
