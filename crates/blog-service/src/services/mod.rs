//! Business logic services
//!
//! Every service borrows a [`ServiceContext`] and runs each public
//! operation inside one transaction opened from its store.

pub mod audit;
pub mod content;
pub mod context;
pub mod error;
pub mod ledger;
pub mod moderation;

mod lookup;
mod text;

// Re-export all services for convenience
pub use audit::{AuditService, AuditSummary};
pub use content::ContentService;
pub use context::{finish, ServiceContext, ServiceContextBuilder};
pub use error::{ErrorKind, ServiceError, ServiceResult};
pub use ledger::LedgerService;
pub use moderation::ModerationService;
