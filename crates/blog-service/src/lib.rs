//! # blog-service
//!
//! Application layer: the relationship ledger, content and moderation
//! services, counter audits, and the DTOs they are exposed through.

pub mod dto;
pub mod services;

pub use services::{
    AuditService, AuditSummary, ContentService, ErrorKind, LedgerService, ModerationService,
    ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult,
};
