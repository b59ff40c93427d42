//! Storage ports

mod store;

pub use store::{LedgerStore, LedgerTransaction, RepoResult};
