//! Repository implementations
//!
//! Statement functions are grouped per table and take a borrowed
//! connection; [`PgLedgerStore`] stitches them into the transaction port
//! defined in blog-core.

mod article;
mod comment;
mod counter;
mod error;
mod ledger;
mod relationship;
mod user;

pub use error::{map_db_error, map_unique_violation, transaction_finished};
pub use ledger::{PgLedgerStore, PgLedgerTransaction};
