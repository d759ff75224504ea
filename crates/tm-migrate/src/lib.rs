//! Migration ledger and runner for Tidemark.
//!
//! The [`Ledger`] records which change-sets have been applied inside the
//! target database. The [`Migrator`] combines it with the change-set store:
//! connecting yields a [`Session`] that owns the connection and can apply
//! pending change-sets, roll back the latest one, and report status.

pub mod error;
pub mod ledger;
pub mod report;
pub mod runner;

pub use error::{MigrateError, MigrateResult};
pub use ledger::{Ledger, LedgerRecord};
pub use report::{RollbackOutcome, RunReport, StatusReport};
pub use runner::{Migrator, Session};
