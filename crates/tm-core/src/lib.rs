//! tm-core - Core library for Tidemark
//!
//! This crate provides configuration parsing, the change-set identifier and
//! store types, script authoring, and the statement splitter shared by the
//! migration runner and the CLI. Nothing here touches the database.

pub mod author;
pub mod change_set;
pub mod config;
pub mod error;
pub mod statements;
pub mod store;

pub use change_set::{ChangeSet, ChangeSetId};
pub use config::{Config, DatabaseConfig};
pub use error::{CoreError, CoreResult};
pub use statements::split_statements;
pub use store::ChangeSetStore;
