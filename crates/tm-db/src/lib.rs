//! tm-db - Database abstraction layer for Tidemark
//!
//! This crate provides the blocking `Connection` trait the migration runner
//! executes against, and its DuckDB implementation.

pub mod duckdb;
pub mod error;
pub mod traits;

pub use duckdb::DuckDbConnection;
pub use error::{DbError, DbResult};
pub use traits::{Connection, Row};
