//! Connection trait definition

use crate::error::DbResult;

/// One result row with every column coerced to text; SQL `NULL` is `None`.
pub type Row = Vec<Option<String>>;

/// Blocking connection to the target relational store.
///
/// Each call completes before it returns, so statements run strictly in the
/// order they are issued. A connection is owned by exactly one caller.
pub trait Connection {
    /// Execute a single statement, returning affected rows
    fn execute(&self, sql: &str) -> DbResult<usize>;

    /// Execute a single statement with positional `?` parameters
    fn execute_with(&self, sql: &str, params: &[&str]) -> DbResult<usize>;

    /// Run a query with positional `?` parameters and collect every row
    fn query(&self, sql: &str, params: &[&str]) -> DbResult<Vec<Row>>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;

    /// Release the connection, surfacing any error raised while closing
    fn close(self) -> DbResult<()>
    where
        Self: Sized;
}
