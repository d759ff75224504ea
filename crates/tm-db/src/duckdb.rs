//! DuckDB connection implementation

use crate::error::{DbError, DbResult};
use crate::traits::{Connection, Row};
use duckdb::params_from_iter;
use std::path::Path;

/// Path value selecting an in-memory database
const MEMORY_PATH: &str = ":memory:";

/// Exclusively owned DuckDB connection
pub struct DuckDbConnection {
    conn: duckdb::Connection,
}

impl DuckDbConnection {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn = duckdb::Connection::open_in_memory()
            .map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Open (or create) a DuckDB database file
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = duckdb::Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))?;
        Ok(Self { conn })
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == MEMORY_PATH {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }
}

impl Connection for DuckDbConnection {
    fn execute(&self, sql: &str) -> DbResult<usize> {
        self.execute_with(sql, &[])
    }

    fn execute_with(&self, sql: &str, params: &[&str]) -> DbResult<usize> {
        log::trace!("duckdb execute: {sql}");
        Ok(self.conn.execute(sql, params_from_iter(params.iter()))?)
    }

    fn query(&self, sql: &str, params: &[&str]) -> DbResult<Vec<Row>> {
        log::trace!("duckdb query: {sql}");
        let mut stmt = self.conn.prepare(sql)?;

        // DuckDB panics on `stmt.column_count()` before execution, so read
        // the column count from each row instead.
        let rows = stmt
            .query_map(params_from_iter(params.iter()), |row| {
                let col_count = row.as_ref().column_count();
                Ok((0..col_count)
                    .map(|i| column_as_text(row, i))
                    .collect::<Row>())
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }

    fn close(self) -> DbResult<()> {
        self.conn
            .close()
            .map_err(|(_, e)| DbError::ConnectionError(format!("close failed: {e}")))
    }
}

/// Read a column value as text, trying multiple DuckDB types.
///
/// DuckDB integer columns do not convert to `String`, so we try
/// String -> i64 -> f64 -> bool and fall back to `None` for NULL.
fn column_as_text(row: &duckdb::Row<'_>, idx: usize) -> Option<String> {
    if let Ok(Some(s)) = row.get::<_, Option<String>>(idx) {
        return Some(s);
    }
    if let Ok(Some(n)) = row.get::<_, Option<i64>>(idx) {
        return Some(n.to_string());
    }
    if let Ok(Some(f)) = row.get::<_, Option<f64>>(idx) {
        return Some(f.to_string());
    }
    if let Ok(Some(b)) = row.get::<_, Option<bool>>(idx) {
        return Some(b.to_string());
    }
    None
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
