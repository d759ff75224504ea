//! Ledger table access.
//!
//! The ledger is the single table recording which change-sets have been
//! applied and when. Raw rows are mapped to [`LedgerRecord`] here and never
//! leave this module untyped.

use crate::error::{MigrateError, MigrateResult};
use chrono::NaiveDateTime;
use serde::Serialize;
use tm_core::ChangeSetId;
use tm_db::{Connection, DbError, Row};

/// Text format the ledger selects `applied_at` in (microsecond precision).
const APPLIED_AT_SQL_FORMAT: &str = "%Y-%m-%d %H:%M:%S.%f";

/// Matching `chrono` parse format for [`APPLIED_AT_SQL_FORMAT`].
const APPLIED_AT_PARSE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Proof that a change-set was fully applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerRecord {
    pub identifier: ChangeSetId,
    pub applied_at: NaiveDateTime,
}

/// Handle on the ledger table. Holds no connection; every operation takes
/// the caller's connection explicitly.
#[derive(Debug, Clone)]
pub struct Ledger {
    table: String,
}

impl Ledger {
    /// Create a ledger handle for `table`.
    ///
    /// The name is interpolated into SQL, so it must already be validated
    /// (see `tm_core::config::is_valid_table_name`).
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
        }
    }

    /// Ledger table name.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Create the ledger table and its index if absent. Safe on every start.
    ///
    /// The index is created without `IF NOT EXISTS`; an "already exists"
    /// failure there is the only tolerated setup error.
    pub fn ensure_schema(&self, conn: &dyn Connection) -> MigrateResult<()> {
        let table = &self.table;
        conn.execute(&format!("CREATE SEQUENCE IF NOT EXISTS {table}_id_seq"))
            .map_err(MigrateError::Connection)?;
        conn.execute(&format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                 id         BIGINT PRIMARY KEY DEFAULT nextval('{table}_id_seq'),
                 identifier VARCHAR NOT NULL UNIQUE,
                 applied_at TIMESTAMP NOT NULL DEFAULT now()
             )"
        ))
        .map_err(MigrateError::Connection)?;

        match conn.execute(&format!(
            "CREATE INDEX idx_{table}_applied_at ON {table} (applied_at)"
        )) {
            Ok(_) => {}
            Err(e) if e.is_already_exists() => {
                log::debug!("Ledger index already present: {e}");
            }
            Err(e) => return Err(MigrateError::Connection(e)),
        }
        Ok(())
    }

    /// Every ledger record, ordered by `applied_at` then identifier.
    pub fn list_applied(&self, conn: &dyn Connection) -> MigrateResult<Vec<LedgerRecord>> {
        let rows = conn
            .query(
                &format!(
                    "SELECT identifier, strftime(applied_at, '{APPLIED_AT_SQL_FORMAT}')
                     FROM {}
                     ORDER BY applied_at ASC, identifier ASC",
                    self.table
                ),
                &[],
            )
            .map_err(MigrateError::Ledger)?;
        rows.into_iter().map(record_from_row).collect()
    }

    /// Insert the record for `id`, stamped with the current time.
    ///
    /// Fails with [`MigrateError::Conflict`] when `id` is already recorded.
    pub fn record_applied(&self, conn: &dyn Connection, id: &ChangeSetId) -> MigrateResult<()> {
        conn.execute_with(
            &format!("INSERT INTO {} (identifier) VALUES (?)", self.table),
            &[id.as_str()],
        )
        .map_err(|e| match e {
            DbError::ConstraintViolation(_) => MigrateError::Conflict {
                identifier: id.clone(),
                source: e,
            },
            other => MigrateError::Ledger(other),
        })?;
        Ok(())
    }

    /// Delete the record for `id`.
    ///
    /// Fails with [`MigrateError::NotFound`] when no record exists.
    pub fn remove_record(&self, conn: &dyn Connection, id: &ChangeSetId) -> MigrateResult<()> {
        let removed = conn
            .execute_with(
                &format!("DELETE FROM {} WHERE identifier = ?", self.table),
                &[id.as_str()],
            )
            .map_err(MigrateError::Ledger)?;
        if removed == 0 {
            return Err(MigrateError::NotFound {
                identifier: id.clone(),
            });
        }
        Ok(())
    }

    /// The record with the greatest `applied_at` (ties: greatest identifier),
    /// or `None` for an empty ledger.
    pub fn most_recently_applied(
        &self,
        conn: &dyn Connection,
    ) -> MigrateResult<Option<LedgerRecord>> {
        let rows = conn
            .query(
                &format!(
                    "SELECT identifier, strftime(applied_at, '{APPLIED_AT_SQL_FORMAT}')
                     FROM {}
                     ORDER BY applied_at DESC, identifier DESC
                     LIMIT 1",
                    self.table
                ),
                &[],
            )
            .map_err(MigrateError::Ledger)?;
        rows.into_iter().next().map(record_from_row).transpose()
    }
}

fn record_from_row(row: Row) -> MigrateResult<LedgerRecord> {
    let mut cols = row.into_iter();
    let identifier = cols
        .next()
        .flatten()
        .and_then(ChangeSetId::try_new)
        .ok_or_else(|| MigrateError::InvalidRecord("missing identifier".to_string()))?;
    let applied_at_text = cols.next().flatten().ok_or_else(|| {
        MigrateError::InvalidRecord(format!("missing applied_at for {identifier}"))
    })?;
    let applied_at = NaiveDateTime::parse_from_str(&applied_at_text, APPLIED_AT_PARSE_FORMAT)
        .map_err(|e| {
            MigrateError::InvalidRecord(format!(
                "bad applied_at '{applied_at_text}' for {identifier}: {e}"
            ))
        })?;
    Ok(LedgerRecord {
        identifier,
        applied_at,
    })
}

#[cfg(test)]
#[path = "ledger_test.rs"]
mod tests;
