//! Migration runner.
//!
//! [`Migrator`] is the disconnected runner: it knows the change-set store and
//! the ledger table and can author new change-sets offline. [`Migrator::connect`]
//! takes ownership of one connection, prepares the ledger, and returns a
//! [`Session`] through which change-sets are applied, rolled back, and
//! reported. [`Session::disconnect`] releases the connection;
//! [`Migrator::with_session`] pairs the two on every exit path.
//!
//! Each change-set is its own unit of atomicity. A failure stops the run at
//! that change-set; earlier change-sets from the same run stay applied.

use crate::error::{MigrateError, MigrateResult};
use crate::ledger::{Ledger, LedgerRecord};
use crate::report::{RollbackOutcome, RunReport, StatusReport};
use std::collections::HashSet;
use std::path::Path;
use tm_core::{split_statements, ChangeSetId, ChangeSetStore, Config};
use tm_db::{Connection, DbError};

/// Disconnected migration runner.
#[derive(Debug, Clone)]
pub struct Migrator {
    store: ChangeSetStore,
    ledger: Ledger,
    transactional: bool,
}

impl Migrator {
    /// Create a runner over `store` recording into `ledger`.
    pub fn new(store: ChangeSetStore, ledger: Ledger) -> Self {
        Self {
            store,
            ledger,
            transactional: false,
        }
    }

    /// Build a runner from a validated config, resolving paths against `root`.
    pub fn from_config(config: &Config, root: &Path) -> Self {
        Self::new(
            ChangeSetStore::new(config.migrations_dir_absolute(root)),
            Ledger::new(config.ledger_table.clone()),
        )
        .with_transactional(config.transactional)
    }

    /// Wrap each change-set and its ledger write in `BEGIN`/`COMMIT`.
    pub fn with_transactional(mut self, enabled: bool) -> Self {
        self.transactional = enabled;
        self
    }

    pub fn store(&self) -> &ChangeSetStore {
        &self.store
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Author a new empty change-set. Needs no connection.
    pub fn create(&self, name: &str) -> MigrateResult<ChangeSetId> {
        Ok(self.store.create(name)?)
    }

    /// Take ownership of `conn` and make sure the ledger table exists.
    ///
    /// On failure the connection is closed before the error is returned.
    pub fn connect<C: Connection>(&self, conn: C) -> MigrateResult<Session<'_, C>> {
        log::debug!("Connected to {} database", conn.db_type());
        if let Err(e) = self.ledger.ensure_schema(&conn) {
            if let Err(close_err) = conn.close() {
                log::warn!("Failed to close connection after setup error: {close_err}");
            }
            return Err(e);
        }
        Ok(Session {
            migrator: self,
            conn,
        })
    }

    /// Connect, run `body`, and disconnect whether or not `body` succeeded.
    ///
    /// An error from `body` takes precedence over an error while closing.
    pub fn with_session<C, T, F>(&self, conn: C, body: F) -> MigrateResult<T>
    where
        C: Connection,
        F: FnOnce(&mut Session<'_, C>) -> MigrateResult<T>,
    {
        let mut session = self.connect(conn)?;
        let result = body(&mut session);
        let closed = session.disconnect();
        match (result, closed) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(close_err)) => Err(close_err),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(close_err)) => {
                log::warn!("Failed to close connection after error: {close_err}");
                Err(e)
            }
        }
    }
}

/// Connected runner owning exactly one connection.
pub struct Session<'m, C: Connection> {
    migrator: &'m Migrator,
    conn: C,
}

impl<'m, C: Connection> Session<'m, C> {
    /// Borrow the underlying connection.
    pub fn conn(&self) -> &C {
        &self.conn
    }

    /// Stored change-sets absent from the ledger, ascending by identifier.
    pub fn pending(&self) -> MigrateResult<Vec<ChangeSetId>> {
        let applied = self.migrator.ledger.list_applied(&self.conn)?;
        let all = self.migrator.store.list_all()?;
        Ok(pending_from(&applied, all))
    }

    /// Apply every pending change-set in identifier order.
    ///
    /// Stops at the first failing statement with [`MigrateError::Migration`];
    /// that change-set is not recorded and later ones are not attempted.
    pub fn run(&mut self) -> MigrateResult<RunReport> {
        let pending = self.pending()?;
        if pending.is_empty() {
            log::info!("No pending change-sets");
            return Ok(RunReport::default());
        }
        log::info!("Found {} pending change-set(s)", pending.len());

        let mut report = RunReport::default();
        for id in pending {
            let script = self.migrator.store.read_forward(&id)?;
            log::info!("Applying {id}");
            self.in_unit(
                |source| MigrateError::Migration {
                    identifier: id.clone(),
                    source,
                },
                |conn| {
                    execute_script(conn, &script).map_err(|source| MigrateError::Migration {
                        identifier: id.clone(),
                        source,
                    })?;
                    self.migrator.ledger.record_applied(conn, &id)
                },
            )?;
            log::info!("Applied {id}");
            report.applied.push(id);
        }
        Ok(report)
    }

    /// Report applied, pending, and orphaned change-sets. Read-only.
    pub fn status(&self) -> MigrateResult<StatusReport> {
        let applied = self.migrator.ledger.list_applied(&self.conn)?;
        let all = self.migrator.store.list_all()?;

        let known: HashSet<&str> = all.iter().map(|id| id.as_str()).collect();
        let orphaned: Vec<ChangeSetId> = applied
            .iter()
            .filter(|r| !known.contains(r.identifier.as_str()))
            .map(|r| r.identifier.clone())
            .collect();
        for id in &orphaned {
            log::warn!("Ledger references {id} but its script is missing from the store");
        }

        let pending = pending_from(&applied, all);
        Ok(StatusReport::new(applied, pending, orphaned))
    }

    /// Revert the most recently applied change-set using its rollback script.
    ///
    /// An empty ledger is a no-op. Without a rollback script this fails with
    /// [`MigrateError::MissingRollback`]. If a rollback statement fails the
    /// ledger record is kept, since the schema is now in an unknown state.
    pub fn rollback_last(&mut self) -> MigrateResult<RollbackOutcome> {
        let Some(LedgerRecord { identifier: id, .. }) =
            self.migrator.ledger.most_recently_applied(&self.conn)?
        else {
            log::info!("No change-sets to roll back");
            return Ok(RollbackOutcome::NothingToRollBack);
        };

        let Some(script) = self.migrator.store.read_rollback(&id)? else {
            return Err(MigrateError::MissingRollback {
                file_name: id.rollback_file_name(),
                identifier: id,
            });
        };

        log::info!("Rolling back {id}");
        self.in_unit(
            |source| MigrateError::Rollback {
                identifier: id.clone(),
                source,
            },
            |conn| {
                execute_script(conn, &script).map_err(|source| MigrateError::Rollback {
                    identifier: id.clone(),
                    source,
                })?;
                self.migrator.ledger.remove_record(conn, &id)
            },
        )?;
        log::info!("Rolled back {id}");
        Ok(RollbackOutcome::RolledBack(id))
    }

    /// Release the connection.
    pub fn disconnect(self) -> MigrateResult<()> {
        self.conn.close().map_err(MigrateError::Connection)?;
        log::debug!("Disconnected");
        Ok(())
    }

    /// Run `body` as one change-set unit, inside a transaction when the
    /// migrator is transactional. `tx_error` maps BEGIN/COMMIT failures.
    fn in_unit<T>(
        &self,
        tx_error: impl Fn(DbError) -> MigrateError,
        body: impl FnOnce(&dyn Connection) -> MigrateResult<T>,
    ) -> MigrateResult<T> {
        if !self.migrator.transactional {
            return body(&self.conn);
        }

        self.conn.execute("BEGIN TRANSACTION").map_err(&tx_error)?;
        let result = body(&self.conn);
        match &result {
            Ok(_) => {
                if let Err(commit_err) = self.conn.execute("COMMIT") {
                    if let Err(e) = self.conn.execute("ROLLBACK") {
                        log::warn!("ROLLBACK after failed COMMIT failed: {e}");
                    }
                    return Err(tx_error(commit_err));
                }
            }
            Err(_) => {
                if let Err(e) = self.conn.execute("ROLLBACK") {
                    log::warn!("ROLLBACK failed: {e}");
                }
            }
        }
        result
    }
}

/// Execute each statement of `script` in order, stopping at the first error.
fn execute_script(conn: &dyn Connection, script: &str) -> Result<(), DbError> {
    let statements = split_statements(script);
    let total = statements.len();
    for (i, stmt) in statements.into_iter().enumerate() {
        log::debug!(
            "  [{}/{total}] {}",
            i + 1,
            stmt.lines().find(|l| !l.trim_start().starts_with("--")).unwrap_or(stmt)
        );
        conn.execute(stmt)?;
    }
    Ok(())
}

fn pending_from(applied: &[LedgerRecord], all: Vec<ChangeSetId>) -> Vec<ChangeSetId> {
    let applied: HashSet<&str> = applied.iter().map(|r| r.identifier.as_str()).collect();
    all.into_iter()
        .filter(|id| !applied.contains(id.as_str()))
        .collect()
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
