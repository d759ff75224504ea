//! Rollback command implementation

use anyhow::{Context, Result};
use tm_migrate::RollbackOutcome;

use crate::cli::{GlobalArgs, RollbackArgs};
use crate::commands::common::load_project;

/// Execute the rollback command
pub(crate) fn execute(_args: &RollbackArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let migrator = project.migrator();
    let conn = project.connect()?;

    let outcome = migrator
        .with_session(conn, |session| session.rollback_last())
        .context("Rollback failed")?;

    match outcome {
        RollbackOutcome::NothingToRollBack => println!("No change-sets to roll back"),
        RollbackOutcome::RolledBack(id) => println!("Rolled back: {id}"),
    }
    Ok(())
}

#[cfg(test)]
#[path = "rollback_test.rs"]
mod tests;
