//! Run command implementation

use anyhow::{Context, Result};

use crate::cli::{GlobalArgs, RunArgs};
use crate::commands::common::load_project;

/// Execute the run command
pub(crate) fn execute(args: &RunArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let migrator = project.migrator();
    let conn = project.connect()?;

    if args.dry_run {
        let pending = migrator
            .with_session(conn, |session| session.pending())
            .context("Failed to list pending change-sets")?;
        if pending.is_empty() {
            println!("Database is up to date");
            return Ok(());
        }
        println!("Dry run - would apply {} change-set(s):", pending.len());
        for id in &pending {
            println!("  {id}");
        }
        return Ok(());
    }

    let report = migrator
        .with_session(conn, |session| session.run())
        .context("Migration run stopped; change-sets applied before the failure remain applied")?;

    if report.is_empty() {
        println!("Database is up to date");
        return Ok(());
    }
    for id in &report.applied {
        println!("  Applied: {id}");
    }
    println!();
    println!("Applied {} change-set(s)", report.count());
    Ok(())
}

#[cfg(test)]
#[path = "run_test.rs"]
mod tests;
