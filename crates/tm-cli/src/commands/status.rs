//! Status command implementation

use anyhow::{Context, Result};
use std::fmt::Write;
use tm_migrate::StatusReport;

use crate::cli::{GlobalArgs, StatusArgs, StatusOutput};
use crate::commands::common::{load_project, ExitCode};

/// Execute the status command
pub(crate) fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let migrator = project.migrator();
    let conn = project.connect()?;

    let report = migrator
        .with_session(conn, |session| session.status())
        .context("Failed to read migration status")?;

    match args.output {
        StatusOutput::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        StatusOutput::Table => {
            println!("Change-sets in {}", project.migrations_dir().display());
            print!("{}", render_table(&report));
        }
    }

    if args.fail_on_pending && !report.is_up_to_date() {
        return Err(ExitCode(1).into());
    }
    Ok(())
}

/// Human-readable listing of applied, pending, and orphaned change-sets.
pub(crate) fn render_table(report: &StatusReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Applied: {}", report.applied_count);
    for record in &report.applied {
        let _ = writeln!(
            out,
            "  {}  {}",
            record.applied_at.format("%Y-%m-%d %H:%M:%S"),
            record.identifier
        );
    }

    let _ = writeln!(out, "Pending: {}", report.pending_count);
    for id in &report.pending {
        let _ = writeln!(out, "  {id}");
    }

    if !report.orphaned.is_empty() {
        let _ = writeln!(out, "Missing scripts for applied change-sets:");
        for id in &report.orphaned {
            let _ = writeln!(out, "  {id}");
        }
    }
    out
}

#[cfg(test)]
#[path = "status_test.rs"]
mod tests;
