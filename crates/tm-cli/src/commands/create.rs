//! Create command implementation

use anyhow::{Context, Result};

use crate::cli::{CreateArgs, GlobalArgs};
use crate::commands::common::load_project;

/// Execute the create command. Does not open the database.
pub(crate) fn execute(args: &CreateArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let migrator = project.migrator();

    let id = migrator
        .create(&args.name)
        .with_context(|| format!("Failed to create change-set '{}'", args.name))?;

    println!("Created: {}", migrator.store().forward_path(&id).display());
    println!(
        "To make it reversible, add {}",
        migrator.store().rollback_path(&id).display()
    );
    Ok(())
}

#[cfg(test)]
#[path = "create_test.rs"]
mod tests;
