//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use tm_core::Config;
use tm_db::DuckDbConnection;
use tm_migrate::Migrator;

use crate::cli::GlobalArgs;

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that RAII destructors run and the connection is released.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Control flow only; main exits silently with the code.
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// A resolved project: its root directory and effective configuration.
#[derive(Debug, Clone)]
pub(crate) struct Project {
    pub(crate) root: PathBuf,
    pub(crate) config: Config,
}

impl Project {
    /// Runner over this project's change-set store and ledger table.
    pub(crate) fn migrator(&self) -> Migrator {
        Migrator::from_config(&self.config, &self.root)
    }

    /// Absolute change-set directory.
    pub(crate) fn migrations_dir(&self) -> PathBuf {
        self.config.migrations_dir_absolute(&self.root)
    }

    /// Open the configured DuckDB database.
    pub(crate) fn connect(&self) -> Result<DuckDbConnection> {
        let path = self.config.database_path_absolute(&self.root);
        log::debug!("Opening database {path}");
        DuckDbConnection::new(&path).with_context(|| format!("Failed to open database {path}"))
    }
}

/// Load the project config, apply CLI overrides, and validate the result.
///
/// An explicit `--config` (relative to the working directory) must exist.
/// Otherwise `tidemark.yml` in the project directory is optional and
/// defaults apply when it is absent.
pub(crate) fn load_project(global: &GlobalArgs) -> Result<Project> {
    let root = PathBuf::from(&global.project_dir);

    let mut config = match &global.config {
        Some(path) => Config::load(Path::new(path)),
        None => Config::load_from_dir_or_default(&root),
    }
    .context("Failed to load project configuration")?;

    if let Some(database) = &global.database {
        config.database.path = database.clone();
    }
    if let Some(dir) = &global.migrations_dir {
        config.migrations_dir = dir.clone();
    }
    config.validate().context("Invalid configuration")?;

    Ok(Project { root, config })
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
