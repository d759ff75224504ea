//! Change-set store: the directory of forward and rollback scripts.

use crate::author::{forward_template, identifier_for};
use crate::change_set::{ChangeSet, ChangeSetId};
use crate::error::{CoreError, CoreResult};
use chrono::{DateTime, Utc};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Filesystem-backed set of change-set scripts.
///
/// Forward scripts are `<identifier>.sql`; the optional inverse is
/// `<identifier>_rollback.sql` in the same directory.
#[derive(Debug, Clone)]
pub struct ChangeSetStore {
    dir: PathBuf,
}

impl ChangeSetStore {
    /// Create a store rooted at `dir`. The directory is created lazily.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory backing this store.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the forward script for `id`.
    pub fn forward_path(&self, id: &ChangeSetId) -> PathBuf {
        self.dir.join(id.forward_file_name())
    }

    /// Path of the rollback script for `id`.
    pub fn rollback_path(&self, id: &ChangeSetId) -> PathBuf {
        self.dir.join(id.rollback_file_name())
    }

    /// List every forward change-set identifier, ascending.
    ///
    /// A missing directory is created and yields an empty listing. Each call
    /// re-reads the directory.
    pub fn list_all(&self) -> CoreResult<Vec<ChangeSetId>> {
        if !self.dir.exists() {
            self.ensure_dir()?;
            log::info!("Created change-set directory: {}", self.dir.display());
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.dir).map_err(|e| io_error(&self.dir, e))?;

        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| io_error(&self.dir, e))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                log::warn!("Skipping non UTF-8 file name: {}", path.display());
                continue;
            };
            if let Some(id) = ChangeSetId::from_forward_file_name(file_name) {
                ids.push(id);
            }
        }

        ids.sort();
        Ok(ids)
    }

    /// Write a new empty change-set named after `name` and return its identifier.
    pub fn create(&self, name: &str) -> CoreResult<ChangeSetId> {
        self.create_at(name, Utc::now())
    }

    /// [`create`](Self::create) with an explicit creation time.
    pub fn create_at(&self, name: &str, now: DateTime<Utc>) -> CoreResult<ChangeSetId> {
        let id = identifier_for(name, now)?;
        self.ensure_dir()?;

        let path = self.forward_path(&id);
        let mut file = match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(CoreError::ChangeSetExists {
                    path: path.display().to_string(),
                })
            }
            Err(e) => return Err(io_error(&path, e)),
        };
        file.write_all(forward_template(name, now).as_bytes())
            .map_err(|e| io_error(&path, e))?;

        log::info!("Created change-set file: {}", path.display());
        Ok(id)
    }

    /// Read the forward script for `id`.
    pub fn read_forward(&self, id: &ChangeSetId) -> CoreResult<String> {
        let path = self.forward_path(id);
        match fs::read_to_string(&path) {
            Ok(sql) => Ok(sql),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(CoreError::ChangeSetNotFound {
                identifier: id.to_string(),
                path: path.display().to_string(),
            }),
            Err(e) => Err(io_error(&path, e)),
        }
    }

    /// Read the rollback script for `id`.
    ///
    /// `Ok(None)` means no rollback was authored; this is not an error.
    pub fn read_rollback(&self, id: &ChangeSetId) -> CoreResult<Option<String>> {
        let path = self.rollback_path(id);
        match fs::read_to_string(&path) {
            Ok(sql) => Ok(Some(sql)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(&path, e)),
        }
    }

    /// Load both scripts for `id`.
    pub fn load(&self, id: &ChangeSetId) -> CoreResult<ChangeSet> {
        Ok(ChangeSet {
            id: id.clone(),
            forward_script: self.read_forward(id)?,
            rollback_script: self.read_rollback(id)?,
        })
    }

    fn ensure_dir(&self) -> CoreResult<()> {
        fs::create_dir_all(&self.dir).map_err(|e| io_error(&self.dir, e))
    }
}

fn io_error(path: &Path, source: std::io::Error) -> CoreError {
    CoreError::IoWithPath {
        path: path.display().to_string(),
        source,
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
