//! Change-set identifier and loaded change-set types.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

/// File extension recognised for change-set scripts.
pub const SCRIPT_EXTENSION: &str = "sql";

/// Suffix appended to a change-set stem to name its rollback script.
pub const ROLLBACK_SUFFIX: &str = "_rollback";

/// Strongly-typed wrapper for change-set identifiers.
///
/// An identifier is the file stem of the forward script, normally
/// `<14-digit UTC timestamp>_<slug>`. Ordering is plain lexicographic
/// ordering of the underlying string, which is chronological for
/// timestamp-prefixed identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeSetId(String);

impl ChangeSetId {
    /// Create a new `ChangeSetId`, panicking in debug builds if the identifier is empty.
    ///
    /// Prefer [`try_new`](Self::try_new) when handling untrusted input.
    pub fn new(id: impl Into<String>) -> Self {
        let s = id.into();
        debug_assert!(!s.is_empty(), "ChangeSetId must not be empty");
        Self(s)
    }

    /// Try to create a new `ChangeSetId`, returning `None` if the identifier is empty.
    pub fn try_new(id: impl Into<String>) -> Option<Self> {
        let s = id.into();
        if s.is_empty() {
            None
        } else {
            Some(Self(s))
        }
    }

    /// Derive the identifier from a forward script file name.
    ///
    /// Returns `None` for rollback scripts, files with another extension,
    /// and names with an empty stem.
    pub fn from_forward_file_name(file_name: &str) -> Option<Self> {
        let stem = file_name
            .strip_suffix(SCRIPT_EXTENSION)?
            .strip_suffix('.')?;
        if stem.ends_with(ROLLBACK_SUFFIX) {
            return None;
        }
        Self::try_new(stem)
    }

    /// File name of the forward script, e.g. `20240101000000_init.sql`.
    pub fn forward_file_name(&self) -> String {
        format!("{}.{SCRIPT_EXTENSION}", self.0)
    }

    /// File name of the rollback script, e.g. `20240101000000_init_rollback.sql`.
    pub fn rollback_file_name(&self) -> String {
        format!("{}{ROLLBACK_SUFFIX}.{SCRIPT_EXTENSION}", self.0)
    }

    /// Return the underlying identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the inner `String`.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ChangeSetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ChangeSetId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for ChangeSetId {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ChangeSetId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for ChangeSetId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ChangeSetId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A change-set loaded from the store.
///
/// `rollback_script` is `None` when no rollback file exists, which is
/// distinct from an empty rollback file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSet {
    pub id: ChangeSetId,
    pub forward_script: String,
    pub rollback_script: Option<String>,
}

impl ChangeSet {
    /// Whether an inverse script was authored for this change-set.
    pub fn has_rollback(&self) -> bool {
        self.rollback_script.is_some()
    }
}

#[cfg(test)]
#[path = "change_set_test.rs"]
mod tests;
