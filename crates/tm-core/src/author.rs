//! Script authoring: identifier derivation and the empty forward template.
//!
//! Nothing here needs a database, so `tide create` works fully offline.

use crate::change_set::{ChangeSetId, ROLLBACK_SUFFIX};
use crate::error::{CoreError, CoreResult};
use crate::statements::STATEMENT_DELIMITER;
use chrono::{DateTime, Utc};

/// `strftime` pattern for the sortable identifier prefix (14 digits, UTC).
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Lower-case `name` and collapse every run of non-alphanumeric characters
/// (whitespace included) into a single underscore. Leading and trailing
/// separators are dropped. Letters outside ASCII are kept.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_sep = false;
    for c in name.chars() {
        if c.is_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('_');
            }
            pending_sep = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_sep = true;
        }
    }
    slug
}

/// Build the identifier for a new change-set created at `now`.
pub fn identifier_for(name: &str, now: DateTime<Utc>) -> CoreResult<ChangeSetId> {
    let slug = slugify(name);
    if slug.is_empty() {
        return Err(CoreError::InvalidName {
            name: name.to_string(),
        });
    }

    let id = format!("{}_{slug}", now.format(TIMESTAMP_FORMAT));
    if id.ends_with(ROLLBACK_SUFFIX) {
        return Err(CoreError::ReservedName {
            name: name.to_string(),
        });
    }
    Ok(ChangeSetId::new(id))
}

/// Forward-script template written by `create`.
///
/// Comments only, and no statement delimiter, so applying an untouched
/// template executes nothing. Delimiters in `name` are blanked out of the
/// header.
pub fn forward_template(name: &str, now: DateTime<Utc>) -> String {
    let name = name
        .lines()
        .next()
        .unwrap_or_default()
        .replace(STATEMENT_DELIMITER, " ");
    let name = name.trim();
    format!(
        "-- Change-set: {name}\n\
         -- Created: {created}\n\
         --\n\
         -- Add SQL statements below, each terminated by a semicolon.\n\
         -- Example:\n\
         --   ALTER TABLE users ADD COLUMN nickname VARCHAR\n\
         --\n\
         -- To make this change-set reversible, add a sibling file named\n\
         -- <this file's stem>{ROLLBACK_SUFFIX}.sql with the inverse statements.\n",
        created = now.to_rfc3339(),
    )
}

#[cfg(test)]
#[path = "author_test.rs"]
mod tests;
