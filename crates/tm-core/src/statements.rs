//! Splitting change-set scripts into individually executed statements.
//!
//! Statements are separated by a literal `;`. The splitter does not parse
//! SQL: a semicolon inside a string literal, a quoted identifier, or a
//! procedural block body is still treated as a boundary. Scripts must not
//! rely on embedded semicolons, and that includes `;` inside a `/* */`
//! comment.

/// Statement delimiter used by the target dialect.
pub const STATEMENT_DELIMITER: char = ';';

/// Split `script` on [`STATEMENT_DELIMITER`] and return the statements to
/// execute, trimmed, in source order.
///
/// Chunks containing only whitespace, `--` line comments, and `/* */` block
/// comments are skipped, so an untouched template or a trailing delimiter
/// yields no statement.
pub fn split_statements(script: &str) -> Vec<&str> {
    script
        .split(STATEMENT_DELIMITER)
        .map(str::trim)
        .filter(|chunk| has_executable_text(chunk))
        .collect()
}

/// True when `chunk` has anything besides whitespace and comments.
/// An unterminated block comment runs to the end of the chunk.
fn has_executable_text(chunk: &str) -> bool {
    let mut rest = chunk;
    loop {
        rest = rest.trim_start();
        if let Some(after) = rest.strip_prefix("--") {
            match after.find('\n') {
                Some(end) => rest = &after[end + 1..],
                None => return false,
            }
        } else if let Some(after) = rest.strip_prefix("/*") {
            match after.find("*/") {
                Some(end) => rest = &after[end + 2..],
                None => return false,
            }
        } else {
            return !rest.is_empty();
        }
    }
}

#[cfg(test)]
#[path = "statements_test.rs"]
mod tests;
