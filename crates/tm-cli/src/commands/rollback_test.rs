use super::*;
use crate::cli::RunArgs;
use crate::commands::run;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn global_for(dir: &Path) -> GlobalArgs {
    GlobalArgs {
        verbose: false,
        project_dir: dir.display().to_string(),
        config: None,
        database: None,
        migrations_dir: None,
    }
}

fn write_change_set(dir: &Path, file: &str, sql: &str) {
    let migrations = dir.join("migrations");
    fs::create_dir_all(&migrations).unwrap();
    fs::write(migrations.join(file), sql).unwrap();
}

#[test]
fn test_rollback_with_empty_ledger_succeeds() {
    let temp_dir = tempdir().unwrap();
    execute(&RollbackArgs {}, &global_for(temp_dir.path())).unwrap();
}

#[test]
fn test_rollback_reverts_latest() {
    let temp_dir = tempdir().unwrap();
    write_change_set(
        temp_dir.path(),
        "20240101000000_users.sql",
        "CREATE TABLE users (id INTEGER);",
    );
    write_change_set(
        temp_dir.path(),
        "20240101000000_users_rollback.sql",
        "DROP TABLE users;",
    );
    let global = global_for(temp_dir.path());

    run::execute(&RunArgs { dry_run: false }, &global).unwrap();
    execute(&RollbackArgs {}, &global).unwrap();

    // The same change-set is pending again and re-applies cleanly.
    run::execute(&RunArgs { dry_run: false }, &global).unwrap();
}

#[test]
fn test_rollback_without_script_fails() {
    let temp_dir = tempdir().unwrap();
    write_change_set(
        temp_dir.path(),
        "20240101000000_users.sql",
        "CREATE TABLE users (id INTEGER);",
    );
    let global = global_for(temp_dir.path());

    run::execute(&RunArgs { dry_run: false }, &global).unwrap();
    let err = execute(&RollbackArgs {}, &global).unwrap_err();
    assert!(format!("{err:#}").contains("20240101000000_users_rollback.sql"));
}
