//! End-to-end behaviour of the runner against a file-backed DuckDB database.
//!
//! Each test builds a throwaway project directory holding a `migrations/`
//! folder and a `tidemark.duckdb` file, then drives the public runner API
//! across one or more sessions.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tm_core::{ChangeSetId, ChangeSetStore};
use tm_db::{Connection, DuckDbConnection};
use tm_migrate::{Ledger, MigrateError, Migrator, RollbackOutcome};

// ── Helpers ────────────────────────────────────────────────────────────

struct Project {
    dir: TempDir,
}

impl Project {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("migrations")).unwrap();
        Self { dir }
    }

    fn migrations(&self) -> PathBuf {
        self.dir.path().join("migrations")
    }

    fn db_path(&self) -> PathBuf {
        self.dir.path().join("tidemark.duckdb")
    }

    fn write(&self, file: &str, sql: &str) {
        fs::write(self.migrations().join(file), sql).unwrap();
    }

    fn migrator(&self) -> Migrator {
        Migrator::new(
            ChangeSetStore::new(self.migrations()),
            Ledger::new("tidemark_ledger"),
        )
    }

    fn connection(&self) -> DuckDbConnection {
        DuckDbConnection::from_path(&self.db_path()).unwrap()
    }

    fn applied(&self) -> Vec<String> {
        self.migrator()
            .with_session(self.connection(), |session| session.status())
            .unwrap()
            .applied_identifiers()
            .into_iter()
            .map(|id| id.to_string())
            .collect()
    }

    fn table_exists(&self, name: &str) -> bool {
        let conn = self.connection();
        let rows = conn
            .query(
                "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = ?",
                &[name],
            )
            .unwrap();
        rows[0][0].as_deref() == Some("1")
    }
}

fn three_tables(project: &Project) {
    project.write("20240101000000_a.sql", "CREATE TABLE a (id INTEGER);");
    project.write("20240101000000_a_rollback.sql", "DROP TABLE a;");
    project.write("20240102000000_b.sql", "CREATE TABLE b (id INTEGER);");
    project.write("20240102000000_b_rollback.sql", "DROP TABLE b;");
    project.write("20240103000000_c.sql", "CREATE TABLE c (id INTEGER);");
    project.write("20240103000000_c_rollback.sql", "DROP TABLE c;");
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

// ── Run ────────────────────────────────────────────────────────────────

#[test]
fn second_run_applies_nothing() {
    let project = Project::new();
    three_tables(&project);
    let migrator = project.migrator();

    let first = migrator
        .with_session(project.connection(), |session| session.run())
        .unwrap();
    assert_eq!(first.count(), 3);

    let second = migrator
        .with_session(project.connection(), |session| session.run())
        .unwrap();
    assert!(second.is_empty());
    assert_eq!(project.applied().len(), 3);
}

#[test]
fn run_applies_in_identifier_order_regardless_of_creation_order() {
    let project = Project::new();
    // Each script depends on the previous one, so any other order fails.
    project.write(
        "20240103000000_c.sql",
        "INSERT INTO steps SELECT max(n) + 1 FROM steps;",
    );
    project.write(
        "20240101000000_a.sql",
        "CREATE TABLE steps (n INTEGER);\nINSERT INTO steps VALUES (1);",
    );
    project.write(
        "20240102000000_b.sql",
        "INSERT INTO steps SELECT max(n) + 1 FROM steps;",
    );

    let report = project
        .migrator()
        .with_session(project.connection(), |session| session.run())
        .unwrap();
    let applied: Vec<&str> = report.applied.iter().map(|id| id.as_str()).collect();
    assert_eq!(
        applied,
        vec!["20240101000000_a", "20240102000000_b", "20240103000000_c"]
    );
    assert_eq!(
        project.applied(),
        vec!["20240101000000_a", "20240102000000_b", "20240103000000_c"]
    );

    let rows = project
        .connection()
        .query("SELECT max(n) FROM steps", &[])
        .unwrap();
    assert_eq!(rows[0][0].as_deref(), Some("3"));
}

#[test]
fn failure_stops_run_and_keeps_earlier_change_sets() {
    let project = Project::new();
    project.write("20240101000000_a.sql", "CREATE TABLE a (id INTEGER);");
    project.write(
        "20240102000000_b.sql",
        "CREATE TABLE b (id INTEGER);\nINSERT INTO missing_table VALUES (1);",
    );
    project.write("20240103000000_c.sql", "CREATE TABLE c (id INTEGER);");

    let err = project
        .migrator()
        .with_session(project.connection(), |session| session.run())
        .unwrap_err();

    assert!(matches!(err, MigrateError::Migration { .. }), "got {err}");
    assert_eq!(
        err.change_set().map(|id| id.as_str()),
        Some("20240102000000_b")
    );
    assert!(err.to_string().contains("20240102000000_b"));
    assert_eq!(project.applied(), vec!["20240101000000_a"]);
    assert!(project.table_exists("a"));
    assert!(!project.table_exists("c"));
}

#[test]
fn fixed_script_resumes_from_failed_change_set() {
    let project = Project::new();
    project.write("20240101000000_a.sql", "CREATE TABLE a (id INTEGER);");
    project.write("20240102000000_b.sql", "CREATE TABLE b (id INTEGER;");
    let migrator = project.migrator();

    migrator
        .with_session(project.connection(), |session| session.run())
        .unwrap_err();

    project.write("20240102000000_b.sql", "CREATE TABLE b (id INTEGER);");
    let report = migrator
        .with_session(project.connection(), |session| session.run())
        .unwrap();
    assert_eq!(report.applied, vec![ChangeSetId::new("20240102000000_b")]);
}

// ── Rollback ───────────────────────────────────────────────────────────

#[test]
fn rollback_removes_only_the_latest_record() {
    let project = Project::new();
    three_tables(&project);
    let migrator = project.migrator();

    let outcome = migrator
        .with_session(project.connection(), |session| {
            session.run()?;
            session.rollback_last()
        })
        .unwrap();

    assert_eq!(
        outcome,
        RollbackOutcome::RolledBack(ChangeSetId::new("20240103000000_c"))
    );
    assert_eq!(
        project.applied(),
        vec!["20240101000000_a", "20240102000000_b"]
    );
    assert!(project.table_exists("b"));
    assert!(!project.table_exists("c"));
}

#[test]
fn rolled_back_change_set_becomes_pending_again() {
    let project = Project::new();
    three_tables(&project);
    let migrator = project.migrator();

    migrator
        .with_session(project.connection(), |session| {
            session.run()?;
            session.rollback_last()
        })
        .unwrap();

    let status = migrator
        .with_session(project.connection(), |session| session.status())
        .unwrap();
    assert_eq!(status.pending, vec![ChangeSetId::new("20240103000000_c")]);

    let report = migrator
        .with_session(project.connection(), |session| session.run())
        .unwrap();
    assert_eq!(report.applied, vec![ChangeSetId::new("20240103000000_c")]);
}

#[test]
fn missing_rollback_script_leaves_ledger_unchanged() {
    let project = Project::new();
    project.write("20240101000000_a.sql", "CREATE TABLE a (id INTEGER);");
    project.write("20240102000000_b.sql", "CREATE TABLE b (id INTEGER);");
    let migrator = project.migrator();

    migrator
        .with_session(project.connection(), |session| session.run())
        .unwrap();
    let before = project.applied();

    let err = migrator
        .with_session(project.connection(), |session| session.rollback_last())
        .unwrap_err();

    match &err {
        MigrateError::MissingRollback {
            identifier,
            file_name,
        } => {
            assert_eq!(identifier, "20240102000000_b");
            assert_eq!(file_name, "20240102000000_b_rollback.sql");
        }
        other => panic!("expected MissingRollback, got {other}"),
    }
    assert_eq!(project.applied(), before);
    assert!(project.table_exists("b"));
}

// ── Status ─────────────────────────────────────────────────────────────

#[test]
fn status_counts_applied_and_pending() {
    let project = Project::new();
    project.write("20240101000000_a.sql", "CREATE TABLE a (id INTEGER);");
    project.write("20240102000000_b.sql", "CREATE TABLE b (id INTEGER);");
    let migrator = project.migrator();

    migrator
        .with_session(project.connection(), |session| session.run())
        .unwrap();
    project.write("20240103000000_c.sql", "CREATE TABLE c (id INTEGER);");

    let status = migrator
        .with_session(project.connection(), |session| session.status())
        .unwrap();
    assert_eq!(status.applied_count, 2);
    assert_eq!(status.pending_count, 1);
    assert_eq!(status.pending, vec![ChangeSetId::new("20240103000000_c")]);
    assert!(status.orphaned.is_empty());
    assert!(!status.is_up_to_date());
}

#[test]
fn status_serializes_to_json() {
    let project = Project::new();
    project.write("20240101000000_a.sql", "CREATE TABLE a (id INTEGER);");
    project.write("20240102000000_b.sql", "CREATE TABLE b (id INTEGER);");
    let migrator = project.migrator();

    let status = migrator
        .with_session(project.connection(), |session| status_after_one(session))
        .unwrap();
    let json = serde_json::to_value(&status).unwrap();
    assert_eq!(json["applied_count"], 1);
    assert_eq!(json["pending_count"], 1);
    assert_eq!(json["applied"][0]["identifier"], "20240101000000_a");
    assert!(json["applied"][0]["applied_at"].is_string());
    assert_eq!(json["pending"][0], "20240102000000_b");
}

fn status_after_one(
    session: &mut tm_migrate::Session<'_, DuckDbConnection>,
) -> tm_migrate::MigrateResult<tm_migrate::StatusReport> {
    // Record the first change-set by hand to get a mixed state in one session.
    session
        .conn()
        .execute("CREATE TABLE a (id INTEGER)")
        .map_err(MigrateError::Ledger)?;
    Ledger::new("tidemark_ledger").record_applied(
        session.conn(),
        &ChangeSetId::new("20240101000000_a"),
    )?;
    session.status()
}

// ── Create ─────────────────────────────────────────────────────────────

#[test]
fn create_names_file_from_timestamp_and_slug() {
    let project = Project::new();
    let id = project.migrator().create("Add user preferences").unwrap();

    let (timestamp, slug) = id.as_str().split_once('_').unwrap();
    assert_eq!(timestamp.len(), 14);
    assert!(timestamp.chars().all(|c| c.is_ascii_digit()));
    assert_eq!(slug, "add_user_preferences");

    let file = format!("{timestamp}_add_user_preferences.sql");
    assert_eq!(file_names(&project.migrations()), vec![file.clone()]);

    let contents = fs::read_to_string(project.migrations().join(&file)).unwrap();
    assert!(tm_core::split_statements(&contents).is_empty());
}

#[test]
fn created_change_set_is_pending_and_applies_cleanly() {
    let project = Project::new();
    let migrator = project.migrator();
    let id = migrator.create("Add user preferences").unwrap();

    let report = migrator
        .with_session(project.connection(), |session| {
            assert_eq!(session.pending()?, vec![id.clone()]);
            session.run()
        })
        .unwrap();
    assert_eq!(report.applied, vec![id]);
}
