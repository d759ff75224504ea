use super::*;
use chrono::TimeZone;
use std::fs;
use tempfile::tempdir;

fn at(secs: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, secs).unwrap()
}

#[test]
fn test_missing_directory_is_created_empty() {
    let temp = tempdir().unwrap();
    let dir = temp.path().join("migrations");
    let store = ChangeSetStore::new(&dir);

    assert!(store.list_all().unwrap().is_empty());
    assert!(dir.is_dir());
}

#[test]
fn test_list_all_sorts_and_filters() {
    let temp = tempdir().unwrap();
    let dir = temp.path();
    for name in [
        "20240103000000_c.sql",
        "20240101000000_a.sql",
        "20240101000000_a_rollback.sql",
        "20240102000000_b.sql",
        "notes.txt",
    ] {
        fs::write(dir.join(name), "SELECT 1;").unwrap();
    }
    fs::create_dir(dir.join("20240104000000_dir.sql")).unwrap();

    let store = ChangeSetStore::new(dir);
    let ids = store.list_all().unwrap();
    let names: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
    assert_eq!(
        names,
        vec!["20240101000000_a", "20240102000000_b", "20240103000000_c"]
    );
}

#[test]
fn test_list_all_is_restartable() {
    let temp = tempdir().unwrap();
    let store = ChangeSetStore::new(temp.path());
    store.create_at("first", at(1)).unwrap();
    assert_eq!(store.list_all().unwrap().len(), 1);

    store.create_at("second", at(2)).unwrap();
    assert_eq!(store.list_all().unwrap().len(), 2);
}

#[test]
fn test_create_writes_template() {
    let temp = tempdir().unwrap();
    let dir = temp.path().join("nested").join("migrations");
    let store = ChangeSetStore::new(&dir);

    let id = store.create_at("Add user preferences", at(0)).unwrap();
    assert_eq!(id, "20240101000000_add_user_preferences");

    let path = dir.join("20240101000000_add_user_preferences.sql");
    assert!(path.is_file());
    let content = fs::read_to_string(path).unwrap();
    assert!(content.starts_with("-- Change-set: Add user preferences"));
    assert!(crate::split_statements(&content).is_empty());
}

#[test]
fn test_create_refuses_to_overwrite() {
    let temp = tempdir().unwrap();
    let store = ChangeSetStore::new(temp.path());
    store.create_at("dup", at(5)).unwrap();

    let err = store.create_at("dup", at(5)).unwrap_err();
    assert!(matches!(err, CoreError::ChangeSetExists { .. }));
}

#[test]
fn test_create_fails_when_directory_cannot_be_made() {
    let temp = tempdir().unwrap();
    let blocker = temp.path().join("blocker");
    fs::write(&blocker, "not a directory").unwrap();

    let store = ChangeSetStore::new(blocker.join("migrations"));
    let err = store.create_at("x", at(0)).unwrap_err();
    assert!(matches!(err, CoreError::IoWithPath { .. }));
}

#[test]
fn test_read_forward_missing_is_not_found() {
    let temp = tempdir().unwrap();
    let store = ChangeSetStore::new(temp.path());
    let err = store
        .read_forward(&ChangeSetId::new("20240101000000_gone"))
        .unwrap_err();
    assert!(matches!(err, CoreError::ChangeSetNotFound { .. }));
}

#[test]
fn test_read_rollback_absent_vs_empty() {
    let temp = tempdir().unwrap();
    let store = ChangeSetStore::new(temp.path());
    let with_empty = ChangeSetId::new("20240101000000_a");
    let without = ChangeSetId::new("20240102000000_b");
    fs::write(store.forward_path(&with_empty), "CREATE TABLE a (id INT);").unwrap();
    fs::write(store.rollback_path(&with_empty), "").unwrap();
    fs::write(store.forward_path(&without), "CREATE TABLE b (id INT);").unwrap();

    assert_eq!(store.read_rollback(&with_empty).unwrap(), Some(String::new()));
    assert_eq!(store.read_rollback(&without).unwrap(), None);
}

#[test]
fn test_load_combines_scripts() {
    let temp = tempdir().unwrap();
    let store = ChangeSetStore::new(temp.path());
    let id = ChangeSetId::new("20240101000000_a");
    fs::write(store.forward_path(&id), "CREATE TABLE a (id INT);").unwrap();
    fs::write(store.rollback_path(&id), "DROP TABLE a;").unwrap();

    let change_set = store.load(&id).unwrap();
    assert_eq!(change_set.forward_script, "CREATE TABLE a (id INT);");
    assert!(change_set.has_rollback());
}
