use super::*;
use crate::test_helpers::profile;
use crate::types::Role;

fn store_in(dir: &tempfile::TempDir) -> FileStore {
    FileStore::new(dir.path().join("nested").join("session.json"))
}

#[test]
fn missing_file_reads_none() {
    let dir = tempfile::tempdir().unwrap();
    assert!(store_in(&dir).get().is_none());
}

#[test]
fn set_creates_parent_dirs_and_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    store.set("T", &profile(Role::Coordinator)).unwrap();
    let persisted = store.get().unwrap();
    assert_eq!(persisted.token, "T");
    assert_eq!(persisted.profile.role, Role::Coordinator);
}

#[test]
fn file_uses_storage_field_names() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    store.set("T", &profile(Role::Admin)).unwrap();
    let raw = std::fs::read_to_string(store.path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["access_token"], "T");
    assert_eq!(value["user_data"]["role"], "admin");
}

#[test]
fn set_leaves_no_temp_file_behind() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    store.set("T", &profile(Role::Admin)).unwrap();
    assert!(!store.temp_path().exists());
}

#[test]
fn clear_deletes_file_and_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    store.set("T", &profile(Role::Admin)).unwrap();
    store.clear().unwrap();
    assert!(!store.path().exists());
    assert!(store.get().is_none());
    store.clear().unwrap();
}

#[test]
fn corrupt_file_reads_none() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path().join("session.json"));
    std::fs::write(store.path(), "{\"access_token\": \"T\"}").unwrap();
    assert!(store.get().is_none());
}

#[cfg(unix)]
#[test]
fn session_file_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    store.set("T", &profile(Role::Admin)).unwrap();
    let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}
