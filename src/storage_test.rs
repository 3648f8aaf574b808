use super::*;

#[test]
fn memory_store_round_trip() {
    let store = MemoryStore::new();
    assert_eq!(store.get("missing"), None);
    store.set("autosave", "flowchart TD");
    assert_eq!(store.get("autosave").as_deref(), Some("flowchart TD"));
}

#[test]
fn memory_store_overwrites() {
    let store = MemoryStore::new();
    store.set("k", "first");
    store.set("k", "second");
    assert_eq!(store.get("k").as_deref(), Some("second"));
}

#[test]
fn file_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path()).unwrap();
    assert_eq!(store.get("history"), None);
    store.set("history", "[]");
    assert_eq!(store.get("history").as_deref(), Some("[]"));
}

#[test]
fn file_store_keys_are_independent_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path()).unwrap();
    store.set("a", "1");
    store.set("b", "2");
    assert!(dir.path().join("a.json").exists());
    assert!(dir.path().join("b.json").exists());
    assert_eq!(store.get("a").as_deref(), Some("1"));
}
