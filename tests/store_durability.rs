//! Store Durability Tests
//!
//! The journal is the only persistent state, so these invariants carry
//! the whole system:
//! - Acknowledged inserts survive a process restart
//! - Corruption is never ignored: a damaged journal refuses to load
//! - Declared unique fields hold across restarts

use std::fs;

use serde_json::json;
use tempfile::TempDir;

use fitlog::store::{
    CollectionSpec, DocumentStore, Filter, Journal, JournalRecord, StoreError, JOURNAL_FILE,
};

// =============================================================================
// Test Utilities
// =============================================================================

const SPECS: &[CollectionSpec] = &[
    CollectionSpec::with_unique("users", "username"),
    CollectionSpec::new("exercises"),
];

fn open_store(dir: &TempDir) -> DocumentStore {
    DocumentStore::open(dir.path(), SPECS).expect("store should open")
}

// =============================================================================
// Inserts survive restart
// =============================================================================

#[test]
fn test_acknowledged_inserts_survive_reopen() {
    let dir = TempDir::new().unwrap();

    let (user_id, exercise_id) = {
        let store = open_store(&dir);
        let user = store.insert("users", json!({"username": "alice"})).unwrap();
        let user_id = user["_id"].as_str().unwrap().to_string();
        let exercise = store
            .insert(
                "exercises",
                json!({
                    "userId": user_id,
                    "description": "test run",
                    "duration": 30,
                    "date": "2023-01-15"
                }),
            )
            .unwrap();
        (user_id, exercise["_id"].as_str().unwrap().to_string())
    };

    let store = open_store(&dir);
    let user = store.get("users", &user_id).unwrap().expect("user survives");
    assert_eq!(user["username"], "alice");

    let exercise = store
        .get("exercises", &exercise_id)
        .unwrap()
        .expect("exercise survives");
    assert_eq!(exercise["description"], "test run");
    assert_eq!(exercise["duration"], 30);
    assert_eq!(exercise["date"], "2023-01-15");
}

#[test]
fn test_insertion_order_survives_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let store = open_store(&dir);
        for name in ["carol", "alice", "bob"] {
            store.insert("users", json!({"username": name})).unwrap();
        }
    }

    let store = open_store(&dir);
    let all = store.find("users", &Filter::new()).unwrap();
    let names: Vec<_> = all.iter().map(|d| d["username"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["carol", "alice", "bob"]);
}

// =============================================================================
// Corruption is never ignored
// =============================================================================

#[test]
fn test_corrupted_journal_refuses_to_load() {
    let dir = TempDir::new().unwrap();
    {
        let store = open_store(&dir);
        store.insert("users", json!({"username": "alice"})).unwrap();
    }

    let path = dir.path().join(JOURNAL_FILE);
    let mut contents = fs::read(&path).unwrap();
    let mid = contents.len() / 2;
    contents[mid] ^= 0xFF;
    fs::write(&path, &contents).unwrap();

    let result = DocumentStore::open(dir.path(), SPECS);
    match result {
        Err(StoreError::Corrupted { detail, .. }) => {
            assert!(
                detail.to_lowercase().contains("checksum") || detail.contains("truncated"),
                "unexpected detail: {}",
                detail
            );
        }
        other => panic!("corruption must refuse to load, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_truncated_tail_refuses_to_load() {
    let dir = TempDir::new().unwrap();
    {
        let store = open_store(&dir);
        store.insert("users", json!({"username": "alice"})).unwrap();
        store.insert("users", json!({"username": "bob"})).unwrap();
    }

    let path = dir.path().join(JOURNAL_FILE);
    let contents = fs::read(&path).unwrap();
    fs::write(&path, &contents[..contents.len() - 7]).unwrap();

    assert!(matches!(
        DocumentStore::open(dir.path(), SPECS),
        Err(StoreError::Corrupted { .. })
    ));
}

#[test]
fn test_replayed_record_must_name_declared_collection() {
    let dir = TempDir::new().unwrap();
    {
        let (mut journal, _) = Journal::open(dir.path()).unwrap();
        journal
            .append(&JournalRecord::new(
                "workouts",
                "w1",
                br#"{"_id":"w1"}"#.to_vec(),
            ))
            .unwrap();
    }

    assert!(matches!(
        DocumentStore::open(dir.path(), SPECS),
        Err(StoreError::UnknownCollection(_))
    ));
}

// =============================================================================
// Unique fields hold across restarts
// =============================================================================

#[test]
fn test_unique_username_enforced_across_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let store = open_store(&dir);
        store.insert("users", json!({"username": "alice"})).unwrap();
    }

    let store = open_store(&dir);
    let result = store.insert("users", json!({"username": "alice"}));
    assert!(matches!(result, Err(StoreError::DuplicateValue { .. })));

    // a rejected insert leaves nothing behind, even after another restart
    drop(store);
    let store = open_store(&dir);
    assert_eq!(store.find("users", &Filter::new()).unwrap().len(), 1);
}
