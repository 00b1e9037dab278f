//! Persistence tests for parley-storage
//!
//! These tests check that values survive reopening a file store and that
//! the client's persisted shapes read back unchanged.

use std::sync::Arc;
use std::thread;

use parley_core::{Contact, Conversation, Message, user_ids};
use parley_storage::{
    FileStore, InMemoryStore, KeyValueStore, StoreConfig, load, load_or_default, save,
};
use tempfile::TempDir;

fn sample_conversations() -> Vec<Conversation> {
    vec![
        Conversation::with_message(user_ids(["b", "a"]), Message::new("a", "first")),
        Conversation::new(user_ids(["c"])),
    ]
}

#[test]
fn test_values_survive_reopen() {
    let temp = TempDir::new().unwrap();

    {
        let store = FileStore::open(temp.path()).unwrap();
        save(&store, "conversations", &sample_conversations()).unwrap();
        save(&store, "id", "u1").unwrap();
    }

    let reopened = FileStore::open(temp.path()).unwrap();
    let conversations: Vec<Conversation> = load_or_default(&reopened, "conversations");
    assert_eq!(conversations, sample_conversations());
    // Stored recipient order is kept as written
    assert_eq!(conversations[0].recipients, user_ids(["b", "a"]));

    let id: Option<String> = load(&reopened, "id").unwrap();
    assert_eq!(id.as_deref(), Some("u1"));
}

#[test]
fn test_prefixes_isolate_namespaces() {
    let temp = TempDir::new().unwrap();
    let first =
        FileStore::with_config(StoreConfig::new(temp.path()).with_key_prefix("one-")).unwrap();
    let second =
        FileStore::with_config(StoreConfig::new(temp.path()).with_key_prefix("two-")).unwrap();

    save(&first, "contacts", &vec![Contact::new("u2", "Bob")]).unwrap();

    let seen: Vec<Contact> = load_or_default(&second, "contacts");
    assert!(seen.is_empty());
}

#[test]
fn test_corrupt_file_loads_as_default() {
    let temp = TempDir::new().unwrap();
    let store = FileStore::open(temp.path()).unwrap();
    let path = store.path_for("conversations").unwrap();
    std::fs::write(&path, "[{\"recipients\": 5}]").unwrap();

    let conversations: Vec<Conversation> = load_or_default(&store, "conversations");
    assert!(conversations.is_empty());
}

#[test]
fn test_concurrent_writers_in_memory() {
    let store = Arc::new(InMemoryStore::new());
    let mut handles = Vec::new();

    for t in 0..8 {
        let store = store.clone();
        handles.push(thread::spawn(move || {
            for i in 0..100 {
                store.set(&format!("k{t}-{i}"), "v").unwrap();
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.len(), 800);
}

#[test]
fn test_concurrent_writers_same_key_on_disk() {
    let temp = TempDir::new().unwrap();
    let config = StoreConfig::new(temp.path()).with_sync_writes(false);
    let store = Arc::new(FileStore::with_config(config).unwrap());
    let mut handles = Vec::new();

    for t in 0..8 {
        let store = store.clone();
        handles.push(thread::spawn(move || {
            let mut errors = Vec::new();
            for i in 0..200 {
                if let Err(e) = store.set("conversations", &format!("[\"{t}-{i}\"]")) {
                    errors.push(e.to_string());
                }
            }
            errors
        }));
    }

    let errors: Vec<String> = handles
        .into_iter()
        .flat_map(|handle| handle.join().unwrap())
        .collect();
    assert!(errors.is_empty(), "writes failed: {errors:?}");

    // The surviving value is one complete write, and no temporaries remain
    let value: Vec<String> = load(&*store, "conversations").unwrap().unwrap();
    assert_eq!(value.len(), 1);
    let entries = std::fs::read_dir(temp.path()).unwrap().count();
    assert_eq!(entries, 1);
}
