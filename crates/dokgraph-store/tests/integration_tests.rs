//! Integration tests for dokgraph-store
//!
//! Every scenario runs against both backends through the DocumentStore trait.

use dokgraph_domain::traits::DocumentStore;
use dokgraph_domain::{
    Connection, ConnectionKind, ConnectionSet, Document, KnowledgeItem, Section,
};
use dokgraph_store::{JsonFileStore, SqliteStore, StoreError};
use tempfile::TempDir;

fn sample_document(label: &str) -> Document {
    Document {
        owners: "- Owners\n  - Ada\n".to_string(),
        purpose: format!("- Purpose\n  - {}\n", label),
        tier2: Some(Section {
            raw: "- DOK2\n  - Fact\n".to_string(),
            items: vec![KnowledgeItem {
                index: 1,
                content: "Fact".to_string(),
                children: vec!["- detail".to_string()],
            }],
        }),
        ..Document::default()
    }
}

fn sample_connections() -> ConnectionSet {
    ConnectionSet {
        tier2_to_tier3: vec![Connection::inferred(1, 1, ConnectionKind::Supports, 95)],
        tier3_to_tier4: vec![Connection::inferred(1, 2, ConnectionKind::Contradicts, 95)],
    }
}

fn check_save_and_get<S: DocumentStore<Error = StoreError>>(store: &mut S) {
    let saved = store
        .save("doc-1", "Learning", "https://workflowy.com/s/abc", &sample_document("v1"), "- Learning\n")
        .unwrap();
    assert_eq!(saved.id, "doc-1");
    assert_eq!(saved.created_at, saved.updated_at);
    assert!(saved.connections.is_none());

    let loaded = store.get("doc-1").unwrap().unwrap();
    assert_eq!(loaded.name, "Learning");
    assert_eq!(loaded.url, "https://workflowy.com/s/abc");
    assert_eq!(loaded.raw_markdown, "- Learning\n");
    assert_eq!(loaded.document, sample_document("v1"));

    assert!(store.get("missing").unwrap().is_none());
}

fn check_upsert<S: DocumentStore<Error = StoreError>>(store: &mut S) {
    let first = store
        .save("doc-1", "Old", "https://workflowy.com/s/a", &sample_document("v1"), "")
        .unwrap();
    assert!(store.save_connections("doc-1", &sample_connections()).unwrap());

    let second = store
        .save("doc-1", "New", "https://workflowy.com/s/b", &sample_document("v2"), "")
        .unwrap();

    assert_eq!(second.created_at, first.created_at);
    assert!(second.updated_at >= first.updated_at);
    assert_eq!(second.name, "New");
    assert_eq!(second.document, sample_document("v2"));
    assert!(store.get_connections("doc-1").unwrap().is_none());
    assert_eq!(store.list().unwrap().len(), 1);
}

fn check_list_order<S: DocumentStore<Error = StoreError>>(store: &mut S) {
    for id in ["a", "b", "c"] {
        store
            .save(id, &id.to_uppercase(), "https://workflowy.com/s/x", &Document::default(), "")
            .unwrap();
    }

    let ids: Vec<String> = store.list().unwrap().into_iter().map(|s| s.id).collect();
    assert_eq!(ids, vec!["c", "b", "a"]);
}

fn check_connections<S: DocumentStore<Error = StoreError>>(store: &mut S) {
    assert!(!store.save_connections("ghost", &sample_connections()).unwrap());
    assert!(store.get_connections("ghost").unwrap().is_none());

    store
        .save("doc-1", "Doc", "https://workflowy.com/s/x", &sample_document("v1"), "")
        .unwrap();
    assert!(store.get_connections("doc-1").unwrap().is_none());

    assert!(store.save_connections("doc-1", &sample_connections()).unwrap());
    assert_eq!(store.get_connections("doc-1").unwrap(), Some(sample_connections()));
    assert_eq!(
        store.get("doc-1").unwrap().unwrap().connections,
        Some(sample_connections())
    );
}

fn check_delete<S: DocumentStore<Error = StoreError>>(store: &mut S) {
    store
        .save("doc-1", "Doc", "https://workflowy.com/s/x", &Document::default(), "")
        .unwrap();

    assert!(store.delete("doc-1").unwrap());
    assert!(!store.delete("doc-1").unwrap());
    assert!(store.get("doc-1").unwrap().is_none());
    assert!(store.list().unwrap().is_empty());
}

fn sqlite() -> SqliteStore {
    SqliteStore::new(":memory:").unwrap()
}

fn json_store(dir: &TempDir) -> JsonFileStore {
    JsonFileStore::open(dir.path().join("documents.json")).unwrap()
}

#[test]
fn test_sqlite_save_and_get() {
    check_save_and_get(&mut sqlite());
}

#[test]
fn test_sqlite_upsert() {
    check_upsert(&mut sqlite());
}

#[test]
fn test_sqlite_list_order() {
    check_list_order(&mut sqlite());
}

#[test]
fn test_sqlite_connections() {
    check_connections(&mut sqlite());
}

#[test]
fn test_sqlite_delete() {
    check_delete(&mut sqlite());
}

#[test]
fn test_json_save_and_get() {
    let dir = TempDir::new().unwrap();
    check_save_and_get(&mut json_store(&dir));
}

#[test]
fn test_json_upsert() {
    let dir = TempDir::new().unwrap();
    check_upsert(&mut json_store(&dir));
}

#[test]
fn test_json_list_order() {
    let dir = TempDir::new().unwrap();
    check_list_order(&mut json_store(&dir));
}

#[test]
fn test_json_connections() {
    let dir = TempDir::new().unwrap();
    check_connections(&mut json_store(&dir));
}

#[test]
fn test_json_delete() {
    let dir = TempDir::new().unwrap();
    check_delete(&mut json_store(&dir));
}

#[test]
fn test_sqlite_persists_across_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dokgraph.db");

    {
        let mut store = SqliteStore::new(&path).unwrap();
        store
            .save("doc-1", "Doc", "https://workflowy.com/s/x", &sample_document("v1"), "")
            .unwrap();
        store.save_connections("doc-1", &sample_connections()).unwrap();
    }

    let store = SqliteStore::new(&path).unwrap();
    let loaded = store.get("doc-1").unwrap().unwrap();
    assert_eq!(loaded.document, sample_document("v1"));
    assert_eq!(loaded.connections, Some(sample_connections()));
}

#[test]
fn test_json_persists_across_reopen() {
    let dir = TempDir::new().unwrap();

    {
        let mut store = json_store(&dir);
        store
            .save("doc-1", "Doc", "https://workflowy.com/s/x", &sample_document("v1"), "md")
            .unwrap();
        store.save_connections("doc-1", &sample_connections()).unwrap();
    }

    let store = json_store(&dir);
    let loaded = store.get("doc-1").unwrap().unwrap();
    assert_eq!(loaded.raw_markdown, "md");
    assert_eq!(loaded.connections, Some(sample_connections()));
}
