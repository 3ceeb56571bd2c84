//! Autocomplete aggregation tests.

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use query_launch::autocomplete::{catalog_channel, AutocompleteAggregator, SuggestionEntry};
use query_launch::editor::BufferEditor;
use query_launch::persistence::{MemoryStore, AUTOCOMPLETE_COLLECTION_KEY};

#[tokio::test]
async fn test_duplicate_names_keep_first_occurrence() {
    let editor = Arc::new(BufferEditor::new(""));
    let store = Arc::new(MemoryStore::new());
    let (publisher, receiver) = catalog_channel();

    let handle = AutocompleteAggregator::new(editor.clone(), store).mount(receiver);
    publisher.publish(vec![
        SuggestionEntry::new("a"),
        SuggestionEntry::new("b"),
        SuggestionEntry::new("a"),
    ]);
    let set = handle.await.unwrap();

    assert_eq!(
        set.entries().to_vec(),
        vec![SuggestionEntry::new("a"), SuggestionEntry::new("b")]
    );
}

#[tokio::test]
async fn test_provider_returns_full_set_for_any_prefix() {
    let editor = Arc::new(BufferEditor::new("SELECT * FROM us"));
    let store = Arc::new(MemoryStore::new());
    let (publisher, receiver) = catalog_channel();
    publisher.publish(vec![
        SuggestionEntry::new("users").with_meta("meta", "table"),
        SuggestionEntry::new("orders").with_meta("meta", "table"),
        SuggestionEntry::new("user_id").with_meta("meta", "column"),
    ]);

    AutocompleteAggregator::new(editor.clone(), store)
        .run(receiver)
        .await;

    let names: Vec<_> = editor
        .completions(16, "us")
        .into_iter()
        .map(|e| e.name)
        .collect();
    assert_eq!(names, vec!["users", "orders", "user_id"]);
}

#[tokio::test]
async fn test_stored_catalog_used_when_nothing_published() {
    let editor = Arc::new(BufferEditor::new(""));
    let store = Arc::new(MemoryStore::with_values([(
        AUTOCOMPLETE_COLLECTION_KEY,
        r#"[{"name":"default","meta":"database"},{"name":"events","meta":"table"},{"name":"default","meta":"database"}]"#,
    )]));
    let (_publisher, receiver) = catalog_channel();

    let set = AutocompleteAggregator::new(editor.clone(), store)
        .with_settle_timeout(Duration::from_millis(20))
        .run(receiver)
        .await;

    assert_eq!(set.names(), vec!["default", "events"]);
    assert_eq!(editor.completions(0, "").len(), 2);
}

#[tokio::test]
async fn test_malformed_stored_catalog_registers_empty_set() {
    let editor = Arc::new(BufferEditor::new(""));
    let store = Arc::new(MemoryStore::with_values([(
        AUTOCOMPLETE_COLLECTION_KEY,
        "not json",
    )]));
    let (publisher, receiver) = catalog_channel();
    drop(publisher);

    let set = AutocompleteAggregator::new(editor.clone(), store)
        .run(receiver)
        .await;

    assert!(set.is_empty());
    assert!(editor.has_completion_provider());
}

#[tokio::test]
async fn test_remount_rebuilds_wholesale() {
    let editor = Arc::new(BufferEditor::new(""));
    let store = Arc::new(MemoryStore::new());

    let (first, receiver) = catalog_channel();
    first.publish(vec![SuggestionEntry::new("old_table")]);
    AutocompleteAggregator::new(editor.clone(), store.clone())
        .run(receiver)
        .await;

    let (second, receiver) = catalog_channel();
    second.publish(vec![SuggestionEntry::new("new_table")]);
    AutocompleteAggregator::new(editor.clone(), store)
        .run(receiver)
        .await;

    let names: Vec<_> = editor
        .completions(0, "")
        .into_iter()
        .map(|e| e.name)
        .collect();
    assert_eq!(names, vec!["new_table"]);
}
