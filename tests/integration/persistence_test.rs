//! Persistence tests against a real state file.

use std::sync::Arc;

use query_launch::editor::{BufferEditor, EditorHost};
use query_launch::engine::MockEngineClient;
use query_launch::notify::RecordingNotifier;
use query_launch::persistence::{
    confirmation_disabled, set_confirmation_disabled, FileStore, PersistencePort, QUERY_KEY,
};
use query_launch::query::{ExecutionController, LaunchOutcome};
use query_launch::report::{RecordingResultSink, Reporter};
use tempfile::tempdir;

fn controller(store: Arc<FileStore>, editor: Arc<BufferEditor>) -> ExecutionController {
    ExecutionController::new(
        editor,
        store,
        Arc::new(MockEngineClient::new()),
        Reporter::new(
            Arc::new(RecordingNotifier::new()),
            Arc::new(RecordingResultSink::new()),
        ),
    )
}

#[test]
fn test_buffer_round_trips_through_state_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");

    {
        let store = Arc::new(FileStore::open(&path).unwrap());
        let editor = Arc::new(BufferEditor::new(""));
        let pane = controller(store, editor);
        pane.on_change("SELECT count() FROM events").unwrap();
    }

    let store = Arc::new(FileStore::open(&path).unwrap());
    let editor = Arc::new(BufferEditor::new(""));
    let pane = controller(store.clone(), editor.clone());

    assert_eq!(pane.on_load().unwrap(), "SELECT count() FROM events");
    assert_eq!(editor.value(), "SELECT count() FROM events");
    assert_eq!(
        store.get(QUERY_KEY).unwrap().as_deref(),
        Some("SELECT count() FROM events")
    );
}

#[tokio::test]
async fn test_disable_flag_read_from_state_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");

    {
        let store = FileStore::open(&path).unwrap();
        set_confirmation_disabled(&store, true).unwrap();
    }

    let store = Arc::new(FileStore::open(&path).unwrap());
    assert!(confirmation_disabled(store.as_ref()));

    let pane = controller(store, Arc::new(BufferEditor::new("DROP TABLE t")));
    let outcome = pane.launch().await;
    assert!(matches!(outcome, LaunchOutcome::Completed(_)));
}

#[test]
fn test_state_file_is_plain_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");

    let store = FileStore::open(&path).unwrap();
    store.set(QUERY_KEY, "SELECT 1").unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(parsed["query"], "SELECT 1");
}
