//! End-to-end launch tests.
//!
//! Drives the controller the way the editor pane does: edit, select, launch,
//! answer the confirmation prompt.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use query_launch::editor::{BufferEditor, EditorHost};
use query_launch::engine::{
    EngineResponse, FailingEngineClient, MockEngineClient, QueryEngine, ResultData, Statistics,
};
use query_launch::error::LaunchError;
use query_launch::notify::{Intent, RecordingNotifier};
use query_launch::persistence::{set_confirmation_disabled, MemoryStore};
use query_launch::query::{ExecutionController, LaunchOutcome};
use query_launch::report::{RecordingResultSink, Reporter, ResultPayload, Settled};
use query_launch::safety::ExecutionState;
use serde_json::json;
use tokio::sync::Notify;

struct Pane {
    editor: Arc<BufferEditor>,
    store: Arc<MemoryStore>,
    notifier: Arc<RecordingNotifier>,
    results: Arc<RecordingResultSink>,
    controller: ExecutionController,
}

fn pane(text: &str, engine: Arc<dyn QueryEngine>) -> Pane {
    let editor = Arc::new(BufferEditor::new(text));
    let store = Arc::new(MemoryStore::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let results = Arc::new(RecordingResultSink::new());
    let controller = ExecutionController::new(
        editor.clone(),
        store.clone(),
        engine,
        Reporter::new(notifier.clone(), results.clone()),
    );
    Pane {
        editor,
        store,
        notifier,
        results,
        controller,
    }
}

#[tokio::test]
async fn test_statistics_message_for_populated_result() {
    let engine = Arc::new(MockEngineClient::new());
    let mut data = ResultData::new(
        10,
        Statistics {
            elapsed: 12.3456,
            rows_read: 1000,
            bytes_read: 2048,
        },
    );
    data.data = Some(json!([{"n": 1}]));
    engine.push_response(Ok(EngineResponse::with_data(data.clone())));
    let p = pane("SELECT n FROM numbers(10)", engine.clone());

    let outcome = p.controller.launch().await;

    assert_eq!(
        outcome,
        LaunchOutcome::Completed(Settled::Data {
            statistics: "returned 10 rows, elapsed 12.346ms, 1000 rows processed on 2.05KB of data"
                .to_string()
        })
    );
    assert_eq!(p.results.received(), vec![ResultPayload::Data(data)]);
    assert!(p.notifier.shown().is_empty());
}

#[tokio::test]
async fn test_engine_extras_reach_result_sink() {
    let engine = Arc::new(MockEngineClient::new());
    let data: ResultData = serde_json::from_value(json!({
        "meta": [{"name": "n", "type": "UInt64"}],
        "data": [{"n": "7"}],
        "rows": 1,
        "rows_before_limit_at_least": 500,
        "totals": {"n": "42"},
        "statistics": {"elapsed": 0.0625, "rows_read": 500, "bytes_read": 125}
    }))
    .unwrap();
    engine.push_response(Ok(EngineResponse::with_data(data)));
    let p = pane("SELECT n FROM t LIMIT 1 WITH TOTALS", engine);

    p.controller.launch().await;

    let payload = p.results.received()[0].to_json();
    assert_eq!(payload["rows_before_limit_at_least"], 500);
    assert_eq!(payload["totals"], json!({"n": "42"}));
    assert_eq!(
        p.controller.statistics(),
        "returned 1 rows, elapsed 0.063ms, 500 rows processed on 0.13KB of data"
    );
}

#[tokio::test]
async fn test_empty_result_notifies_and_sends_empty_object() {
    let engine = Arc::new(MockEngineClient::new());
    engine.push_response(Ok(EngineResponse::empty()));
    let p = pane("INSERT INTO t VALUES (1)", engine);

    p.controller.launch().await;

    assert_eq!(p.controller.statistics(), "");
    let received = p.results.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].to_json(), json!({}));

    let toast = p.notifier.last().unwrap();
    assert_eq!(toast.intent, Intent::Success);
    assert_eq!(toast.timeout.as_millis(), 5000);
}

#[tokio::test]
async fn test_rejection_shows_persistent_error() {
    let engine = Arc::new(FailingEngineClient::new(LaunchError::engine_with_detail(
        "Request failed",
        "syntax error",
    )));
    let p = pane("SELEC 1", engine);

    p.controller.launch().await;

    let toast = p.notifier.last().unwrap();
    assert_eq!(toast.message, "Request failed - syntax error");
    assert_eq!(toast.timeout.as_millis(), 0);
    assert_eq!(toast.intent, Intent::Danger);
    assert_eq!(p.results.received()[0].to_json(), json!({}));
    assert_eq!(p.controller.state(), ExecutionState::Idle);
    assert!(!p.controller.is_loading());
}

#[tokio::test]
async fn test_rejection_without_detail() {
    let engine = Arc::new(FailingEngineClient::new(LaunchError::engine("Network Error")));
    let p = pane("SELECT 1", engine);

    p.controller.launch().await;

    assert_eq!(p.notifier.last().unwrap().message, "Network Error");
}

#[tokio::test]
async fn test_full_drop_confirmation_flow() {
    let engine = Arc::new(MockEngineClient::new());
    let p = pane("SELECT 1;\nDROP TABLE logs;", engine.clone());
    p.editor.select(10..26);

    let outcome = p.controller.launch().await;
    assert_eq!(
        outcome,
        LaunchOutcome::AwaitingConfirmation {
            query: "DROP TABLE logs;".to_string()
        }
    );
    assert_eq!(engine.call_count(), 0);

    // Wrong case first, then the exact phrase, keystroke by keystroke.
    p.controller.set_typed_phrase("drop");
    assert_eq!(p.controller.confirm().await, LaunchOutcome::PhraseMismatch);
    assert_eq!(p.notifier.last().unwrap().message, "Type DROP to confirm.");
    assert_eq!(engine.call_count(), 0);

    for typed in ["D", "DR", "DRO", "DROP"] {
        p.controller.set_typed_phrase(typed);
    }
    let outcome = p.controller.confirm().await;

    assert_eq!(outcome, LaunchOutcome::Completed(Settled::Empty));
    assert_eq!(engine.calls(), vec!["DROP TABLE logs;".to_string()]);
    assert_eq!(p.controller.state(), ExecutionState::Idle);
    assert!(p.controller.confirmation().is_none());
}

#[tokio::test]
async fn test_cancelled_drop_never_reaches_engine() {
    let engine = Arc::new(MockEngineClient::new());
    let p = pane("DROP DATABASE prod", engine.clone());

    p.controller.launch().await;
    assert!(p.controller.cancel());

    assert_eq!(engine.call_count(), 0);
    assert!(p.results.received().is_empty());
    assert_eq!(p.controller.state(), ExecutionState::Idle);

    // A fresh launch prompts again.
    let outcome = p.controller.launch().await;
    assert!(matches!(outcome, LaunchOutcome::AwaitingConfirmation { .. }));
}

#[tokio::test]
async fn test_disable_flag_skips_prompt() {
    let engine = Arc::new(MockEngineClient::new());
    let p = pane("DROP TABLE tmp", engine.clone());
    set_confirmation_disabled(p.store.as_ref(), true).unwrap();

    p.controller.launch().await;
    assert_eq!(engine.call_count(), 1);

    set_confirmation_disabled(p.store.as_ref(), false).unwrap();
    let outcome = p.controller.launch().await;
    assert!(matches!(outcome, LaunchOutcome::AwaitingConfirmation { .. }));
    assert_eq!(engine.call_count(), 1);
}

#[tokio::test]
async fn test_second_launch_during_flight_is_dropped() {
    let gate = Arc::new(Notify::new());
    let engine = Arc::new(MockEngineClient::new().with_hold(gate.clone()));
    let p = pane("SELECT sleep(3)", engine.clone());

    let first = p.controller.launch();
    let second = async {
        engine.wait_for_call().await;
        let outcome = p.controller.launch().await;
        assert!(p.controller.is_loading());
        gate.notify_one();
        outcome
    };
    let (first, second) = tokio::join!(first, second);

    assert!(matches!(first, LaunchOutcome::Completed(_)));
    assert_eq!(second, LaunchOutcome::Busy);
    assert_eq!(engine.call_count(), 1);
    assert_eq!(p.results.received().len(), 1);
    assert!(!p.controller.is_loading());
}

#[tokio::test]
async fn test_failure_then_success_starts_fresh() {
    let engine = Arc::new(MockEngineClient::new());
    engine.push_response(Err(LaunchError::engine("Request failed")));
    let p = pane("SELECT 1", engine.clone());

    p.controller.launch().await;
    assert_eq!(p.controller.statistics(), "");

    let outcome = p.controller.launch().await;
    assert!(matches!(outcome, LaunchOutcome::Completed(Settled::Data { .. })));
    assert!(p.controller.statistics().starts_with("returned 1 rows"));
    assert_eq!(p.results.received().len(), 2);
    assert_eq!(p.editor.value(), "SELECT 1");
}
