//! Mock engine clients for testing.
//!
//! Provides scripted responses, call recording, and an optional hold gate so
//! tests can observe the controller while a request is in flight.

use super::{EngineResponse, QueryEngine, ResultData, Statistics};
use crate::error::{LaunchError, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// A mock engine that returns scripted or synthetic results.
///
/// Scripted responses are consumed in order. Once they run out, read-style
/// queries get a one-row result and everything else an empty response.
#[derive(Default)]
pub struct MockEngineClient {
    scripted: Mutex<VecDeque<Result<EngineResponse>>>,
    calls: Mutex<Vec<String>>,
    entered: Notify,
    hold: Option<Arc<Notify>>,
}

impl MockEngineClient {
    /// Creates a mock with no scripted responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response for the next call.
    pub fn push_response(&self, response: Result<EngineResponse>) {
        self.scripted
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push_back(response);
    }

    /// Makes every call wait on `gate` before settling.
    pub fn with_hold(mut self, gate: Arc<Notify>) -> Self {
        self.hold = Some(gate);
        self
    }

    /// Returns the query texts received so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    /// Returns the number of calls received so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(|p| p.into_inner()).len()
    }

    /// Waits until a call has reached the engine.
    pub async fn wait_for_call(&self) {
        self.entered.notified().await;
    }

    fn synthetic(sql: &str) -> EngineResponse {
        let lowered = sql.trim_start().to_lowercase();
        let reads = ["select", "show", "describe", "with", "explain"]
            .iter()
            .any(|kw| lowered.starts_with(kw));

        if reads {
            let mut data = ResultData::new(
                1,
                Statistics {
                    elapsed: 0.001,
                    rows_read: 1,
                    bytes_read: 1,
                },
            );
            data.data = Some(serde_json::json!([{ "result": format!("Mock result for: {sql}") }]));
            EngineResponse::with_data(data)
        } else {
            EngineResponse::empty()
        }
    }
}

#[async_trait]
impl QueryEngine for MockEngineClient {
    async fn execute_query(&self, sql: &str) -> Result<EngineResponse> {
        self.calls
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(sql.to_string());
        self.entered.notify_one();

        if let Some(gate) = &self.hold {
            gate.notified().await;
        }

        let scripted = self
            .scripted
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .pop_front();
        scripted.unwrap_or_else(|| Ok(Self::synthetic(sql)))
    }
}

/// An engine that rejects every query with the same error.
pub struct FailingEngineClient {
    error: LaunchError,
}

impl FailingEngineClient {
    /// Creates an engine that always fails with `error`.
    pub fn new(error: LaunchError) -> Self {
        Self { error }
    }
}

#[async_trait]
impl QueryEngine for FailingEngineClient {
    async fn execute_query(&self, _sql: &str) -> Result<EngineResponse> {
        Err(self.error.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_select() {
        let client = MockEngineClient::new();
        let response = client.execute_query("SELECT 1").await.unwrap();
        assert_eq!(response.data.map(|d| d.rows), Some(1));
        assert_eq!(client.calls(), vec!["SELECT 1".to_string()]);
    }

    #[tokio::test]
    async fn test_mock_ddl_is_empty() {
        let client = MockEngineClient::new();
        let response = client.execute_query("CREATE TABLE t (x UInt8)").await.unwrap();
        assert!(response.data.is_none());
    }

    #[tokio::test]
    async fn test_scripted_responses_take_priority() {
        let client = MockEngineClient::new();
        client.push_response(Err(LaunchError::engine("boom")));

        assert!(client.execute_query("SELECT 1").await.is_err());
        assert!(client.execute_query("SELECT 1").await.is_ok());
        assert_eq!(client.call_count(), 2);
    }

    #[test]
    fn test_failing_client() {
        let client = FailingEngineClient::new(LaunchError::engine("Network Error"));
        let result = tokio_test::block_on(client.execute_query("SELECT 1"));
        assert_eq!(result.unwrap_err(), LaunchError::engine("Network Error"));
    }
}
