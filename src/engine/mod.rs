//! Query engine client abstraction.
//!
//! Provides a trait-based interface for the remote query engine, allowing
//! the HTTP client and test doubles to be used interchangeably.

mod http;
mod mock;
mod types;

pub use http::HttpEngineClient;
pub use mock::{FailingEngineClient, MockEngineClient};
pub use types::{EngineResponse, ResultData, Statistics};

use crate::error::Result;
use async_trait::async_trait;

/// Trait defining the interface for query engine clients.
///
/// Failures are reported as [`crate::error::LaunchError::Engine`] carrying the
/// engine's message and optional response detail.
#[async_trait]
pub trait QueryEngine: Send + Sync {
    /// Sends the full query text to the engine and waits for it to settle.
    async fn execute_query(&self, sql: &str) -> Result<EngineResponse>;
}
