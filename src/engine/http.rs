//! HTTP query engine client.
//!
//! Posts the query text to the engine's HTTP interface and asks for JSON
//! output. Statements without a result set come back with an empty body.

use super::{EngineResponse, QueryEngine, ResultData};
use crate::config::EngineConfig;
use crate::error::{LaunchError, Result};
use async_trait::async_trait;
use tracing::debug;
use url::Url;

/// Query engine reached over HTTP.
pub struct HttpEngineClient {
    client: reqwest::Client,
    url: Url,
    database: Option<String>,
}

impl HttpEngineClient {
    /// Creates a client for the engine at `url`.
    pub fn new(url: &str, database: Option<String>) -> Result<Self> {
        let url = Url::parse(url)
            .map_err(|e| LaunchError::config(format!("Invalid engine URL '{url}': {e}")))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(LaunchError::config(format!(
                "Invalid scheme '{}'. Expected 'http' or 'https'",
                url.scheme()
            )));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            url,
            database,
        })
    }

    /// Creates a client from the `[engine]` config section.
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        Self::new(&config.url, config.database.clone())
    }

    /// Returns the request URL with format and database parameters applied.
    fn request_url(&self) -> Url {
        let mut url = self.url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("default_format", "JSON");
            if let Some(database) = &self.database {
                pairs.append_pair("database", database);
            }
        }
        url
    }
}

/// Turns a successful response body into an engine response.
fn parse_response_body(body: &str) -> Result<EngineResponse> {
    if body.trim().is_empty() {
        return Ok(EngineResponse::empty());
    }

    let data: ResultData = serde_json::from_str(body)
        .map_err(|e| LaunchError::engine(format!("Malformed engine response: {e}")))?;
    Ok(EngineResponse::with_data(data))
}

#[async_trait]
impl QueryEngine for HttpEngineClient {
    async fn execute_query(&self, sql: &str) -> Result<EngineResponse> {
        let url = self.request_url();
        debug!(url = %url, "posting query to engine");

        let response = self
            .client
            .post(url)
            .body(sql.to_string())
            .send()
            .await
            .map_err(|e| LaunchError::engine(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LaunchError::engine(format!("Failed to read engine response: {e}")))?;

        if !status.is_success() {
            return Err(LaunchError::engine_with_detail(
                format!("Request failed with status code {}", status.as_u16()),
                body.trim(),
            ));
        }

        parse_response_body(&body)
    }
}
