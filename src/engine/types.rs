//! Engine response types.
//!
//! Mirrors the JSON the engine returns for `FORMAT JSON` queries. Only the row
//! count and statistics are interpreted; everything else (column metadata, row
//! data, totals, extremes) is passed through untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A settled engine call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineResponse {
    /// Present when the statement produced a result set.
    #[serde(default)]
    pub data: Option<ResultData>,
}

impl EngineResponse {
    /// A response for statements that produce no result set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A response carrying a result set.
    pub fn with_data(data: ResultData) -> Self {
        Self { data: Some(data) }
    }
}

/// A populated result set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultData {
    /// Number of rows returned.
    pub rows: u64,

    /// Execution statistics reported by the engine.
    pub statistics: Statistics,

    /// Column descriptors, as sent by the engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,

    /// Row payload, as sent by the engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    /// Any other top-level fields, e.g. `rows_before_limit_at_least` or `totals`.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ResultData {
    /// Creates a result with the given row count and statistics and no payload.
    pub fn new(rows: u64, statistics: Statistics) -> Self {
        Self {
            rows,
            statistics,
            meta: None,
            data: None,
            extra: Map::new(),
        }
    }
}

/// Execution statistics for one query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// Elapsed time as reported by the engine.
    pub elapsed: f64,
    /// Rows scanned.
    pub rows_read: u64,
    /// Bytes scanned.
    pub bytes_read: u64,
}
