//! Result and error reporting.
//!
//! Turns a settled engine call into a statistics line, a notification, and
//! exactly one delivery to the result sink.

use crate::engine::{EngineResponse, ResultData};
use crate::error::{LaunchError, Result};
use crate::notify::{Notification, NotificationSink, TRANSIENT_TIMEOUT};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{error, info};

/// Message shown when a statement succeeds without a result set.
pub const EMPTY_SUCCESS_MESSAGE: &str = "Your query running ok.";

/// What the result sink receives for one execution.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultPayload {
    /// The engine's result set.
    Data(ResultData),
    /// No result set (empty success or failure).
    Empty,
}

impl ResultPayload {
    /// Returns the payload as JSON; `Empty` becomes `{}`.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Data(data) => serde_json::to_value(data)
                .unwrap_or_else(|_| Value::Object(serde_json::Map::new())),
            Self::Empty => Value::Object(serde_json::Map::new()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Consumer of execution results (the results grid in the host).
pub trait ResultSink: Send + Sync {
    fn on_data(&self, payload: ResultPayload);
}

/// Result sink that keeps every payload it receives.
#[derive(Debug, Default)]
pub struct RecordingResultSink {
    received: Mutex<Vec<ResultPayload>>,
}

impl RecordingResultSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every payload delivered so far.
    pub fn received(&self) -> Vec<ResultPayload> {
        self.received
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }
}

impl ResultSink for RecordingResultSink {
    fn on_data(&self, payload: ResultPayload) {
        self.received
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(payload);
    }
}

/// Formats the statistics line for a populated result.
///
/// Elapsed time keeps three decimals, data volume is shown in units of
/// 1000 bytes with two decimals.
pub fn format_statistics(data: &ResultData) -> String {
    let stats = &data.statistics;
    format!(
        "returned {} rows, elapsed {}ms, {} rows processed on {}KB of data",
        data.rows,
        to_fixed(stats.elapsed, 3),
        stats.rows_read,
        to_fixed(stats.bytes_read as f64 / 1000.0, 2)
    )
}

// Enough fractional digits to print any f64 exactly.
const EXACT_FRACTION_DIGITS: usize = 1100;

/// Formats `value` with `digits` decimals, rounding halves away from zero.
///
/// Rounding is decided on the exact decimal expansion of the double, so
/// `0.125` becomes `0.13` while `1.005` (stored as `1.00499...`) stays `1.00`.
pub fn to_fixed(value: f64, digits: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let exact = format!("{:.*}", EXACT_FRACTION_DIGITS, value.abs());
    let (int_part, fraction) = exact.split_once('.').unwrap_or((exact.as_str(), ""));

    let mut kept: Vec<u8> = int_part
        .bytes()
        .chain(fraction.bytes().take(digits))
        .collect();
    let round_up = fraction.as_bytes().get(digits).is_some_and(|d| *d >= b'5');

    if round_up {
        let mut carry = true;
        for d in kept.iter_mut().rev() {
            if *d == b'9' {
                *d = b'0';
            } else {
                *d += 1;
                carry = false;
                break;
            }
        }
        if carry {
            kept.insert(0, b'1');
        }
    }

    let split = kept.len() - digits;
    let mut out = String::with_capacity(kept.len() + 2);
    if value < 0.0 {
        out.push('-');
    }
    out.extend(kept[..split].iter().map(|d| *d as char));
    if digits > 0 {
        out.push('.');
        out.extend(kept[split..].iter().map(|d| *d as char));
    }
    out
}

/// How an engine call settled, from the reporter's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settled {
    /// A result set came back; carries the statistics line.
    Data { statistics: String },
    /// The statement succeeded without a result set.
    Empty,
    /// The engine rejected the query; carries the notification text.
    Failed { message: String },
}

impl Settled {
    /// The statistics line to display after this settle (empty unless data).
    pub fn statistics(&self) -> &str {
        match self {
            Self::Data { statistics } => statistics,
            _ => "",
        }
    }
}

/// Routes settled engine calls to the result and notification sinks.
pub struct Reporter {
    notifier: Arc<dyn NotificationSink>,
    results: Arc<dyn ResultSink>,
    transient_timeout: Duration,
}

impl Reporter {
    /// Creates a reporter with the default 5000 ms transient timeout.
    pub fn new(notifier: Arc<dyn NotificationSink>, results: Arc<dyn ResultSink>) -> Self {
        Self {
            notifier,
            results,
            transient_timeout: TRANSIENT_TIMEOUT,
        }
    }

    /// Overrides how long transient notifications stay up.
    pub fn with_transient_timeout(mut self, timeout: Duration) -> Self {
        self.transient_timeout = timeout;
        self
    }

    pub fn transient_timeout(&self) -> Duration {
        self.transient_timeout
    }

    /// Shows a notification through the configured sink.
    pub fn notify(&self, notification: Notification) {
        self.notifier.show(notification);
    }

    /// Reports one settled engine call. Delivers to the result sink exactly once.
    pub fn report(&self, result: Result<EngineResponse>) -> Settled {
        match result {
            Ok(EngineResponse { data: Some(data) }) => {
                let statistics = format_statistics(&data);
                info!("{statistics}");
                self.results.on_data(ResultPayload::Data(data));
                Settled::Data { statistics }
            }
            Ok(EngineResponse { data: None }) => {
                self.results.on_data(ResultPayload::Empty);
                self.notifier.show(Notification::success(
                    EMPTY_SUCCESS_MESSAGE,
                    self.transient_timeout,
                ));
                Settled::Empty
            }
            Err(err) => self.report_failure(&err),
        }
    }

    fn report_failure(&self, err: &LaunchError) -> Settled {
        error!("{}: {}", err.category(), err);
        let message = err.notification_message();
        self.results.on_data(ResultPayload::Empty);
        self.notifier
            .show(Notification::persistent_error(message.clone()));
        Settled::Failed { message }
    }
}
