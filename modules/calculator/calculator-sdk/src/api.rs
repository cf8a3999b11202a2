//! Best-effort operation tracking contract.
//!
//! Operation services report every successful calculation to a `MetricsSink`
//! after the response has been determined. Sinks may be unavailable; callers
//! must treat every `SinkError` as non-fatal.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Operation;

/// One tracked calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationEvent {
    pub operation: Operation,
    pub num1: f64,
    pub num2: f64,
    pub result: f64,
    pub timestamp: DateTime<Utc>,
}

impl OperationEvent {
    #[must_use]
    pub fn now(operation: Operation, num1: f64, num2: f64, result: f64) -> Self {
        Self {
            operation,
            num1,
            num2,
            result,
            timestamp: Utc::now(),
        }
    }
}

/// Error reported by a sink.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    #[error("metrics sink unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait MetricsSink: Send + Sync {
    /// Record one calculation.
    ///
    /// # Errors
    /// Returns `SinkError` if the backing store cannot be written.
    async fn record(&self, event: OperationEvent) -> Result<(), SinkError>;

    /// Number of calculations recorded for `operation`.
    ///
    /// # Errors
    /// Returns `SinkError` if the backing store cannot be read.
    async fn operation_count(&self, operation: Operation) -> Result<u64, SinkError>;
}

/// Sink that drops everything; used when tracking is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

#[async_trait]
impl MetricsSink for NoopSink {
    async fn record(&self, _event: OperationEvent) -> Result<(), SinkError> {
        Ok(())
    }

    async fn operation_count(&self, _operation: Operation) -> Result<u64, SinkError> {
        Ok(0)
    }
}
