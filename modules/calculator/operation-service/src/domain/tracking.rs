//! Fire-and-forget operation tracking.
//!
//! The response of a calculation never depends on the sink: records are
//! spawned onto the runtime and failures are only logged.

use std::sync::Arc;

use calculator_sdk::{MetricsSink, Operation, OperationEvent};
use tokio::task::JoinHandle;
use tracing::debug;

#[derive(Clone)]
pub struct OperationTracker {
    sink: Arc<dyn MetricsSink>,
}

impl OperationTracker {
    #[must_use]
    pub fn new(sink: Arc<dyn MetricsSink>) -> Self {
        Self { sink }
    }

    /// Record `event` in the background.
    pub fn track(&self, event: OperationEvent) -> JoinHandle<()> {
        let sink = Arc::clone(&self.sink);
        tokio::spawn(async move {
            let operation = event.operation;
            if let Err(e) = sink.record(event).await {
                debug!(%operation, error = %e, "operation tracking failed");
            }
        })
    }

    /// Recorded count for `operation`; `0` when the sink is unavailable.
    pub async fn count(&self, operation: Operation) -> u64 {
        self.sink
            .operation_count(operation)
            .await
            .unwrap_or_else(|e| {
                debug!(%operation, error = %e, "operation count unavailable");
                0
            })
    }
}
