//! In-memory `MetricsSink` keeping per-operation counters and the most
//! recent operations.

use std::collections::VecDeque;

use async_trait::async_trait;
use calculator_sdk::{MetricsSink, Operation, OperationEvent, SinkError};
use dashmap::DashMap;
use parking_lot::Mutex;

pub struct InMemoryOperationStore {
    counts: DashMap<Operation, u64>,
    recent: Mutex<VecDeque<OperationEvent>>,
    capacity: usize,
}

impl InMemoryOperationStore {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            counts: DashMap::new(),
            recent: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Recent operations, newest first.
    #[must_use]
    pub fn recent(&self) -> Vec<OperationEvent> {
        self.recent.lock().iter().cloned().collect()
    }
}

impl Default for InMemoryOperationStore {
    fn default() -> Self {
        Self::new(100)
    }
}

#[async_trait]
impl MetricsSink for InMemoryOperationStore {
    async fn record(&self, event: OperationEvent) -> Result<(), SinkError> {
        *self.counts.entry(event.operation).or_insert(0) += 1;

        let mut recent = self.recent.lock();
        recent.push_front(event);
        recent.truncate(self.capacity);
        Ok(())
    }

    async fn operation_count(&self, operation: Operation) -> Result<u64, SinkError> {
        Ok(self.counts.get(&operation).map_or(0, |c| *c))
    }
}
