//! Infrastructure adapters: operation store and Prometheus metrics.

pub mod metrics;
pub mod store;

pub use metrics::ServiceMetrics;
pub use store::InMemoryOperationStore;
