//! Domain layer for the metrics dashboard

pub mod collector;
pub mod error;
pub mod model;

pub use collector::{Collector, CollectorHandle};
pub use error::DashboardError;
pub use model::{DataPoint, MetricsSummary, ServiceHealth};
