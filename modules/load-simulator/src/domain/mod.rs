//! Domain layer for the load simulator

pub mod client;
pub mod error;
pub mod metrics;
pub mod simulator;

pub use client::{RequestOutcome, TrafficClient};
pub use error::SimulatorError;
pub use load_test::{LoadTestPlan, LoadTestReport, RequestRecord, run_load_test};
pub use metrics::{LoadMetrics, MetricsSnapshot};
pub use simulator::{Simulator, SimulatorStatus};
