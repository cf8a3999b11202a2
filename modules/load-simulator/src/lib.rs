//! Load Simulator Module
//!
//! Spawns virtual users that send random calculations to the gateway and
//! aggregates success, failure and latency. Controlled over REST; a batch
//! load test with a JSON report is available for one-shot runs.

mod module;
pub use module::LoadSimulatorModule;

pub mod config;
pub use config::{MAX_OPERAND_RANGE, SimulatorConfig, ThinkTime};

pub mod domain;
pub use domain::{
    LoadMetrics, LoadTestPlan, LoadTestReport, MetricsSnapshot, Simulator, SimulatorError,
    SimulatorStatus, TrafficClient, run_load_test,
};

#[doc(hidden)]
pub mod api;
