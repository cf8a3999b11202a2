//! Metrics Dashboard Module
//!
//! A background collector polls every operation service for health and
//! operation counts and keeps short time series derived from what it sees.
//! `GET /api/metrics` serves the latest window.

mod module;
pub use module::MetricsDashboardModule;

pub mod config;
pub use config::{DashboardConfig, ServiceTarget};

pub mod domain;
pub use domain::{Collector, CollectorHandle, DashboardError, DataPoint, MetricsSummary, ServiceHealth};

#[doc(hidden)]
pub mod api;
