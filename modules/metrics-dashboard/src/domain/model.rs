//! Dashboard data model.

use std::collections::{BTreeMap, VecDeque};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceHealth {
    /// Not probed yet.
    #[default]
    Unknown,
    Healthy,
    /// Answered `/health` with a non-200 status.
    Unhealthy,
    /// Transport failure.
    Unreachable,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub time: DateTime<Utc>,
    pub value: f64,
}

/// Payload of `GET /api/metrics`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub requests_per_second: Vec<DataPoint>,
    pub response_times: Vec<DataPoint>,
    pub error_rates: Vec<DataPoint>,
    pub operation_distribution: BTreeMap<String, u64>,
    pub service_health: BTreeMap<String, ServiceHealth>,
    pub current_rps: f64,
    pub avg_response_time: f64,
    pub error_rate: f64,
    pub total_operations: u64,
}

/// Mutable collector state behind the collector lock.
#[derive(Debug, Default)]
pub(crate) struct MetricsState {
    pub requests_per_second: VecDeque<DataPoint>,
    pub response_times: VecDeque<DataPoint>,
    pub error_rates: VecDeque<DataPoint>,
    pub operation_distribution: BTreeMap<String, u64>,
    pub service_health: BTreeMap<String, ServiceHealth>,
}

/// Round to one decimal place.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn push_bounded(series: &mut VecDeque<DataPoint>, point: DataPoint, cap: usize) {
    series.push_back(point);
    while series.len() > cap {
        series.pop_front();
    }
}

fn tail(series: &VecDeque<DataPoint>, n: usize) -> Vec<DataPoint> {
    series.iter().skip(series.len().saturating_sub(n)).copied().collect()
}

impl MetricsState {
    pub fn push_sample(&mut self, time: DateTime<Utc>, rps: f64, latency_ms: f64, error_rate: f64, cap: usize) {
        push_bounded(&mut self.requests_per_second, DataPoint { time, value: rps }, cap);
        push_bounded(&mut self.response_times, DataPoint { time, value: latency_ms }, cap);
        push_bounded(&mut self.error_rates, DataPoint { time, value: error_rate }, cap);
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn summary(&self, window: usize) -> MetricsSummary {
        let last = |s: &VecDeque<DataPoint>| s.back().map_or(0.0, |p| p.value);
        let avg_response_time = if self.response_times.is_empty() {
            0.0
        } else {
            self.response_times.iter().map(|p| p.value).sum::<f64>()
                / self.response_times.len() as f64
        };

        MetricsSummary {
            requests_per_second: tail(&self.requests_per_second, window),
            response_times: tail(&self.response_times, window),
            error_rates: tail(&self.error_rates, window),
            operation_distribution: self.operation_distribution.clone(),
            service_health: self.service_health.clone(),
            current_rps: round1(last(&self.requests_per_second)),
            avg_response_time: round1(avg_response_time),
            error_rate: round1(last(&self.error_rates)),
            total_operations: self.operation_distribution.values().sum(),
        }
    }
}
