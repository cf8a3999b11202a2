//! Dashboard configuration.

use calc_runtime::HttpServerConfig;
use calculator_sdk::Operation;
use serde::{Deserialize, Serialize};

/// One polled service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceTarget {
    pub name: String,
    /// Base URL; `/health` and `/operations/count` are appended.
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    pub server: HttpServerConfig,
    pub poll_interval_ms: u64,
    /// Timeout of each health/count probe.
    pub probe_timeout_ms: u64,
    /// Samples kept per series.
    pub history_len: usize,
    /// Samples returned by `GET /api/metrics`.
    pub api_window: usize,
    pub services: Vec<ServiceTarget>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            server: HttpServerConfig::with_bind_addr("0.0.0.0:5005"),
            poll_interval_ms: 3000,
            probe_timeout_ms: 2000,
            history_len: 50,
            api_window: 20,
            services: Operation::ALL
                .iter()
                .map(|op| ServiceTarget {
                    name: op.noun().to_owned(),
                    url: format!("http://localhost:{}", op.default_port()),
                })
                .collect(),
        }
    }
}
