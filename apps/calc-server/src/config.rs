//! Process-wide configuration: one section per service role.

use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use calc_runtime::{ConfigError, LoggingConfig, load_layered};
use calculator_gateway::GatewayConfig;
use load_simulator::SimulatorConfig;
use metrics_dashboard::DashboardConfig;
use operation_service::OperationServiceConfig;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub frontend: GatewayConfig,
    pub operation: OperationServiceConfig,
    pub simulator: SimulatorConfig,
    pub dashboard: DashboardConfig,
}

impl AppConfig {
    /// Load defaults -> YAML (if provided) -> env (`CALC__*`), then apply the
    /// per-operation service address variables (`ADDITION_SERVICE`, ...).
    ///
    /// # Errors
    /// Returns an error if the file is missing or the merged sources are invalid.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config: Self = load_layered(path)?;
        config.frontend.services.apply_env_overrides();
        Ok(config)
    }
}
