//! Load simulator configuration.

use std::time::Duration;

use calc_runtime::HttpServerConfig;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::SimulatorError;

/// Largest accepted `operand_range`; wider spans overflow the sampler.
pub const MAX_OPERAND_RANGE: f64 = 1e300;

/// Pause between two requests of one virtual user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThinkTime {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl Default for ThinkTime {
    fn default() -> Self {
        Self {
            min_ms: 100,
            max_ms: 1000,
        }
    }
}

impl ThinkTime {
    /// Uniformly random pause within the configured bounds.
    #[must_use]
    pub fn sample(&self) -> Duration {
        let (lo, hi) = (self.min_ms.min(self.max_ms), self.min_ms.max(self.max_ms));
        Duration::from_millis(rand::rng().random_range(lo..=hi))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulatorConfig {
    pub server: HttpServerConfig,
    /// Base URL of the calculator gateway.
    pub frontend_url: String,
    pub request_timeout_ms: u64,
    pub think_time: ThinkTime,
    /// Users started when `POST /simulator/start` carries no count.
    pub default_users: u32,
    pub max_users: u32,
    /// How long `stop` waits for virtual users to finish.
    pub stop_grace_ms: u64,
    /// Operands are drawn from `[-operand_range, operand_range]`.
    pub operand_range: f64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            server: HttpServerConfig::with_bind_addr("0.0.0.0:5007"),
            frontend_url: "http://localhost:5000".to_owned(),
            request_timeout_ms: 10_000,
            think_time: ThinkTime::default(),
            default_users: 5,
            max_users: 500,
            stop_grace_ms: 5000,
            operand_range: 100.0,
        }
    }
}

impl SimulatorConfig {
    /// # Errors
    /// Returns `SimulatorError::InvalidOperandRange` unless `operand_range` is
    /// in `(0, MAX_OPERAND_RANGE]`.
    pub fn validate(&self) -> Result<(), SimulatorError> {
        let range = self.operand_range;
        if range.is_finite() && range > 0.0 && range <= MAX_OPERAND_RANGE {
            Ok(())
        } else {
            Err(SimulatorError::InvalidOperandRange)
        }
    }
}
