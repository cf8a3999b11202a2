//! Gateway configuration.

use calc_runtime::HttpServerConfig;
use calculator_sdk::Operation;
use serde::{Deserialize, Serialize};

/// Base address of each operation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceEndpoints {
    pub add: String,
    pub subtract: String,
    pub multiply: String,
    pub divide: String,
    pub exponent: String,
}

impl Default for ServiceEndpoints {
    fn default() -> Self {
        let local = |op: Operation| format!("http://localhost:{}", op.default_port());
        Self {
            add: local(Operation::Add),
            subtract: local(Operation::Subtract),
            multiply: local(Operation::Multiply),
            divide: local(Operation::Divide),
            exponent: local(Operation::Exponent),
        }
    }
}

impl ServiceEndpoints {
    #[must_use]
    pub fn get(&self, operation: Operation) -> &str {
        match operation {
            Operation::Add => &self.add,
            Operation::Subtract => &self.subtract,
            Operation::Multiply => &self.multiply,
            Operation::Divide => &self.divide,
            Operation::Exponent => &self.exponent,
        }
    }

    fn slot_mut(&mut self, operation: Operation) -> &mut String {
        match operation {
            Operation::Add => &mut self.add,
            Operation::Subtract => &mut self.subtract,
            Operation::Multiply => &mut self.multiply,
            Operation::Divide => &mut self.divide,
            Operation::Exponent => &mut self.exponent,
        }
    }

    /// Apply per-operation overrides (`ADDITION_SERVICE`, ...) from the process
    /// environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply per-operation overrides from `lookup`. Empty values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        for op in Operation::ALL {
            if let Some(addr) = lookup(op.env_var()).filter(|v| !v.trim().is_empty()) {
                tracing::debug!(operation = %op, %addr, "service address overridden");
                *self.slot_mut(op) = addr.trim().to_owned();
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GatewayConfig {
    pub server: HttpServerConfig,
    /// Timeout of the single outbound call to an operation service.
    pub request_timeout_ms: u64,
    pub services: ServiceEndpoints,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            server: HttpServerConfig::with_bind_addr("0.0.0.0:5000"),
            request_timeout_ms: 5000,
            services: ServiceEndpoints::default(),
        }
    }
}
