//! Operation service configuration.

use calc_runtime::HttpServerConfig;
use calculator_sdk::Operation;
use serde::{Deserialize, Serialize};

/// Simulated processing delay, picked uniformly from `[min_ms, max_ms]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JitterConfig {
    pub min_ms: u64,
    pub max_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OperationServiceConfig {
    /// Operation served by this instance.
    pub operation: Operation,
    /// Listener settings. Defaults to `0.0.0.0:<operation default port>`.
    pub server: Option<HttpServerConfig>,
    /// Disabled when absent.
    pub jitter: Option<JitterConfig>,
    /// Record successful calculations in the in-memory operation store.
    pub track_operations: bool,
    /// How many recent operations the store keeps.
    pub recent_capacity: usize,
}

impl Default for OperationServiceConfig {
    fn default() -> Self {
        Self {
            operation: Operation::Add,
            server: None,
            jitter: None,
            track_operations: true,
            recent_capacity: 100,
        }
    }
}

impl OperationServiceConfig {
    /// Listener settings, falling back to the operation's default port.
    #[must_use]
    pub fn effective_server(&self) -> HttpServerConfig {
        self.server.clone().unwrap_or_else(|| {
            HttpServerConfig::with_bind_addr(format!("0.0.0.0:{}", self.operation.default_port()))
        })
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn default_port_follows_operation() {
        let cfg = OperationServiceConfig {
            operation: Operation::Divide,
            ..OperationServiceConfig::default()
        };
        assert_eq!(cfg.effective_server().bind_addr, "0.0.0.0:5004");
    }

    #[test]
    fn explicit_server_wins() {
        let cfg = OperationServiceConfig {
            server: Some(HttpServerConfig::with_bind_addr("127.0.0.1:9000")),
            ..OperationServiceConfig::default()
        };
        assert_eq!(cfg.effective_server().bind_addr, "127.0.0.1:9000");
    }

    #[test]
    fn jitter_disabled_by_default() {
        let cfg: OperationServiceConfig =
            serde_json::from_str(r#"{"operation":"multiply"}"#).unwrap();
        assert_eq!(cfg.operation, Operation::Multiply);
        assert!(cfg.jitter.is_none());
        assert!(cfg.track_operations);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let res: Result<OperationServiceConfig, _> =
            serde_json::from_str(r#"{"operation":"add","colour":"blue"}"#);
        assert!(res.is_err());
    }
}
