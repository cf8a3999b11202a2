//! Immutable mapping from operation to operation service endpoint.

use std::collections::HashMap;

use calculator_sdk::Operation;
use url::Url;

use crate::config::ServiceEndpoints;
use crate::domain::error::GatewayError;

/// Calculation endpoint of every operation service, resolved once at startup.
#[derive(Debug, Clone)]
pub struct RoutingTable {
    targets: HashMap<Operation, Url>,
}

impl RoutingTable {
    /// Resolve `{base}/calculate` for every operation.
    ///
    /// # Errors
    /// Returns `GatewayError::InvalidServiceUrl` if an address is not an
    /// absolute `http`/`https` URL.
    pub fn from_endpoints(endpoints: &ServiceEndpoints) -> Result<Self, GatewayError> {
        let mut targets = HashMap::with_capacity(Operation::ALL.len());
        for op in Operation::ALL {
            targets.insert(op, calculate_url(op, endpoints.get(op))?);
        }
        Ok(Self { targets })
    }

    #[must_use]
    pub fn target(&self, operation: Operation) -> Option<&Url> {
        self.targets.get(&operation)
    }
}

fn calculate_url(operation: Operation, base: &str) -> Result<Url, GatewayError> {
    let invalid = |reason: String| GatewayError::InvalidServiceUrl {
        operation,
        url: base.to_owned(),
        reason,
    };

    let url = Url::parse(&format!("{}/calculate", base.trim_end_matches('/')))
        .map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") || url.host().is_none() {
        return Err(invalid("expected an http(s) URL with a host".to_owned()));
    }
    Ok(url)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn default_table_targets_calculate_endpoints() {
        let table = RoutingTable::from_endpoints(&ServiceEndpoints::default()).unwrap();
        assert_eq!(
            table.target(Operation::Add).unwrap().as_str(),
            "http://localhost:5001/calculate"
        );
        assert_eq!(
            table.target(Operation::Exponent).unwrap().as_str(),
            "http://localhost:5006/calculate"
        );
    }

    #[test]
    fn trailing_slash_and_path_prefix_are_kept_clean() {
        let endpoints = ServiceEndpoints {
            divide: "http://division-service:5004/".to_owned(),
            multiply: "https://mesh.local/mul".to_owned(),
            ..ServiceEndpoints::default()
        };
        let table = RoutingTable::from_endpoints(&endpoints).unwrap();
        assert_eq!(
            table.target(Operation::Divide).unwrap().as_str(),
            "http://division-service:5004/calculate"
        );
        assert_eq!(
            table.target(Operation::Multiply).unwrap().as_str(),
            "https://mesh.local/mul/calculate"
        );
    }

    #[test]
    fn rejects_addresses_without_http_scheme() {
        for bad in ["localhost:5001", "ftp://host:21", "not a url"] {
            let endpoints = ServiceEndpoints {
                subtract: bad.to_owned(),
                ..ServiceEndpoints::default()
            };
            let err = RoutingTable::from_endpoints(&endpoints).unwrap_err();
            assert!(
                matches!(err, GatewayError::InvalidServiceUrl { operation: Operation::Subtract, .. }),
                "{bad} must be rejected, got {err}"
            );
        }
    }
}
