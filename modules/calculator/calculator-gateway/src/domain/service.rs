//! Outbound relay to operation services.

use std::time::Duration;

use http::StatusCode;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use calculator_sdk::{CalculationRequest, UpstreamOperands};

use crate::domain::error::GatewayError;
use crate::domain::routing::RoutingTable;

/// Downstream status and JSON body, relayed verbatim to the client.
#[derive(Debug, Clone, PartialEq)]
pub struct RelayedResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Relays validated calculation requests to the owning operation service.
#[derive(Clone)]
pub struct Service {
    client: reqwest::Client,
    routes: RoutingTable,
}

impl Service {
    /// Build the relay with a client whose every call is bounded by `timeout`.
    ///
    /// # Errors
    /// Returns `GatewayError::Client` if the HTTP client cannot be built.
    pub fn new(routes: RoutingTable, timeout: Duration) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| GatewayError::Client(e.to_string()))?;
        Ok(Self { client, routes })
    }

    /// Issue exactly one call to the operation service. No retry.
    ///
    /// # Errors
    /// - `GatewayError::Unavailable` on transport failure (including timeout)
    /// - `GatewayError::InvalidResponse` if the downstream body is not JSON
    #[instrument(skip(self, request), fields(operation = %request.operation))]
    pub async fn relay(&self, request: &CalculationRequest) -> Result<RelayedResponse, GatewayError> {
        let operation = request.operation;
        let url = self
            .routes
            .target(operation)
            .ok_or_else(|| GatewayError::Unavailable(format!("no route for {operation}")))?;

        debug!(%url, "relaying calculation");
        let response = self
            .client
            .post(url.clone())
            .json(&UpstreamOperands::from(request))
            .send()
            .await
            .map_err(|e| {
                warn!(%url, error = %e, "operation service unreachable");
                GatewayError::Unavailable(e.to_string())
            })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| {
            warn!(%url, error = %e, "failed to read operation service response");
            GatewayError::Unavailable(e.to_string())
        })?;

        let body = serde_json::from_slice::<Value>(&bytes).map_err(|e| {
            warn!(%url, %status, error = %e, "operation service returned a non-JSON body");
            GatewayError::InvalidResponse {
                operation,
                detail: e.to_string(),
            }
        })?;

        debug!(%status, "operation service answered");
        Ok(RelayedResponse { status, body })
    }
}
