//! Calculator gateway module definition

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use tokio_util::sync::CancellationToken;

use calc_runtime::{HttpServerConfig, apply_middleware_stack};

use crate::api::rest::routes::register_routes;
use crate::config::GatewayConfig;
use crate::domain::{RoutingTable, Service};

pub struct CalculatorGatewayModule {
    server: HttpServerConfig,
    service: Arc<Service>,
}

impl CalculatorGatewayModule {
    /// Build the routing table and the outbound client from `config`.
    ///
    /// Per-operation environment overrides must already be applied; the table
    /// is not re-read afterwards.
    ///
    /// # Errors
    /// Returns an error if a service address is invalid or the HTTP client
    /// cannot be built.
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        tracing::info!("Initializing calculator gateway");

        let routes = RoutingTable::from_endpoints(&config.services)
            .context("failed to build routing table")?;
        let service = Service::new(routes, Duration::from_millis(config.request_timeout_ms))
            .context("failed to build outbound client")?;

        for op in calculator_sdk::Operation::ALL {
            tracing::info!(operation = %op, address = %config.services.get(op), "route registered");
        }

        Ok(Self {
            server: config.server.clone(),
            service: Arc::new(service),
        })
    }

    #[must_use]
    pub fn server_config(&self) -> &HttpServerConfig {
        &self.server
    }

    /// Routes with the common middleware stack applied.
    pub fn router(&self) -> Router {
        let router = register_routes(Router::new(), Arc::clone(&self.service));
        apply_middleware_stack(router, &self.server, "frontend")
    }

    /// Serve until `cancel` fires.
    ///
    /// # Errors
    /// Returns an error if the listener cannot be bound or the server fails.
    pub async fn serve(self, cancel: CancellationToken) -> Result<()> {
        tracing::info!(bind_addr = %self.server.bind_addr, "starting calculator gateway");
        calc_runtime::serve(self.router(), &self.server, cancel).await
    }
}
