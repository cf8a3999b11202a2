//! Load simulator module definition

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use tokio_util::sync::CancellationToken;

use calc_runtime::{HttpServerConfig, apply_middleware_stack};

use crate::api::rest::routes::register_routes;
use crate::config::SimulatorConfig;
use crate::domain::{Simulator, TrafficClient};

pub struct LoadSimulatorModule {
    server: HttpServerConfig,
    default_users: u32,
    simulator: Arc<Simulator>,
}

impl LoadSimulatorModule {
    /// # Errors
    /// Returns an error if the operand range or the frontend URL is invalid,
    /// or the HTTP client cannot be built.
    pub fn new(config: &SimulatorConfig) -> Result<Self> {
        tracing::info!(frontend = %config.frontend_url, "Initializing load simulator");
        config.validate().context("invalid simulator configuration")?;

        let client = TrafficClient::new(
            &config.frontend_url,
            Duration::from_millis(config.request_timeout_ms),
        )
        .context("failed to build traffic client")?;

        let simulator = Simulator::new(
            Arc::new(client),
            config.think_time,
            config.operand_range,
            config.max_users,
            Duration::from_millis(config.stop_grace_ms),
        );

        Ok(Self {
            server: config.server.clone(),
            default_users: config.default_users,
            simulator: Arc::new(simulator),
        })
    }

    #[must_use]
    pub fn simulator(&self) -> Arc<Simulator> {
        Arc::clone(&self.simulator)
    }

    #[must_use]
    pub fn server_config(&self) -> &HttpServerConfig {
        &self.server
    }

    /// Routes with the common middleware stack applied.
    pub fn router(&self) -> Router {
        let router = register_routes(Router::new(), Arc::clone(&self.simulator), self.default_users);
        apply_middleware_stack(router, &self.server, "load_simulator")
    }

    /// Serve until `cancel` fires, then stop any active run.
    ///
    /// # Errors
    /// Returns an error if the listener cannot be bound or the server fails.
    pub async fn serve(self, cancel: CancellationToken) -> Result<()> {
        tracing::info!(bind_addr = %self.server.bind_addr, "starting load simulator");
        let served = calc_runtime::serve(self.router(), &self.server, cancel).await;
        let final_metrics = self.simulator.stop().await;
        tracing::info!(
            total = final_metrics.total_requests,
            failed = final_metrics.failed_requests,
            "load simulator stopped"
        );
        served
    }
}
