//! Metrics dashboard module definition

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use tokio_util::sync::CancellationToken;

use calc_runtime::{HttpServerConfig, apply_middleware_stack};

use crate::api::rest::routes::register_routes;
use crate::config::DashboardConfig;
use crate::domain::{Collector, CollectorHandle};

pub struct MetricsDashboardModule {
    server: HttpServerConfig,
    poll_interval: Duration,
    api_window: usize,
    collector: Arc<Collector>,
}

impl MetricsDashboardModule {
    /// # Errors
    /// Returns an error if a service URL is invalid or the HTTP client cannot
    /// be built.
    pub fn new(config: &DashboardConfig) -> Result<Self> {
        tracing::info!(services = config.services.len(), "Initializing metrics dashboard");

        let collector = Collector::new(
            &config.services,
            Duration::from_millis(config.probe_timeout_ms),
            config.history_len,
        )
        .context("failed to build metrics collector")?;

        Ok(Self {
            server: config.server.clone(),
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            api_window: config.api_window,
            collector: Arc::new(collector),
        })
    }

    #[must_use]
    pub fn collector(&self) -> Arc<Collector> {
        Arc::clone(&self.collector)
    }

    #[must_use]
    pub fn server_config(&self) -> &HttpServerConfig {
        &self.server
    }

    /// Start the background collector.
    pub fn start_collector(&self) -> CollectorHandle {
        Arc::clone(&self.collector).start(self.poll_interval)
    }

    /// Routes with the common middleware stack applied.
    pub fn router(&self) -> Router {
        let router = register_routes(Router::new(), Arc::clone(&self.collector), self.api_window);
        apply_middleware_stack(router, &self.server, "metrics_dashboard")
    }

    /// Run the collector and serve until `cancel` fires.
    ///
    /// # Errors
    /// Returns an error if the listener cannot be bound or the server fails.
    pub async fn serve(self, cancel: CancellationToken) -> Result<()> {
        tracing::info!(bind_addr = %self.server.bind_addr, "starting metrics dashboard");
        let collector = self.start_collector();
        let served = calc_runtime::serve(self.router(), &self.server, cancel).await;
        collector.stop().await;
        served
    }
}
