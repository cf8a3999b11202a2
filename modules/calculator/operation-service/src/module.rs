//! Operation service module definition
//!
//! Wires the domain service, operation tracking and metrics into an axum
//! router and serves it.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tokio_util::sync::CancellationToken;

use calc_runtime::{HttpServerConfig, apply_middleware_stack};
use calculator_sdk::{MetricsSink, NoopSink, Operation};

use crate::api::rest::routes::register_routes;
use crate::config::OperationServiceConfig;
use crate::domain::{OperationTracker, Service};
use crate::infra::{InMemoryOperationStore, ServiceMetrics};

pub struct OperationServiceModule {
    operation: Operation,
    server: HttpServerConfig,
    service: Arc<Service>,
    tracker: OperationTracker,
    metrics: Arc<ServiceMetrics>,
}

impl OperationServiceModule {
    /// Build the module with the sink selected by `config.track_operations`.
    ///
    /// # Errors
    /// Returns an error if the metrics registry cannot be created.
    pub fn new(config: &OperationServiceConfig) -> Result<Self> {
        let sink: Arc<dyn MetricsSink> = if config.track_operations {
            Arc::new(InMemoryOperationStore::new(config.recent_capacity))
        } else {
            Arc::new(NoopSink)
        };
        Self::with_sink(config, sink)
    }

    /// Build the module around an explicit sink.
    ///
    /// # Errors
    /// Returns an error if the metrics registry cannot be created.
    pub fn with_sink(config: &OperationServiceConfig, sink: Arc<dyn MetricsSink>) -> Result<Self> {
        let operation = config.operation;
        tracing::info!(%operation, "Initializing operation service");

        let metrics = ServiceMetrics::new(operation.noun())
            .context("failed to register operation metrics")?;

        Ok(Self {
            operation,
            server: config.effective_server(),
            service: Arc::new(Service::new(operation).with_jitter(config.jitter)),
            tracker: OperationTracker::new(sink),
            metrics: Arc::new(metrics),
        })
    }

    #[must_use]
    pub fn operation(&self) -> Operation {
        self.operation
    }

    #[must_use]
    pub fn server_config(&self) -> &HttpServerConfig {
        &self.server
    }

    /// Routes with the common middleware stack applied.
    pub fn router(&self) -> Router {
        let router = register_routes(
            Router::new(),
            Arc::clone(&self.service),
            self.tracker.clone(),
            Arc::clone(&self.metrics),
        );
        apply_middleware_stack(router, &self.server, self.operation.noun())
    }

    /// Serve until `cancel` fires.
    ///
    /// # Errors
    /// Returns an error if the listener cannot be bound or the server fails.
    pub async fn serve(self, cancel: CancellationToken) -> Result<()> {
        tracing::info!(
            operation = %self.operation,
            bind_addr = %self.server.bind_addr,
            "starting operation service"
        );
        calc_runtime::serve(self.router(), &self.server, cancel).await
    }
}
