//! REST handlers for the metrics dashboard

use std::sync::Arc;

use axum::{Extension, Json};

use calculator_sdk::HealthResponse;

use crate::domain::{Collector, MetricsSummary};

/// Samples returned per series.
#[derive(Debug, Clone, Copy)]
pub struct ApiWindow(pub usize);

/// Handler for `GET /api/metrics`
pub async fn handle_metrics(
    Extension(collector): Extension<Arc<Collector>>,
    Extension(window): Extension<ApiWindow>,
) -> Json<MetricsSummary> {
    Json(collector.summary(window.0))
}

/// Handler for `GET /health`
pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse::healthy("metrics_dashboard"))
}
