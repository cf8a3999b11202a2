//! REST route registration for the operation service

use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Extension, Router};

use crate::domain::{OperationTracker, Service};
use crate::infra::ServiceMetrics;

use super::handlers;

/// Register the service routes on `router`.
///
/// The calculation is reachable at `/calculate`, at `/<operation>` (e.g.
/// `/divide`) and at the legacy verb route if the operation has one.
pub fn register_routes(
    router: Router,
    service: Arc<Service>,
    tracker: OperationTracker,
    metrics: Arc<ServiceMetrics>,
) -> Router {
    let verb_path = format!("/{}", service.operation().as_str());

    let mut router = router
        .route("/calculate", post(handlers::handle_calculate))
        .route(&verb_path, post(handlers::handle_calculate));
    if let Some(legacy) = service.operation().legacy_verb() {
        router = router.route(&format!("/{legacy}"), post(handlers::handle_calculate));
    }

    router
        .route("/health", get(handlers::handle_health))
        .route("/operations/count", get(handlers::handle_operation_count))
        .route("/metrics", get(handlers::handle_metrics))
        .layer(Extension(service))
        .layer(Extension(tracker))
        .layer(Extension(metrics))
}
