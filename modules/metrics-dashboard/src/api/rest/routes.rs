//! REST route registration for the metrics dashboard

use std::sync::Arc;

use axum::routing::get;
use axum::{Extension, Router};

use crate::domain::Collector;

use super::handlers::{self, ApiWindow};

pub fn register_routes(router: Router, collector: Arc<Collector>, api_window: usize) -> Router {
    router
        .route("/api/metrics", get(handlers::handle_metrics))
        .route("/health", get(handlers::handle_health))
        .layer(Extension(collector))
        .layer(Extension(ApiWindow(api_window)))
}
