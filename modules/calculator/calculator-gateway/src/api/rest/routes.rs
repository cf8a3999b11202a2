//! REST route registration for the calculator gateway

use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Extension, Router};

use crate::domain::Service;

use super::handlers;

pub fn register_routes(router: Router, service: Arc<Service>) -> Router {
    router
        .route("/calculate", post(handlers::handle_calculate))
        .route("/calcular", post(handlers::handle_calculate))
        .route("/health", get(handlers::handle_health))
        .layer(Extension(service))
}
