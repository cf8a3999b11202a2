//! REST route registration for the load simulator

use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Extension, Router};

use crate::domain::Simulator;

use super::handlers::{self, DefaultUsers};

/// Control routes, also reachable under the legacy `/simulador/*` paths.
pub fn register_routes(router: Router, simulator: Arc<Simulator>, default_users: u32) -> Router {
    router
        .route("/simulator/start", post(handlers::handle_start))
        .route("/simulator/stop", post(handlers::handle_stop))
        .route("/simulator/status", get(handlers::handle_status))
        .route("/simulator/adjust", post(handlers::handle_adjust))
        .route("/simulador/iniciar", post(handlers::handle_start))
        .route("/simulador/detener", post(handlers::handle_stop))
        .route("/simulador/estado", get(handlers::handle_status))
        .route("/simulador/ajustar", post(handlers::handle_adjust))
        .route("/health", get(handlers::handle_health))
        .layer(Extension(simulator))
        .layer(Extension(DefaultUsers(default_users)))
}
