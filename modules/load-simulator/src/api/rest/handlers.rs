//! REST handlers for the load simulator

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::{Extension, Json};
use http::StatusCode;

use calculator_sdk::{ErrorBody, HealthResponse};

use crate::domain::{Simulator, SimulatorStatus};

use super::dto::{AdjustResponse, StartResponse, StopResponse, UsersRequest};

/// Users requested in the body. A request without a JSON body asks for the
/// default.
fn requested_users(payload: Result<Json<UsersRequest>, JsonRejection>) -> Result<Option<u32>, ErrorBody> {
    match payload {
        Ok(Json(req)) => Ok(req.users),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(None),
        Err(rejection) => Err(ErrorBody::new(StatusCode::BAD_REQUEST, rejection.body_text())),
    }
}

/// Handler for `POST /simulator/start`
pub async fn handle_start(
    Extension(simulator): Extension<Arc<Simulator>>,
    Extension(default_users): Extension<DefaultUsers>,
    payload: Result<Json<UsersRequest>, JsonRejection>,
) -> Result<Json<StartResponse>, ErrorBody> {
    let users = requested_users(payload)?.unwrap_or(default_users.0);
    let users = simulator.start(users).await?;
    Ok(Json(StartResponse {
        status: "started",
        users,
        message: format!("Simulation started with {users} virtual users"),
    }))
}

/// Handler for `POST /simulator/stop`
pub async fn handle_stop(Extension(simulator): Extension<Arc<Simulator>>) -> Json<StopResponse> {
    Json(StopResponse {
        status: "stopped",
        final_metrics: simulator.stop().await,
    })
}

/// Handler for `GET /simulator/status`
pub async fn handle_status(
    Extension(simulator): Extension<Arc<Simulator>>,
) -> Json<SimulatorStatus> {
    Json(simulator.status().await)
}

/// Handler for `POST /simulator/adjust`
pub async fn handle_adjust(
    Extension(simulator): Extension<Arc<Simulator>>,
    Extension(default_users): Extension<DefaultUsers>,
    payload: Result<Json<UsersRequest>, JsonRejection>,
) -> Result<Json<AdjustResponse>, ErrorBody> {
    let users = requested_users(payload)?.unwrap_or(default_users.0);
    let users = simulator.adjust(users).await?;
    Ok(Json(AdjustResponse {
        status: "adjusted",
        users,
    }))
}

/// Handler for `GET /health`
pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse::healthy("load_simulator"))
}

/// User count applied when a request does not name one.
#[derive(Debug, Clone, Copy)]
pub struct DefaultUsers(pub u32);
