//! REST handlers for the calculator gateway

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde_json::Value;
use tracing::debug;

use calculator_sdk::{CalculationRequest, CalculatorError, ErrorBody, HealthResponse};

use crate::domain::Service;

/// Handler for `POST /calculate` (alias `POST /calcular`)
///
/// Validates the operation, then the operands, and relays the request. The
/// downstream status and JSON body are returned unchanged.
pub async fn handle_calculate(
    Extension(service): Extension<Arc<Service>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ErrorBody> {
    let Json(body) = payload.map_err(|rejection| {
        debug!(error = %rejection, "unreadable request body");
        CalculatorError::InvalidInput
    })?;

    let request = CalculationRequest::from_json(&body).inspect_err(|e| {
        debug!(error = %e, "calculation request rejected");
    })?;

    let relayed = service.relay(&request).await?;
    Ok((relayed.status, Json(relayed.body)).into_response())
}

/// Handler for `GET /health`
pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse::healthy("frontend"))
}
