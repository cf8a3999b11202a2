//! REST handlers for the operation service

use std::sync::Arc;
use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde_json::Value;
use tracing::debug;

use calculator_sdk::{
    CalculationResult, CalculatorError, ErrorBody, HealthResponse, OperationCount, OperationEvent,
    Operands,
};

use crate::domain::{OperationTracker, Service};
use crate::infra::ServiceMetrics;

/// Handler for `POST /calculate` and `POST /<operation>`.
///
/// Accepts `{"num1": .., "num2": ..}` (or `a`/`b`). Malformed JSON is reported
/// as `Invalid input` rather than axum's default rejection.
pub async fn handle_calculate(
    Extension(service): Extension<Arc<Service>>,
    Extension(tracker): Extension<OperationTracker>,
    Extension(metrics): Extension<Arc<ServiceMetrics>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let started = Instant::now();
    metrics.requests.inc();

    let outcome = evaluate(&service, payload).await;
    metrics.latency.observe(started.elapsed().as_secs_f64());

    match outcome {
        Ok((operands, result)) => {
            tracker.track(OperationEvent::now(
                service.operation(),
                operands.a,
                operands.b,
                result,
            ));
            Json(CalculationResult::success(service.operation(), result)).into_response()
        }
        Err(e) => {
            metrics.errors.inc();
            debug!(operation = %service.operation(), error = %e, "calculation rejected");
            ErrorBody::from(e).into_response()
        }
    }
}

async fn evaluate(
    service: &Service,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(Operands, f64), CalculatorError> {
    let Json(body) = payload.map_err(|rejection| {
        debug!(error = %rejection, "unreadable request body");
        CalculatorError::InvalidInput
    })?;
    let operands = Operands::from_json(&body)?;
    let result = service.calculate(operands).await?;
    Ok((operands, result))
}

/// Handler for `GET /health`
pub async fn handle_health(Extension(service): Extension<Arc<Service>>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(service.operation().noun()))
}

/// Handler for `GET /operations/count`
pub async fn handle_operation_count(
    Extension(service): Extension<Arc<Service>>,
    Extension(tracker): Extension<OperationTracker>,
) -> Json<OperationCount> {
    let operation = service.operation();
    Json(OperationCount {
        operation: operation.noun().to_owned(),
        count: tracker.count(operation).await,
    })
}

/// Handler for `GET /metrics`
pub async fn handle_metrics(Extension(metrics): Extension<Arc<ServiceMetrics>>) -> Response {
    match metrics.render() {
        Ok(text) => (
            [(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)],
            text,
        )
            .into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "failed to render metrics");
            ErrorBody::new(StatusCode::INTERNAL_SERVER_ERROR, "Failed to render metrics")
                .into_response()
        }
    }
}
