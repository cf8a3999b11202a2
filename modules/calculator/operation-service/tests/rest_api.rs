#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Integration tests for the operation service REST surface

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use calculator_sdk::{MetricsSink, Operation, OperationEvent, SinkError};
use operation_service::{OperationServiceConfig, OperationServiceModule};

fn module(operation: Operation) -> OperationServiceModule {
    let config = OperationServiceConfig {
        operation,
        ..OperationServiceConfig::default()
    };
    OperationServiceModule::new(&config).unwrap()
}

async fn post(module: &OperationServiceModule, path: &str, body: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json")
        .body(Body::from(body.to_owned()))
        .unwrap();
    let resp = module.router().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn get(module: &OperationServiceModule, path: &str) -> (StatusCode, String) {
    let req = Request::builder().uri(path).body(Body::empty()).unwrap();
    let resp = module.router().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn add_returns_result_and_noun() {
    let m = module(Operation::Add);
    let (status, body) = post(&m, "/calculate", r#"{"num1": 2, "num2": 3}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"result": 5.0, "operation": "addition"}));
}

#[tokio::test]
async fn verb_route_is_equivalent_to_calculate() {
    let m = module(Operation::Subtract);
    let (status, body) = post(&m, "/subtract", r#"{"num1": 10, "num2": 4}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"result": 6.0, "operation": "subtraction"}));
}

#[tokio::test]
async fn legacy_verb_route_is_served() {
    let m = module(Operation::Divide);
    let (status, body) = post(&m, "/dividir", r#"{"a": 9, "b": 3}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"result": 3.0, "operation": "division"}));
}

#[tokio::test]
async fn other_verbs_are_not_routed() {
    let m = module(Operation::Add);
    let req = Request::builder()
        .method("POST")
        .uri("/divide")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"num1": 1, "num2": 1}"#))
        .unwrap();
    let resp = m.router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn division_by_zero_is_rejected() {
    let m = module(Operation::Divide);
    let (status, body) = post(&m, "/calculate", r#"{"num1": 1, "num2": 0}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Division by zero is not allowed"}));
}

#[tokio::test]
async fn exponent_uses_float_power() {
    let m = module(Operation::Exponent);
    let (status, body) = post(&m, "/calculate", r#"{"num1": 2, "num2": -1}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"result": 0.5, "operation": "exponentiation"}));
}

#[tokio::test]
async fn bad_input_is_rejected() {
    let m = module(Operation::Multiply);
    for body in [
        r#"{"num1": 2}"#,
        r#"{"num1": "abc", "num2": 1}"#,
        r#"{"num1": null, "num2": 1}"#,
        "not json",
        "",
    ] {
        let (status, resp) = post(&m, "/calculate", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {body:?}");
        assert_eq!(resp, json!({"error": "Invalid input"}));
    }
}

#[tokio::test]
async fn numeric_strings_and_short_keys_are_accepted() {
    let m = module(Operation::Multiply);
    let (status, body) = post(&m, "/calculate", r#"{"a": "1.5", "b": 4}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], json!(6.0));
}

#[tokio::test]
async fn non_finite_results_are_never_null() {
    let m = module(Operation::Multiply);
    let (status, body) = post(&m, "/calculate", r#"{"num1": 1e308, "num2": 10}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"result": "Infinity", "operation": "multiplication"}));

    let m = module(Operation::Exponent);
    let (status, body) = post(&m, "/calculate", r#"{"num1": -8, "num2": 0.5}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"result": "NaN", "operation": "exponentiation"}));
}

#[tokio::test]
async fn health_reports_noun() {
    let m = module(Operation::Divide);
    let (status, body) = get(&m, "/health").await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body, json!({"status": "healthy", "service": "division"}));
}

#[tokio::test]
async fn successful_calculations_are_counted() {
    let m = module(Operation::Add);
    post(&m, "/calculate", r#"{"num1": 1, "num2": 1}"#).await;
    post(&m, "/add", r#"{"num1": 2, "num2": 2}"#).await;
    post(&m, "/add", r#"{"num1": 2}"#).await;

    let mut count = Value::Null;
    for _ in 0..50 {
        let (_, body) = get(&m, "/operations/count").await;
        let body: Value = serde_json::from_str(&body).unwrap();
        count = body["count"].clone();
        if count == json!(2) {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(count, json!(2));
}

#[tokio::test]
async fn metrics_are_exposed_in_text_format() {
    let m = module(Operation::Divide);
    post(&m, "/calculate", r#"{"num1": 4, "num2": 2}"#).await;
    post(&m, "/calculate", r#"{"num1": 4, "num2": 0}"#).await;

    let (status, text) = get(&m, "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert!(text.contains("division_requests_total 2"));
    assert!(text.contains("division_errors_total 1"));
}

struct FailingSink {
    attempts: AtomicUsize,
}

#[async_trait]
impl MetricsSink for FailingSink {
    async fn record(&self, _event: OperationEvent) -> Result<(), SinkError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(SinkError::Unavailable("store offline".into()))
    }

    async fn operation_count(&self, _operation: Operation) -> Result<u64, SinkError> {
        Err(SinkError::Unavailable("store offline".into()))
    }
}

#[tokio::test]
async fn sink_failure_does_not_affect_response() {
    let sink = Arc::new(FailingSink {
        attempts: AtomicUsize::new(0),
    });
    let config = OperationServiceConfig {
        operation: Operation::Add,
        ..OperationServiceConfig::default()
    };
    let m = OperationServiceModule::with_sink(&config, sink.clone()).unwrap();

    let (status, body) = post(&m, "/calculate", r#"{"num1": 2, "num2": 3}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], json!(5.0));

    let (status, body) = get(&m, "/operations/count").await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body, json!({"operation": "addition", "count": 0}));

    for _ in 0..50 {
        if sink.attempts.load(Ordering::SeqCst) == 1 {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("sink was never called");
}

#[tokio::test]
async fn tracking_can_be_disabled() {
    let config = OperationServiceConfig {
        operation: Operation::Add,
        track_operations: false,
        ..OperationServiceConfig::default()
    };
    let m = OperationServiceModule::new(&config).unwrap();
    post(&m, "/calculate", r#"{"num1": 2, "num2": 3}"#).await;
    tokio::time::sleep(Duration::from_millis(20)).await;

    let (_, body) = get(&m, "/operations/count").await;
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["count"], json!(0));
}
