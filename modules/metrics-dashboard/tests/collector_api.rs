#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Dashboard collector against mocked operation services

use std::time::Duration;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use httpmock::prelude::*;
use serde_json::{Value, json};
use tower::ServiceExt;

use metrics_dashboard::{DashboardConfig, MetricsDashboardModule, ServiceHealth, ServiceTarget};

fn unused_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

fn module(services: Vec<ServiceTarget>) -> MetricsDashboardModule {
    let config = DashboardConfig {
        poll_interval_ms: 20,
        probe_timeout_ms: 500,
        services,
        ..DashboardConfig::default()
    };
    MetricsDashboardModule::new(&config).unwrap()
}

#[tokio::test]
async fn collects_health_counts_and_error_rate() {
    let healthy = MockServer::start();
    let _mock = healthy.mock(|when, then| {
        when.method(GET).path("/health");
        then.status(200)
            .json_body(json!({"status": "healthy", "service": "addition"}));
    });
    let _mock = healthy.mock(|when, then| {
        when.method(GET).path("/operations/count");
        then.status(200)
            .json_body(json!({"operation": "addition", "count": 7}));
    });

    let broken = MockServer::start();
    let _mock = broken.mock(|when, then| {
        when.method(GET).path("/health");
        then.status(500).body("down");
    });
    let _mock = broken.mock(|when, then| {
        when.method(GET).path("/operations/count");
        then.status(200)
            .json_body(json!({"operation": "division", "count": 3}));
    });

    let m = module(vec![
        ServiceTarget {
            name: "addition".into(),
            url: healthy.base_url(),
        },
        ServiceTarget {
            name: "division".into(),
            url: broken.base_url(),
        },
        ServiceTarget {
            name: "exponentiation".into(),
            url: format!("http://127.0.0.1:{}", unused_port()),
        },
    ]);

    let collector = m.collector();
    collector.collect_once().await;
    let summary = collector.summary(20);

    assert_eq!(summary.service_health["addition"], ServiceHealth::Healthy);
    assert_eq!(summary.service_health["division"], ServiceHealth::Unhealthy);
    assert_eq!(
        summary.service_health["exponentiation"],
        ServiceHealth::Unreachable
    );
    assert_eq!(summary.operation_distribution["addition"], 7);
    assert_eq!(summary.operation_distribution["division"], 3);
    assert_eq!(summary.total_operations, 10);

    // 5 probes: 2 + 2 + 1 (unreachable skips the count); 2 failed.
    assert!((summary.error_rate - 40.0).abs() < f64::EPSILON);
    assert_eq!(summary.requests_per_second.len(), 1);
    assert!(summary.current_rps.abs() < f64::EPSILON);

    // Counts did not move between polls.
    collector.collect_once().await;
    let summary = collector.summary(20);
    assert_eq!(summary.requests_per_second.len(), 2);
    assert!(summary.current_rps.abs() < f64::EPSILON);
}

#[tokio::test]
async fn api_serves_summary_and_collector_runs_in_background() {
    let server = MockServer::start();
    let _mock = server.mock(|when, then| {
        when.method(GET).path("/health");
        then.status(200)
            .json_body(json!({"status": "healthy", "service": "multiplication"}));
    });
    let _mock = server.mock(|when, then| {
        when.method(GET).path("/operations/count");
        then.status(200)
            .json_body(json!({"operation": "multiplication", "count": 2}));
    });

    let m = module(vec![ServiceTarget {
        name: "multiplication".into(),
        url: server.base_url(),
    }]);
    let handle = m.start_collector();

    let router = m.router();
    let mut body = Value::Null;
    for _ in 0..100 {
        let req = Request::builder()
            .uri("/api/metrics")
            .body(Body::empty())
            .unwrap();
        let resp = router.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        body = serde_json::from_slice(&bytes).unwrap();
        if body["requests_per_second"].as_array().unwrap().len() >= 2 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    handle.stop().await;

    assert!(body["requests_per_second"].as_array().unwrap().len() >= 2);
    assert_eq!(body["service_health"]["multiplication"], "healthy");
    assert_eq!(body["operation_distribution"]["multiplication"], 2);
    assert_eq!(body["total_operations"], 2);
    assert_eq!(body["error_rate"], 0.0);
}

#[tokio::test]
async fn health_reports_service() {
    let m = module(Vec::new());
    let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let resp = m.router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({"status": "healthy", "service": "metrics_dashboard"}));
}
