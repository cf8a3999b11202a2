//! Background polling of operation services.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use calculator_sdk::OperationCount;

use crate::config::ServiceTarget;
use crate::domain::error::DashboardError;
use crate::domain::model::{MetricsState, MetricsSummary, ServiceHealth};

#[derive(Debug, Clone)]
struct Target {
    name: String,
    health: Url,
    count: Url,
}

/// What one poll learned about one service.
#[derive(Debug)]
struct Probe {
    name: String,
    health: ServiceHealth,
    latency: Option<Duration>,
    count: Option<OperationCount>,
    attempts: u32,
    failures: u32,
}

pub struct Collector {
    client: reqwest::Client,
    targets: Vec<Target>,
    history_len: usize,
    state: RwLock<MetricsState>,
    /// Total operation count and time of the previous poll.
    last_total: Mutex<Option<(u64, Instant)>>,
}

impl Collector {
    /// # Errors
    /// Returns an error if a target URL is invalid or the HTTP client cannot
    /// be built.
    pub fn new(
        services: &[ServiceTarget],
        probe_timeout: Duration,
        history_len: usize,
    ) -> Result<Self, DashboardError> {
        let targets = services
            .iter()
            .map(resolve_target)
            .collect::<Result<Vec<_>, _>>()?;
        let client = reqwest::Client::builder()
            .timeout(probe_timeout)
            .build()
            .map_err(|e| DashboardError::Client(e.to_string()))?;

        let mut state = MetricsState::default();
        for target in &targets {
            state
                .service_health
                .insert(target.name.clone(), ServiceHealth::Unknown);
        }

        Ok(Self {
            client,
            targets,
            history_len,
            state: RwLock::new(state),
            last_total: Mutex::new(None),
        })
    }

    /// Latest `window` samples of every series plus the derived figures.
    pub fn summary(&self, window: usize) -> MetricsSummary {
        self.state.read().summary(window)
    }

    /// Probe every service once and append one sample to each series.
    #[allow(clippy::cast_precision_loss)]
    pub async fn collect_once(&self) {
        let mut probes = JoinSet::new();
        for target in self.targets.iter().cloned() {
            probes.spawn(probe(self.client.clone(), target));
        }

        let mut results = Vec::with_capacity(self.targets.len());
        while let Some(joined) = probes.join_next().await {
            match joined {
                Ok(p) => results.push(p),
                Err(e) => warn!(error = %e, "probe task failed"),
            }
        }

        let now = Instant::now();
        let mut attempts = 0u32;
        let mut failures = 0u32;
        let mut latencies = Vec::new();

        let mut state = self.state.write();
        for p in results {
            attempts += p.attempts;
            failures += p.failures;
            latencies.extend(p.latency);
            state.service_health.insert(p.name, p.health);
            if let Some(count) = p.count {
                state
                    .operation_distribution
                    .insert(count.operation, count.count);
            }
        }

        let total: u64 = state.operation_distribution.values().sum();
        let rps = {
            let mut last = self.last_total.lock();
            let rps = last.map_or(0.0, |(prev, at)| {
                requests_per_second(total.saturating_sub(prev), now.duration_since(at))
            });
            *last = Some((total, now));
            rps
        };
        let latency_ms = if latencies.is_empty() {
            0.0
        } else {
            latencies.iter().map(Duration::as_secs_f64).sum::<f64>() * 1000.0
                / latencies.len() as f64
        };
        let error_rate = if attempts == 0 {
            0.0
        } else {
            f64::from(failures) / f64::from(attempts) * 100.0
        };

        state.push_sample(Utc::now(), rps, latency_ms, error_rate, self.history_len);
        debug!(total, rps, latency_ms, error_rate, "metrics sample collected");
    }

    /// Poll every `interval` until the returned handle is stopped.
    pub fn start(self: Arc<Self>, interval: Duration) -> CollectorHandle {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        info!(interval_ms = interval.as_millis(), services = self.targets.len(), "collector started");

        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    () = token.cancelled() => break,
                    () = self.collect_once() => {}
                }
                tokio::select! {
                    () = token.cancelled() => break,
                    () = tokio::time::sleep(interval) => {}
                }
            }
            info!("collector stopped");
        });

        CollectorHandle { cancel, task }
    }
}

/// Running collector loop.
pub struct CollectorHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl CollectorHandle {
    pub async fn stop(self) {
        self.cancel.cancel();
        if let Err(e) = self.task.await {
            warn!(error = %e, "collector task ended abnormally");
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn requests_per_second(delta: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs <= 0.0 {
        return 0.0;
    }
    delta as f64 / secs
}

fn resolve_target(service: &ServiceTarget) -> Result<Target, DashboardError> {
    let invalid = |reason: String| DashboardError::InvalidTarget {
        name: service.name.clone(),
        url: service.url.clone(),
        reason,
    };
    let base = service.url.trim_end_matches('/');
    let health = Url::parse(&format!("{base}/health")).map_err(|e| invalid(e.to_string()))?;
    let count =
        Url::parse(&format!("{base}/operations/count")).map_err(|e| invalid(e.to_string()))?;
    Ok(Target {
        name: service.name.clone(),
        health,
        count,
    })
}

async fn probe(client: reqwest::Client, target: Target) -> Probe {
    let mut p = Probe {
        name: target.name,
        health: ServiceHealth::Unknown,
        latency: None,
        count: None,
        attempts: 1,
        failures: 0,
    };

    let started = Instant::now();
    match client.get(target.health).send().await {
        Ok(resp) => {
            p.latency = Some(started.elapsed());
            if resp.status().is_success() {
                p.health = ServiceHealth::Healthy;
            } else {
                p.health = ServiceHealth::Unhealthy;
                p.failures += 1;
            }
        }
        Err(e) => {
            debug!(service = %p.name, error = %e, "service unreachable");
            p.health = ServiceHealth::Unreachable;
            p.failures += 1;
            return p;
        }
    }

    p.attempts += 1;
    let counted = async {
        client
            .get(target.count)
            .send()
            .await?
            .error_for_status()?
            .json::<OperationCount>()
            .await
    };
    match counted.await {
        Ok(count) => p.count = Some(count),
        Err(e) => {
            debug!(service = %p.name, error = %e, "operation count unavailable");
            p.failures += 1;
        }
    }
    p
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn rate_is_delta_over_elapsed() {
        let rps = requests_per_second(30, Duration::from_secs(3));
        assert!((rps - 10.0).abs() < 1e-9);
        assert!(requests_per_second(5, Duration::ZERO).abs() < f64::EPSILON);
    }

    #[test]
    fn invalid_target_is_rejected() {
        let err = Collector::new(
            &[ServiceTarget {
                name: "addition".into(),
                url: "not a url".into(),
            }],
            Duration::from_secs(1),
            50,
        )
        .err()
        .unwrap();
        assert!(matches!(err, DashboardError::InvalidTarget { .. }));
    }

    #[test]
    fn targets_start_unknown() {
        let collector = Collector::new(
            &[ServiceTarget {
                name: "addition".into(),
                url: "http://localhost:5001/".into(),
            }],
            Duration::from_secs(1),
            50,
        )
        .unwrap();
        let summary = collector.summary(20);
        assert_eq!(summary.service_health["addition"], ServiceHealth::Unknown);
    }
}
