//! Virtual-user traffic generation with a start/stop lifecycle.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use calculator_sdk::Operation;

use crate::config::{MAX_OPERAND_RANGE, ThinkTime};
use crate::domain::client::TrafficClient;
use crate::domain::error::SimulatorError;
use crate::domain::metrics::{LoadMetrics, MetricsSnapshot};

/// Random operation with operands drawn from `[-range, range]`, the range
/// clamped to `MAX_OPERAND_RANGE`.
///
/// With `avoid_zero_divisor`, divisors closer to zero than `0.1` become `1.0`.
pub(crate) fn random_calculation(range: f64, avoid_zero_divisor: bool) -> (Operation, f64, f64) {
    let range = if range.is_finite() {
        range.abs().min(MAX_OPERAND_RANGE)
    } else {
        0.0
    };
    let mut rng = rand::rng();
    let operation = Operation::ALL[rng.random_range(0..Operation::ALL.len())];
    let a = rng.random_range(-range..=range);
    let mut b = rng.random_range(-range..=range);
    if avoid_zero_divisor && operation == Operation::Divide && b.abs() < 0.1 {
        b = 1.0;
    }
    (operation, a, b)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulatorStatus {
    pub active: bool,
    /// Virtual users of the current run.
    pub users: Option<u32>,
    pub metrics: MetricsSnapshot,
}

#[derive(Debug, Clone, Copy)]
struct UserSettings {
    think_time: ThinkTime,
    operand_range: f64,
}

struct Run {
    cancel: CancellationToken,
    tasks: JoinSet<()>,
    users: u32,
}

pub struct Simulator {
    client: Arc<TrafficClient>,
    metrics: Arc<LoadMetrics>,
    settings: UserSettings,
    max_users: u32,
    stop_grace: Duration,
    run: Mutex<Option<Run>>,
}

impl Simulator {
    #[must_use]
    pub fn new(
        client: Arc<TrafficClient>,
        think_time: ThinkTime,
        operand_range: f64,
        max_users: u32,
        stop_grace: Duration,
    ) -> Self {
        Self {
            client,
            metrics: Arc::new(LoadMetrics::default()),
            settings: UserSettings {
                think_time,
                operand_range,
            },
            max_users,
            stop_grace,
            run: Mutex::new(None),
        }
    }

    /// Start `users` virtual users. Metrics of a previous run are cleared.
    ///
    /// # Errors
    /// `SimulatorError::AlreadyRunning` if a run is active,
    /// `SimulatorError::InvalidUsers` if `users` is out of range.
    pub async fn start(&self, users: u32) -> Result<u32, SimulatorError> {
        self.check_users(users)?;
        let mut run = self.run.lock().await;
        if run.is_some() {
            return Err(SimulatorError::AlreadyRunning);
        }
        self.metrics.reset();
        *run = Some(self.spawn_users(users));
        info!(users, target = %self.client.endpoint(), "simulation started");
        Ok(users)
    }

    /// Stop the current run, if any, and return the final metrics.
    pub async fn stop(&self) -> MetricsSnapshot {
        let current = self.run.lock().await.take();
        if let Some(run) = current {
            self.shutdown(run).await;
            info!("simulation stopped");
        }
        self.metrics.snapshot()
    }

    /// Restart the active run with a new number of users, keeping its metrics.
    ///
    /// # Errors
    /// `SimulatorError::NotRunning` if no run is active,
    /// `SimulatorError::InvalidUsers` if `users` is out of range.
    pub async fn adjust(&self, users: u32) -> Result<u32, SimulatorError> {
        self.check_users(users)?;
        let mut run = self.run.lock().await;
        let current = run.take().ok_or(SimulatorError::NotRunning)?;
        self.shutdown(current).await;
        *run = Some(self.spawn_users(users));
        info!(users, "simulation load adjusted");
        Ok(users)
    }

    pub async fn status(&self) -> SimulatorStatus {
        let run = self.run.lock().await;
        SimulatorStatus {
            active: run.is_some(),
            users: run.as_ref().map(|r| r.users),
            metrics: self.metrics.snapshot(),
        }
    }

    fn check_users(&self, users: u32) -> Result<(), SimulatorError> {
        if users == 0 || users > self.max_users {
            return Err(SimulatorError::InvalidUsers {
                max: self.max_users,
            });
        }
        Ok(())
    }

    fn spawn_users(&self, users: u32) -> Run {
        let cancel = CancellationToken::new();
        let mut tasks = JoinSet::new();
        for id in 0..users {
            tasks.spawn(virtual_user(
                id,
                Arc::clone(&self.client),
                Arc::clone(&self.metrics),
                self.settings,
                cancel.child_token(),
            ));
        }
        Run {
            cancel,
            tasks,
            users,
        }
    }

    async fn shutdown(&self, mut run: Run) {
        run.cancel.cancel();
        let drained = tokio::time::timeout(self.stop_grace, async {
            while run.tasks.join_next().await.is_some() {}
        })
        .await;
        if drained.is_err() {
            warn!(
                grace_ms = self.stop_grace.as_millis(),
                "virtual users did not stop in time; aborting"
            );
            run.tasks.abort_all();
        }
    }
}

async fn virtual_user(
    id: u32,
    client: Arc<TrafficClient>,
    metrics: Arc<LoadMetrics>,
    settings: UserSettings,
    cancel: CancellationToken,
) {
    debug!(user = id, "virtual user started");
    while !cancel.is_cancelled() {
        let (operation, a, b) = random_calculation(settings.operand_range, false);

        let outcome = tokio::select! {
            () = cancel.cancelled() => break,
            outcome = client.calculate(operation, a, b) => outcome,
        };
        metrics.record(outcome.is_success(), outcome.elapsed);

        let pause = settings.think_time.sample();
        tokio::select! {
            () = cancel.cancelled() => break,
            () = tokio::time::sleep(pause) => {}
        }
    }
    debug!(user = id, "virtual user stopped");
}
