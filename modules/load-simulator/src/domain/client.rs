//! HTTP client sending calculations to the gateway.

use std::time::{Duration, Instant};

use serde_json::{Value, json};
use tracing::debug;
use url::Url;

use calculator_sdk::Operation;

use crate::domain::error::SimulatorError;

/// Result of one calculation request as seen by a virtual user.
#[derive(Debug, Clone)]
pub struct RequestOutcome {
    /// HTTP status; `None` on transport failure.
    pub status: Option<u16>,
    pub elapsed: Duration,
    pub body: Option<Value>,
    pub error: Option<String>,
}

impl RequestOutcome {
    /// Only `200` counts as success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == Some(200)
    }
}

pub struct TrafficClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl TrafficClient {
    /// # Errors
    /// Returns an error if `frontend_url` is not a valid URL or the HTTP
    /// client cannot be built.
    pub fn new(frontend_url: &str, timeout: Duration) -> Result<Self, SimulatorError> {
        let endpoint = Url::parse(&format!("{}/calculate", frontend_url.trim_end_matches('/')))
            .map_err(|e| SimulatorError::InvalidFrontendUrl {
                url: frontend_url.to_owned(),
                reason: e.to_string(),
            })?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SimulatorError::Client(e.to_string()))?;
        Ok(Self { client, endpoint })
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Send one calculation. Never fails: transport errors are reported in the
    /// outcome.
    pub async fn calculate(&self, operation: Operation, num1: f64, num2: f64) -> RequestOutcome {
        let started = Instant::now();
        let sent = self
            .client
            .post(self.endpoint.clone())
            .json(&json!({
                "num1": num1,
                "num2": num2,
                "operation": operation.as_str(),
            }))
            .send()
            .await;

        match sent {
            Ok(response) => {
                let status = response.status().as_u16();
                let body = response.json::<Value>().await.ok();
                RequestOutcome {
                    status: Some(status),
                    elapsed: started.elapsed(),
                    body,
                    error: None,
                }
            }
            Err(e) => {
                debug!(%operation, error = %e, "calculation request failed");
                RequestOutcome {
                    status: None,
                    elapsed: started.elapsed(),
                    body: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}
