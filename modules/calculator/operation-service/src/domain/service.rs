//! Domain service for a single arithmetic operation.

use std::time::Duration;

use calculator_sdk::{CalculatorError, Operands, Operation};
use rand::Rng;
use tracing::debug;

use crate::config::JitterConfig;

/// Performs the one operation this service instance is configured for.
#[derive(Debug, Clone)]
pub struct Service {
    operation: Operation,
    jitter: Option<JitterConfig>,
}

impl Service {
    #[must_use]
    pub fn new(operation: Operation) -> Self {
        Self {
            operation,
            jitter: None,
        }
    }

    /// Enable a simulated processing delay.
    #[must_use]
    pub fn with_jitter(mut self, jitter: Option<JitterConfig>) -> Self {
        self.jitter = jitter;
        self
    }

    #[must_use]
    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// Apply the operation to `operands`.
    ///
    /// Division checks for a zero divisor before dividing. Exponentiation
    /// follows IEEE-754 `powf`, so e.g. `(-8) ^ 0.5` yields `NaN`.
    ///
    /// # Errors
    /// Returns `CalculatorError::DivisionByZero` when dividing by zero.
    pub fn compute(&self, operands: Operands) -> Result<f64, CalculatorError> {
        let Operands { a, b } = operands;
        debug!(operation = %self.operation, a, b, "performing operation");
        let result = match self.operation {
            Operation::Add => a + b,
            Operation::Subtract => a - b,
            Operation::Multiply => a * b,
            Operation::Divide => {
                if b == 0.0 {
                    return Err(CalculatorError::DivisionByZero);
                }
                a / b
            }
            Operation::Exponent => a.powf(b),
        };
        Ok(result)
    }

    /// Validate and compute, then wait out the configured jitter if any.
    ///
    /// # Errors
    /// Same as [`Service::compute`].
    pub async fn calculate(&self, operands: Operands) -> Result<f64, CalculatorError> {
        let result = self.compute(operands)?;
        if let Some(delay) = self.jitter_delay() {
            tokio::time::sleep(delay).await;
        }
        Ok(result)
    }

    fn jitter_delay(&self) -> Option<Duration> {
        let JitterConfig { min_ms, max_ms } = self.jitter?;
        let (lo, hi) = (min_ms.min(max_ms), min_ms.max(max_ms));
        if hi == 0 {
            return None;
        }
        let ms = rand::rng().random_range(lo..=hi);
        Some(Duration::from_millis(ms))
    }
}
