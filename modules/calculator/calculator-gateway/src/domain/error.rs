use calculator_sdk::{CalculatorError, Operation};

/// Errors produced while handling one gateway request.
#[derive(thiserror::Error, Debug)]
pub enum GatewayError {
    /// Request rejected before any downstream call.
    #[error(transparent)]
    Calculator(#[from] CalculatorError),

    /// Transport failure: connection refused, timeout or DNS.
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// Downstream answered with a body that is not JSON.
    #[error("Invalid response from {operation} service: {detail}")]
    InvalidResponse {
        operation: Operation,
        detail: String,
    },

    #[error("Invalid address for {operation} service: '{url}' ({reason})")]
    InvalidServiceUrl {
        operation: Operation,
        url: String,
        reason: String,
    },

    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}
