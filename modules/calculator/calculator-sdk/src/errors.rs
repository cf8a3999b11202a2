//! Request error taxonomy and the JSON error body.

use http::StatusCode;
use serde::{Deserialize, Serialize};

/// Errors a calculation request can fail with before reaching the network.
///
/// Display strings are part of the wire contract.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalculatorError {
    /// Missing, non-numeric or non-finite operand.
    #[error("Invalid input")]
    InvalidInput,

    /// Operation name outside the known set.
    #[error("Invalid operation")]
    InvalidOperation,

    #[error("Division by zero is not allowed")]
    DivisionByZero,
}

impl CalculatorError {
    #[must_use]
    pub const fn status(self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }
}

/// `{"error": "..."}` response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[must_use]
pub struct ErrorBody {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: String,
}

impl ErrorBody {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
        }
    }
}

impl From<CalculatorError> for ErrorBody {
    fn from(e: CalculatorError) -> Self {
        Self::new(e.status(), e.to_string())
    }
}

/// Axum integration: make `ErrorBody` directly usable as a response
#[cfg(feature = "axum")]
impl axum::response::IntoResponse for ErrorBody {
    fn into_response(self) -> axum::response::Response {
        let status = self.status;
        let mut resp = axum::Json(self).into_response();
        *resp.status_mut() = status;
        resp
    }
}
