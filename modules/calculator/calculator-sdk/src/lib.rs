//! Calculator SDK
//!
//! Shared contract between the calculator gateway, the operation services and
//! the external collaborators (load simulator, metrics dashboard).
//!
//! - `models` - `Operation`, `CalculationRequest`, `Operands` and wire DTOs
//! - `errors` - request error taxonomy and the `{"error": ...}` body
//! - `api` - `MetricsSink` contract for best-effort operation tracking

pub mod api;
pub mod errors;
pub mod models;

pub use api::{MetricsSink, NoopSink, OperationEvent, SinkError};
pub use errors::{CalculatorError, ErrorBody};
pub use models::{
    CalculationRequest, CalculationResult, HealthResponse, Operands, Operation, OperationCount,
    UpstreamOperands,
};
