//! Operation Service Module
//!
//! A stateless REST service computing exactly one binary arithmetic operation.
//! Five instances (add, subtract, multiply, divide, exponent) form the backend
//! of the calculator gateway.
//!
//! ## Architecture
//!
//! - `domain/service.rs` - Core arithmetic and validation
//! - `domain/tracking.rs` - Fire-and-forget operation tracking
//! - `infra/` - In-memory operation store and Prometheus metrics
//! - `api/rest/` - REST handlers and route registration
//! - `module.rs` - Module assembly and serve loop

// === MODULE DEFINITION ===
mod module;
pub use module::OperationServiceModule;

pub mod config;
pub use config::{JitterConfig, OperationServiceConfig};

// === PUBLIC EXPORTS ===
pub mod domain;
pub use domain::{OperationTracker, Service};

pub mod infra;

// === INTERNAL MODULES ===
#[doc(hidden)]
pub mod api;
