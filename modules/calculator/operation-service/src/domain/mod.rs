//! Domain layer for the operation service
//!
//! Contains the arithmetic, its validation and best-effort tracking.

pub mod service;
pub mod tracking;

pub use service::Service;
pub use tracking::OperationTracker;
