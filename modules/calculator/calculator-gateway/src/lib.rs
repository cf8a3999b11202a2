//! Calculator Gateway Module
//!
//! The HTTP entry point of the calculator mesh. Validates a client request,
//! resolves the operation service from a static routing table and relays a
//! single request/response pair.
//!
//! ## Architecture
//!
//! - `domain/routing.rs` - Immutable operation -> address table
//! - `domain/service.rs` - Outbound relay with a fixed timeout
//! - `api/rest/` - REST handlers, routes and error mapping
//! - `module.rs` - Module assembly and serve loop

mod module;
pub use module::CalculatorGatewayModule;

pub mod config;
pub use config::{GatewayConfig, ServiceEndpoints};

pub mod domain;
pub use domain::{GatewayError, RelayedResponse, RoutingTable, Service};

#[doc(hidden)]
pub mod api;
