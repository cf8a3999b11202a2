//! Domain layer for the calculator gateway
//!
//! Routing table resolution and the outbound relay.

pub mod error;
pub mod routing;
pub mod service;

pub use error::GatewayError;
pub use routing::RoutingTable;
pub use service::{RelayedResponse, Service};
