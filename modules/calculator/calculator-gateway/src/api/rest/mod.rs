//! REST API layer for the calculator gateway

pub mod error;
pub mod handlers;
pub mod routes;
