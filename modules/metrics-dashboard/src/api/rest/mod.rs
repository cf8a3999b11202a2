//! REST API layer for the metrics dashboard

pub mod handlers;
pub mod routes;
