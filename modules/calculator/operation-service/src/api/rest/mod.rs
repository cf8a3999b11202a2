//! REST API layer for the operation service

pub mod handlers;
pub mod routes;
