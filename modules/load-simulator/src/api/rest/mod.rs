//! REST API layer for the load simulator

pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;
