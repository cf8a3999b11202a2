//! REST DTOs for the load simulator

use serde::{Deserialize, Serialize};

use crate::domain::MetricsSnapshot;

/// Body of `start` and `adjust`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UsersRequest {
    #[serde(alias = "usuarios")]
    pub users: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StartResponse {
    pub status: &'static str,
    pub users: u32,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StopResponse {
    pub status: &'static str,
    pub final_metrics: MetricsSnapshot,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdjustResponse {
    pub status: &'static str,
    pub users: u32,
}
