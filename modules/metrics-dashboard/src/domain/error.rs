#[derive(thiserror::Error, Debug)]
pub enum DashboardError {
    #[error("Invalid URL for service '{name}': '{url}' ({reason})")]
    InvalidTarget {
        name: String,
        url: String,
        reason: String,
    },

    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}
