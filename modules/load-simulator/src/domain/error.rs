#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SimulatorError {
    #[error("Simulation is already running")]
    AlreadyRunning,

    #[error("Simulation is not running")]
    NotRunning,

    #[error("Number of users must be between 1 and {max}")]
    InvalidUsers { max: u32 },

    #[error("operand_range must be a finite number in (0, 1e300]")]
    InvalidOperandRange,

    #[error("Invalid frontend URL '{url}': {reason}")]
    InvalidFrontendUrl { url: String, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}
