use http::StatusCode;

use calculator_sdk::ErrorBody;

use crate::domain::SimulatorError;

impl From<SimulatorError> for ErrorBody {
    fn from(e: SimulatorError) -> Self {
        let status = match e {
            SimulatorError::AlreadyRunning
            | SimulatorError::NotRunning
            | SimulatorError::InvalidUsers { .. } => StatusCode::BAD_REQUEST,
            SimulatorError::InvalidOperandRange
            | SimulatorError::InvalidFrontendUrl { .. }
            | SimulatorError::Client(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        ErrorBody::new(status, e.to_string())
    }
}
