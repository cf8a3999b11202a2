//! Mapping of gateway errors to HTTP responses.

use http::StatusCode;

use calculator_sdk::ErrorBody;

use crate::domain::GatewayError;

impl From<GatewayError> for ErrorBody {
    fn from(e: GatewayError) -> Self {
        match e {
            GatewayError::Calculator(inner) => ErrorBody::from(inner),
            GatewayError::Unavailable(_) => {
                ErrorBody::new(StatusCode::SERVICE_UNAVAILABLE, e.to_string())
            }
            GatewayError::InvalidResponse { .. }
            | GatewayError::InvalidServiceUrl { .. }
            | GatewayError::Client(_) => {
                ErrorBody::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        }
    }
}
