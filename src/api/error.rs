use thiserror::Error;

use super::transport::TransportError;

/// Error descriptor carried by a failed `ApiResponse`.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] TransportError),

    #[error("Unauthorized - session has been cleared")]
    Unauthorized,

    #[error("Internal server error")]
    Server,

    #[error("Empty response")]
    EmptyResponse,

    #[error("Invalid JSON response: {0}")]
    InvalidResponse(String),
}
