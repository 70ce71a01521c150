use axum::http::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    #[error("Invalid floor: {0}")]
    InvalidLocation(String),

    #[error("Invalid device: {0}")]
    InvalidDevice(String),

    #[error("State must be 'ON' or 'OFF', got '{0}'")]
    InvalidState(String),
}

impl DeviceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            DeviceError::InvalidLocation(_) => StatusCode::NOT_FOUND,
            DeviceError::InvalidDevice(_) => StatusCode::BAD_REQUEST,
            DeviceError::InvalidState(_) => StatusCode::BAD_REQUEST,
        }
    }
}
