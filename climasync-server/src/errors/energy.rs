use axum::http::StatusCode;

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum EnergyError {
    #[error("Power must be a positive number of watts, got {0}")]
    InvalidPower(f64),

    #[error("Price must be a positive amount per kWh, got {0}")]
    InvalidPrice(f64),
}

impl EnergyError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            EnergyError::InvalidPower(_) => StatusCode::BAD_REQUEST,
            EnergyError::InvalidPrice(_) => StatusCode::BAD_REQUEST,
        }
    }
}
