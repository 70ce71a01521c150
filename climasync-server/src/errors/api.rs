use super::{DetectionError, DeviceError, EnergyError};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Device error: {0}")]
    DeviceError(#[from] DeviceError),

    #[error("Energy error: {0}")]
    EnergyError(#[from] EnergyError),

    #[error("Detection error: {0}")]
    DetectionError(#[from] DetectionError),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}
