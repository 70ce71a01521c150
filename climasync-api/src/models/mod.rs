mod detection;
mod device;
mod energy;
mod sensor;

pub use detection::*;
pub use device::*;
pub use energy::*;
pub use sensor::*;

use serde::{Deserialize, Serialize};

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckResponse {
    /// Whether the operation was applied
    pub success: bool,
    /// Human readable outcome
    pub message: String,
}

impl AckResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
