mod detection_handle;
mod device_handle;
mod energy_handle;
mod sensor_handle;

pub use detection_handle::*;
pub use device_handle::*;
pub use energy_handle::*;
pub use sensor_handle::*;

use climasync_api::models::{DeviceKind, Location};

use crate::errors::DeviceError;

pub(crate) fn parse_location(floor: String) -> Result<Location, DeviceError> {
    floor.parse().map_err(|_| DeviceError::InvalidLocation(floor))
}

pub(crate) fn parse_device(device: String) -> Result<DeviceKind, DeviceError> {
    device.parse().map_err(|_| DeviceError::InvalidDevice(device))
}
