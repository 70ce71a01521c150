use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{DeviceKind, Location};

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePowerRequest {
    /// Device wire name (`led`, `fan`, `fog`, `heater`)
    pub device: String,
    /// New rated draw in watts, as a number or numeric text
    #[serde(deserialize_with = "super::sensor::lenient_f64")]
    pub power: f64,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePowerResponse {
    pub success: bool,
    pub device: DeviceKind,
    pub power: f64,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePriceRequest {
    /// Price per kWh in the configured currency, as a number or numeric text
    #[serde(deserialize_with = "super::sensor::lenient_f64")]
    pub price: f64,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePriceResponse {
    pub success: bool,
    pub price: f64,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceEnergy {
    /// ON-time today in whole seconds
    pub runtime_seconds: u64,
    /// ON-time in hours, two decimals
    pub runtime_hours: f64,
    pub runtime_formatted: String,
    /// Rated draw in watts
    pub power_w: f64,
    /// Consumption in kWh, three decimals
    pub energy_kwh: f64,
    /// Cost rounded to whole currency units, display only
    pub cost: i64,
    pub cost_formatted: String,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyTotal {
    pub energy_kwh: f64,
    pub cost: i64,
    pub cost_formatted: String,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorEnergy {
    pub devices: BTreeMap<DeviceKind, DeviceEnergy>,
    pub total: EnergyTotal,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorEnergyReport {
    pub daily: FloorEnergy,
    /// Daily figures extrapolated over a 30-day month
    pub monthly: EnergyTotal,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteEnergy {
    pub daily: EnergyTotal,
    pub monthly: EnergyTotal,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyReport {
    /// Active day, `YYYY-MM-DD`
    pub date: String,
    pub price_per_kwh: f64,
    pub currency: String,
    pub device_power: BTreeMap<DeviceKind, f64>,
    pub floors: BTreeMap<Location, FloorEnergyReport>,
    pub total: SiteEnergy,
}
