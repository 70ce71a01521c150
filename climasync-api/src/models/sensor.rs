use std::collections::BTreeMap;

use serde::{de, Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;

use super::{DeviceKind, DeviceState, Location};

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorPushRequest {
    /// Temperature reading in Celsius
    pub temp: f64,
    /// Relative humidity percentage
    pub hum: f64,
}

/// Reading relayed by the Zigbee coordinator. Values arrive either as numbers
/// or as numeric strings depending on the coordinator firmware.
#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoordinatorReading {
    #[cfg_attr(feature = "docs", schema(value_type = Option<f64>))]
    #[serde(default)]
    pub temp: Option<serde_json::Value>,
    #[cfg_attr(feature = "docs", schema(value_type = Option<f64>))]
    #[serde(default)]
    pub hum: Option<serde_json::Value>,
}

impl CoordinatorReading {
    pub fn temperature(&self) -> Option<f64> {
        self.temp.as_ref().and_then(lenient_number)
    }

    pub fn humidity(&self) -> Option<f64> {
        self.hum.as_ref().and_then(lenient_number)
    }
}

pub(crate) fn lenient_number(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

/// Deserializes a number sent either as JSON number or as numeric text.
pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;

    lenient_number(&value)
        .ok_or_else(|| de::Error::custom(format!("expected a number, got {value}")))
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoordinatorUpdateRequest {
    #[serde(default)]
    pub floor1: Option<CoordinatorReading>,
    #[serde(default)]
    pub floor2: Option<CoordinatorReading>,
}

impl CoordinatorUpdateRequest {
    pub fn readings(&self) -> impl Iterator<Item = (Location, &CoordinatorReading)> {
        [
            (Location::Floor1, self.floor1.as_ref()),
            (Location::Floor2, self.floor2.as_ref()),
        ]
        .into_iter()
        .filter_map(|(location, reading)| reading.map(|r| (location, r)))
    }
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    /// Time the hub received the reading
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    /// Temperature in Celsius
    pub temperature: f64,
    /// Relative humidity percentage
    pub humidity: f64,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub floor: Location,
    /// Active day, `YYYY-MM-DD`
    pub date: String,
    pub data: Vec<SensorReading>,
    pub count: usize,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloorData {
    /// Latest temperature, 0 until the first push
    pub temp: f64,
    /// Latest humidity, 0 until the first push
    pub hum: f64,
    /// Commanded device states
    pub devices: BTreeMap<DeviceKind, DeviceState>,
    /// ON-time today in whole seconds
    pub runtime: BTreeMap<DeviceKind, u64>,
}

pub type DataResponse = BTreeMap<Location, FloorData>;

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceStat {
    pub total_seconds: u64,
    /// Duration such as `1h 2m 3s`
    pub formatted: String,
    pub current_state: DeviceState,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub date: String,
    pub floors: BTreeMap<Location, BTreeMap<DeviceKind, DeviceStat>>,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ClimateStats {
    /// Number of readings considered
    pub samples: usize,
    pub avg_temp: Option<f64>,
    pub min_temp: Option<f64>,
    pub max_temp: Option<f64>,
    pub avg_hum: Option<f64>,
    pub min_hum: Option<f64>,
    pub max_hum: Option<f64>,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsSummary {
    /// Mean temperature across floors with readings, one decimal
    pub avg_temp: f64,
    /// Mean humidity across floors with readings, one decimal
    pub avg_hum: f64,
    /// Site energy today, two decimals
    pub total_energy_kwh: f64,
    pub total_cost: i64,
    pub total_cost_formatted: String,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsDetailResponse {
    pub success: bool,
    pub summary: StatsSummary,
    /// Per-floor climate statistics over today's history
    pub climate: BTreeMap<Location, ClimateStats>,
    /// Most recent readings per floor, oldest first
    pub recent: BTreeMap<Location, Vec<SensorReading>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinator_reading_accepts_numeric_strings() {
        let body: CoordinatorUpdateRequest =
            serde_json::from_str(r#"{"floor1": {"temp": "24.5", "hum": 61}}"#).unwrap();

        let readings: Vec<_> = body.readings().collect();
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].0, Location::Floor1);
        assert_eq!(readings[0].1.temperature(), Some(24.5));
        assert_eq!(readings[0].1.humidity(), Some(61.0));
    }

    #[test]
    fn test_coordinator_reading_rejects_garbage() {
        let reading: CoordinatorReading =
            serde_json::from_str(r#"{"temp": "warm", "hum": null}"#).unwrap();

        assert_eq!(reading.temperature(), None);
        assert_eq!(reading.humidity(), None);
    }

    #[test]
    fn test_tariff_bodies_accept_numeric_text() {
        use crate::models::{UpdatePowerRequest, UpdatePriceRequest};

        let price: UpdatePriceRequest = serde_json::from_str(r#"{"price": "3000"}"#).unwrap();
        assert_eq!(price.price, 3000.0);

        let power: UpdatePowerRequest =
            serde_json::from_str(r#"{"device": "fan", "power": 42.5}"#).unwrap();
        assert_eq!(power.power, 42.5);

        assert!(serde_json::from_str::<UpdatePriceRequest>(r#"{"price": "cheap"}"#).is_err());
        assert!(serde_json::from_str::<UpdatePriceRequest>(r#"{"price": null}"#).is_err());
    }
}
