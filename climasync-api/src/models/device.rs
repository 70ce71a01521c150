use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Returned when a path segment or body field does not name a known value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseModelError {
    pub expected: &'static str,
    pub value: String,
}

impl fmt::Display for ParseModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a valid {}", self.value, self.expected)
    }
}

impl std::error::Error for ParseModelError {}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    /// Ground floor zone
    Floor1,
    /// Upper floor zone
    Floor2,
}

impl Location {
    pub const ALL: [Location; 2] = [Location::Floor1, Location::Floor2];

    pub fn as_str(&self) -> &'static str {
        match self {
            Location::Floor1 => "floor1",
            Location::Floor2 => "floor2",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Location::Floor1 => 0,
            Location::Floor2 => 1,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Location {
    type Err = ParseModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "floor1" => Ok(Location::Floor1),
            "floor2" => Ok(Location::Floor2),
            _ => Err(ParseModelError {
                expected: "location",
                value: s.to_string(),
            }),
        }
    }
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DeviceKind {
    /// Grow light strip
    #[serde(rename = "led")]
    Lighting,
    /// Circulation fan
    #[serde(rename = "fan")]
    Ventilation,
    /// Fog humidifier
    #[serde(rename = "fog")]
    Fogger,
    /// Space heater
    #[serde(rename = "heater")]
    Heater,
}

impl DeviceKind {
    pub const ALL: [DeviceKind; 4] = [
        DeviceKind::Lighting,
        DeviceKind::Ventilation,
        DeviceKind::Fogger,
        DeviceKind::Heater,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceKind::Lighting => "led",
            DeviceKind::Ventilation => "fan",
            DeviceKind::Fogger => "fog",
            DeviceKind::Heater => "heater",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            DeviceKind::Lighting => 0,
            DeviceKind::Ventilation => 1,
            DeviceKind::Fogger => 2,
            DeviceKind::Heater => 3,
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceKind {
    type Err = ParseModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "led" => Ok(DeviceKind::Lighting),
            "fan" => Ok(DeviceKind::Ventilation),
            "fog" => Ok(DeviceKind::Fogger),
            "heater" => Ok(DeviceKind::Heater),
            _ => Err(ParseModelError {
                expected: "device",
                value: s.to_string(),
            }),
        }
    }
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DeviceState {
    On,
    #[default]
    Off,
}

impl DeviceState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceState::On => "ON",
            DeviceState::Off => "OFF",
        }
    }

    pub fn is_on(&self) -> bool {
        matches!(self, DeviceState::On)
    }
}

impl fmt::Display for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceState {
    type Err = ParseModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ON" => Ok(DeviceState::On),
            "OFF" => Ok(DeviceState::Off),
            _ => Err(ParseModelError {
                expected: "device state",
                value: s.to_string(),
            }),
        }
    }
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceControlRequest {
    /// Requested state, `ON` or `OFF` in any case
    #[serde(default)]
    pub state: String,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceControlResponse {
    /// Floor the device belongs to
    pub floor: Location,
    /// Device that was switched
    pub device: DeviceKind,
    /// State now in effect
    pub state: DeviceState,
    pub success: bool,
}

/// Commanded state of every device, keyed by floor.
pub type DeviceCommands = BTreeMap<Location, BTreeMap<DeviceKind, DeviceState>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("FLOOR2".parse::<Location>().unwrap(), Location::Floor2);
        assert_eq!("Heater".parse::<DeviceKind>().unwrap(), DeviceKind::Heater);
        assert_eq!(" on ".parse::<DeviceState>().unwrap(), DeviceState::On);
    }

    #[test]
    fn test_parse_rejects_unknown_values() {
        let err = "floor3".parse::<Location>().unwrap_err();
        assert_eq!(err.to_string(), "'floor3' is not a valid location");
        assert!("pump".parse::<DeviceKind>().is_err());
        assert!("".parse::<DeviceState>().is_err());
    }

    #[test]
    fn test_wire_names_match_firmware() {
        let json = serde_json::to_string(&DeviceKind::Fogger).unwrap();
        assert_eq!(json, "\"fog\"");

        let mut commands = DeviceCommands::new();
        commands
            .entry(Location::Floor1)
            .or_default()
            .insert(DeviceKind::Lighting, DeviceState::On);
        let json = serde_json::to_value(&commands).unwrap();
        assert_eq!(json["floor1"]["led"], "ON");
    }
}
