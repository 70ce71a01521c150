use std::collections::BTreeMap;
use std::path::PathBuf;
use std::{env, io};

use climasync_api::models::DeviceKind;
use config::builder::{ConfigBuilder, DefaultState};
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

const DEFAULT_SETTINGS: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../",
    "configs/default.toml"
));

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to resolve settings path: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to load settings: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid setting: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Logger {
    pub level: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClockSettings {
    /// Offset applied to the wall clock before taking the calendar day
    pub utc_offset_hours: i8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DevicePower {
    pub led: f64,
    pub fan: f64,
    pub fog: f64,
    pub heater: f64,
}

impl DevicePower {
    pub fn to_map(&self) -> BTreeMap<DeviceKind, f64> {
        BTreeMap::from([
            (DeviceKind::Lighting, self.led),
            (DeviceKind::Ventilation, self.fan),
            (DeviceKind::Fogger, self.fog),
            (DeviceKind::Heater, self.heater),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergySettings {
    pub price_per_kwh: f64,
    pub currency: String,
    pub device_power: DevicePower,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySettings {
    pub capacity: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionSettings {
    pub capacity: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub server: Server,
    pub logger: Logger,
    pub clock: ClockSettings,
    pub energy: EnergySettings,
    pub history: HistorySettings,
    pub detection: DetectionSettings,
}

impl Settings {
    /// Layers the compiled-in defaults, then `configs/<RUN_MODE>.toml` when
    /// present, then `CLIMASYNC_`-prefixed environment variables such as
    /// `CLIMASYNC_ENERGY__PRICE_PER_KWH`.
    pub fn new() -> Result<Self, SettingsError> {
        let run_mode = env::var("RUN_MODE").unwrap_or("development".into());
        let run_mode_file = Self::normalize_path(&format!("configs/{run_mode}"))?;

        Self::build(
            Self::defaults()
                .add_source(File::with_name(&run_mode_file.to_string_lossy()).required(false))
                .add_source(Self::environment()),
        )
    }

    /// Merges a TOML fragment over the defaults.
    pub fn from_toml(overlay: &str) -> Result<Self, SettingsError> {
        Self::build(Self::defaults().add_source(File::from_str(overlay, FileFormat::Toml)))
    }

    fn defaults() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(DEFAULT_SETTINGS, FileFormat::Toml))
    }

    fn environment() -> Environment {
        Environment::with_prefix("CLIMASYNC")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, SettingsError> {
        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;

        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if !(-23..=23).contains(&self.clock.utc_offset_hours) {
            return Err(SettingsError::Invalid(format!(
                "clock.utc_offset_hours must be within -23..=23, got {}",
                self.clock.utc_offset_hours
            )));
        }

        if !is_positive(self.energy.price_per_kwh) {
            return Err(SettingsError::Invalid(
                "energy.price_per_kwh must be positive".into(),
            ));
        }

        if let Some((kind, _)) = self
            .energy
            .device_power
            .to_map()
            .into_iter()
            .find(|(_, watts)| !is_positive(*watts))
        {
            return Err(SettingsError::Invalid(format!(
                "energy.device_power.{kind} must be positive"
            )));
        }

        if self.history.capacity == 0 || self.detection.capacity == 0 {
            return Err(SettingsError::Invalid(
                "history and detection capacities must be non-zero".into(),
            ));
        }

        Ok(())
    }

    fn normalize_path(path: &str) -> io::Result<PathBuf> {
        let path_buf = PathBuf::from(path);

        Ok(if path_buf.is_absolute() {
            path_buf
        } else {
            env::current_dir()?.join(path_buf)
        })
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: Server {
                host: "0.0.0.0".into(),
                port: 3000,
            },
            logger: Logger {
                level: "info".into(),
            },
            clock: ClockSettings { utc_offset_hours: 0 },
            energy: EnergySettings {
                price_per_kwh: 2500.0,
                currency: "VND".into(),
                device_power: DevicePower {
                    led: 20.0,
                    fan: 50.0,
                    fog: 100.0,
                    heater: 150.0,
                },
            },
            history: HistorySettings { capacity: 1000 },
            detection: DetectionSettings { capacity: 50 },
        }
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
