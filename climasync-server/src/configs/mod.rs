mod settings;

pub use settings::{
    ClockSettings, DetectionSettings, DevicePower, EnergySettings, HistorySettings, Logger,
    Server, Settings, SettingsError,
};
