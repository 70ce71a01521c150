use std::collections::BTreeSet;

use rand::Rng;
use rand_distr::{Distribution, Normal};
use time::OffsetDateTime;

// Per-tick influence of each actuator on the floor climate
const HEATER_TEMP_STEP: f64 = 0.4;
const FAN_TEMP_STEP: f64 = -0.3;
const FAN_HUMIDITY_STEP: f64 = -0.5;
const FOG_HUMIDITY_STEP: f64 = 1.5;

/// Fraction of the UTC day elapsed at `at`, in `0..1`.
pub fn day_fraction(at: OffsetDateTime) -> f64 {
    let seconds = u32::from(at.hour()) * 3600 + u32::from(at.minute()) * 60 + u32::from(at.second());
    seconds as f64 / 86400.0
}

pub fn simulated_temperature(day_fraction: f64) -> f64 {
    let radians = day_fraction * 2.0 * std::f64::consts::PI;

    // coolest before dawn, warmest mid afternoon
    22.0 - (radians + std::f64::consts::PI / 4.0).cos() * 6.0
}

pub fn simulated_humidity(day_fraction: f64) -> f64 {
    let radians = day_fraction * 2.0 * std::f64::consts::PI;

    if (0.3..=0.7).contains(&day_fraction) {
        ((radians.sin().max(0.0) * 15.0) + 65.0).round()
    } else {
        ((radians.cos().max(0.0) * 20.0) + 70.0).round()
    }
}

/// Names of the actuators switched on in a reply such as
/// `LED_ON FAN_OFF FOG_OFF HEATER_OFF`.
pub fn parse_command_line(line: &str) -> BTreeSet<String> {
    line.split_whitespace()
        .filter_map(|token| token.strip_suffix("_ON"))
        .map(str::to_string)
        .collect()
}

/// One simulated floor node with the drift its actuators have caused.
#[derive(Debug, Clone)]
pub struct FloorNode {
    pub floor: String,
    active: BTreeSet<String>,
    temperature_drift: f64,
    humidity_drift: f64,
}

impl FloorNode {
    pub fn new(floor: impl Into<String>) -> Self {
        Self {
            floor: floor.into(),
            active: BTreeSet::new(),
            temperature_drift: 0.0,
            humidity_drift: 0.0,
        }
    }

    pub fn is_on(&self, actuator: &str) -> bool {
        self.active.contains(actuator)
    }

    pub fn apply(&mut self, active: BTreeSet<String>) {
        self.active = active;
    }

    /// Advances the actuator drift by one tick. Drift decays so the floor
    /// relaxes back to the daily curve once everything is off.
    pub fn step(&mut self) {
        self.temperature_drift *= 0.9;
        self.humidity_drift *= 0.9;

        if self.is_on("HEATER") {
            self.temperature_drift += HEATER_TEMP_STEP;
        }
        if self.is_on("FAN") {
            self.temperature_drift += FAN_TEMP_STEP;
            self.humidity_drift += FAN_HUMIDITY_STEP;
        }
        if self.is_on("FOG") {
            self.humidity_drift += FOG_HUMIDITY_STEP;
        }
    }

    /// Temperature and humidity for the given moment, rounded to one decimal.
    pub fn sample<R: Rng + ?Sized>(&self, day_fraction: f64, noise: &Normal<f64>, rng: &mut R) -> (f64, f64) {
        let temperature = simulated_temperature(day_fraction) + self.temperature_drift + noise.sample(rng);
        let humidity = (simulated_humidity(day_fraction) + self.humidity_drift + noise.sample(rng)).clamp(0.0, 100.0);

        ((temperature * 10.0).round() / 10.0, (humidity * 10.0).round() / 10.0)
    }
}
