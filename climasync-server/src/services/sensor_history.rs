use std::collections::VecDeque;

use climasync_api::models::{ClimateStats, SensorReading};

pub const DEFAULT_HISTORY_CAPACITY: usize = 1000;

/// Latest climate values of one floor plus a bounded FIFO of today's readings.
#[derive(Debug, Clone)]
pub struct SensorHistory {
    readings: VecDeque<SensorReading>,
    capacity: usize,
    temperature: f64,
    humidity: f64,
}

impl SensorHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            readings: VecDeque::new(),
            capacity: capacity.max(1),
            temperature: 0.0,
            humidity: 0.0,
        }
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn humidity(&self) -> f64 {
        self.humidity
    }

    pub fn set_temperature(&mut self, value: f64) {
        self.temperature = value;
    }

    pub fn set_humidity(&mut self, value: f64) {
        self.humidity = value;
    }

    pub fn append(&mut self, reading: SensorReading) {
        self.temperature = reading.temperature;
        self.humidity = reading.humidity;

        self.readings.push_back(reading);
        while self.readings.len() > self.capacity {
            self.readings.pop_front();
        }
    }

    /// Drops the stored readings. Latest values stay for the live view.
    pub fn clear(&mut self) {
        self.readings.clear();
    }

    pub fn readings(&self) -> Vec<SensorReading> {
        self.readings.iter().copied().collect()
    }

    /// Up to `count` most recent readings, oldest first.
    pub fn recent(&self, count: usize) -> Vec<SensorReading> {
        let skip = self.readings.len().saturating_sub(count);
        self.readings.iter().skip(skip).copied().collect()
    }

    pub fn stats(&self) -> ClimateStats {
        if self.readings.is_empty() {
            return ClimateStats::default();
        }

        let samples = self.readings.len();
        let temps = self.readings.iter().map(|r| r.temperature);
        let hums = self.readings.iter().map(|r| r.humidity);

        ClimateStats {
            samples,
            avg_temp: Some(temps.clone().sum::<f64>() / samples as f64),
            min_temp: temps.clone().reduce(f64::min),
            max_temp: temps.reduce(f64::max),
            avg_hum: Some(hums.clone().sum::<f64>() / samples as f64),
            min_hum: hums.clone().reduce(f64::min),
            max_hum: hums.reduce(f64::max),
        }
    }
}

impl Default for SensorHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
