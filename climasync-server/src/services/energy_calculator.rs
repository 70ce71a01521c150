//! Energy and cost accounting derived from device runtimes.
//!
//! All sums are carried at full precision. Rounding is applied only when a
//! figure is rendered, so floor and site totals never drift from the sum of
//! their parts by more than the final rounding step.

use std::collections::BTreeMap;
use std::ops::{Add, AddAssign, Mul};

use climasync_api::models::{
    DeviceEnergy, DeviceKind, EnergyReport, EnergyTotal, FloorEnergy, FloorEnergyReport,
    Location, SiteEnergy,
};

use super::clock::DayKey;
use super::tariff::TariffConfig;

/// Monthly figures are the daily figure times this, not calendar aware.
pub const PROJECTION_DAYS: f64 = 30.0;

const SECONDS_PER_HOUR: f64 = 3600.0;
const WATTS_PER_KILOWATT: f64 = 1000.0;

pub fn energy_kwh(runtime_seconds: u64, power_watts: f64) -> f64 {
    power_watts * (runtime_seconds as f64 / SECONDS_PER_HOUR) / WATTS_PER_KILOWATT
}

pub fn cost(energy_kwh: f64, price_per_kwh: f64) -> f64 {
    energy_kwh * price_per_kwh
}

pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{hours}h {minutes}m {secs}s")
    } else if minutes > 0 {
        format!("{minutes}m {secs}s")
    } else {
        format!("{secs}s")
    }
}

/// Whole currency units with `.` as the thousands separator.
pub fn format_currency(amount: f64, currency: &str) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if rounded < 0 { "-" } else { "" };
    format!("{sign}{grouped} {currency}")
}

/// Unrounded energy and cost.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Consumption {
    pub energy_kwh: f64,
    pub cost: f64,
}

impl Add for Consumption {
    type Output = Consumption;

    fn add(self, rhs: Consumption) -> Consumption {
        Consumption {
            energy_kwh: self.energy_kwh + rhs.energy_kwh,
            cost: self.cost + rhs.cost,
        }
    }
}

impl AddAssign for Consumption {
    fn add_assign(&mut self, rhs: Consumption) {
        *self = *self + rhs;
    }
}

impl Mul<f64> for Consumption {
    type Output = Consumption;

    fn mul(self, factor: f64) -> Consumption {
        Consumption {
            energy_kwh: self.energy_kwh * factor,
            cost: self.cost * factor,
        }
    }
}

pub struct EnergyCalculator<'a> {
    tariff: &'a TariffConfig,
    currency: &'a str,
}

impl<'a> EnergyCalculator<'a> {
    pub fn new(tariff: &'a TariffConfig, currency: &'a str) -> Self {
        Self { tariff, currency }
    }

    pub fn device_consumption(&self, kind: DeviceKind, runtime_seconds: u64) -> Consumption {
        let energy = energy_kwh(runtime_seconds, self.tariff.power(kind));

        Consumption {
            energy_kwh: energy,
            cost: cost(energy, self.tariff.price_per_kwh()),
        }
    }

    pub fn floor_consumption(&self, runtimes: &BTreeMap<DeviceKind, u64>) -> Consumption {
        runtimes
            .iter()
            .map(|(kind, seconds)| self.device_consumption(*kind, *seconds))
            .fold(Consumption::default(), Add::add)
    }

    pub fn site_consumption(&self, runtimes: &BTreeMap<Location, BTreeMap<DeviceKind, u64>>) -> Consumption {
        runtimes
            .values()
            .map(|floor| self.floor_consumption(floor))
            .fold(Consumption::default(), Add::add)
    }

    pub fn device(&self, kind: DeviceKind, runtime_seconds: u64) -> DeviceEnergy {
        let consumption = self.device_consumption(kind, runtime_seconds);

        DeviceEnergy {
            runtime_seconds,
            runtime_hours: round_to(runtime_seconds as f64 / SECONDS_PER_HOUR, 2),
            runtime_formatted: format_duration(runtime_seconds),
            power_w: self.tariff.power(kind),
            energy_kwh: round_to(consumption.energy_kwh, 3),
            cost: consumption.cost.round() as i64,
            cost_formatted: format_currency(consumption.cost, self.currency),
        }
    }

    pub fn floor(&self, runtimes: &BTreeMap<DeviceKind, u64>) -> FloorEnergy {
        FloorEnergy {
            devices: runtimes
                .iter()
                .map(|(kind, seconds)| (*kind, self.device(*kind, *seconds)))
                .collect(),
            total: self.total(self.floor_consumption(runtimes), 3),
        }
    }

    pub fn total(&self, consumption: Consumption, energy_places: i32) -> EnergyTotal {
        EnergyTotal {
            energy_kwh: round_to(consumption.energy_kwh, energy_places),
            cost: consumption.cost.round() as i64,
            cost_formatted: format_currency(consumption.cost, self.currency),
        }
    }

    pub fn projection(&self, daily: Consumption) -> EnergyTotal {
        self.total(daily * PROJECTION_DAYS, 2)
    }

    pub fn report(
        &self,
        date: DayKey,
        runtimes: &BTreeMap<Location, BTreeMap<DeviceKind, u64>>,
    ) -> EnergyReport {
        let floors = runtimes
            .iter()
            .map(|(location, floor_runtimes)| {
                let daily = self.floor_consumption(floor_runtimes);
                let report = FloorEnergyReport {
                    daily: self.floor(floor_runtimes),
                    monthly: self.projection(daily),
                };
                (*location, report)
            })
            .collect();

        let site = self.site_consumption(runtimes);

        EnergyReport {
            date: date.to_string(),
            price_per_kwh: self.tariff.price_per_kwh(),
            currency: self.currency.to_string(),
            device_power: self.tariff.power_map().clone(),
            floors,
            total: SiteEnergy {
                daily: self.total(site, 3),
                monthly: self.projection(site),
            },
        }
    }
}
