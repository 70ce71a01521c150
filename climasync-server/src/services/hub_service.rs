use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use climasync_api::models::{
    AddDetectionRequest, ClimateStats, DataResponse, DaySlot, DetectionRecord, DetectionStatus,
    DeviceCommands, DeviceKind, DeviceStat, DeviceState, EnergyReport, FloorData, HistoryResponse,
    ImagePayload, Location, SensorReading, StatsDetailResponse, StatsResponse, StatsSummary,
};
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::configs::Settings;
use crate::errors::{DetectionError, EnergyError};

use super::clock::{Clock, DayKey};
use super::detection_window::DetectionWindow;
use super::energy_calculator::{format_currency, format_duration, round_to, EnergyCalculator};
use super::rollover::{RETAINED_DAYS, RolloverCoordinator, RolloverOutcome};
use super::runtime_ledger::RuntimeLedger;
use super::sensor_history::SensorHistory;
use super::tariff::TariffConfig;

pub const DEFAULT_DETECTION_DESCRIPTION: &str = "Unidentified organism detected";

/// Readings per floor included in the detailed statistics view.
pub const RECENT_READINGS: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct HubConfig {
    pub price_per_kwh: f64,
    pub currency: String,
    pub device_power: BTreeMap<DeviceKind, f64>,
    pub history_capacity: usize,
    pub detection_capacity: usize,
}

impl From<&Settings> for HubConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            price_per_kwh: settings.energy.price_per_kwh,
            currency: settings.energy.currency.clone(),
            device_power: settings.energy.device_power.to_map(),
            history_capacity: settings.history.capacity,
            detection_capacity: settings.detection.capacity,
        }
    }
}

impl Default for HubConfig {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewDetection {
    pub image: Option<ImagePayload>,
    pub description: Option<String>,
    pub confidence: Option<f64>,
}

impl From<AddDetectionRequest> for NewDetection {
    fn from(request: AddDetectionRequest) -> Self {
        Self {
            image: request.image(),
            description: request.description.filter(|d| !d.trim().is_empty()),
            confidence: request.confidence,
        }
    }
}

struct HubData {
    rollover: RolloverCoordinator,
    ledger: RuntimeLedger,
    tariff: TariffConfig,
    detections: DetectionWindow,
    histories: [SensorHistory; Location::ALL.len()],
    last_detection_id: u64,
}

impl HubData {
    fn roll_if_needed(&mut self, now: OffsetDateTime, today: DayKey) -> bool {
        match self.rollover.check(today) {
            RolloverOutcome::Current => false,
            RolloverOutcome::ClockWentBack { active, observed } => {
                warn!(
                    "clock reports {} while {} is active, skipping daily reset",
                    observed, active
                );
                false
            }
            RolloverOutcome::Rolled { from, to, days } => {
                self.ledger.reset_all(now);
                self.histories.iter_mut().for_each(SensorHistory::clear);
                for _ in 0..days.min(RETAINED_DAYS) {
                    self.detections.rotate();
                }

                info!("daily reset completed: {} -> {} ({} day(s))", from, to, days);
                true
            }
        }
    }

    fn history(&self, location: Location) -> &SensorHistory {
        &self.histories[location.index()]
    }

    fn history_mut(&mut self, location: Location) -> &mut SensorHistory {
        &mut self.histories[location.index()]
    }

    fn runtimes(&self, now: OffsetDateTime) -> BTreeMap<Location, BTreeMap<DeviceKind, u64>> {
        Location::ALL
            .iter()
            .map(|location| (*location, self.ledger.runtimes(*location, now)))
            .collect()
    }

    fn next_detection_id(&mut self, now: OffsetDateTime) -> u64 {
        let millis = u64::try_from(now.unix_timestamp_nanos() / 1_000_000).unwrap_or_default();
        let id = millis.max(self.last_detection_id + 1);
        self.last_detection_id = id;
        id
    }
}

/// Owner of all hub state.
///
/// Every operation that touches the ledger, the sensor history or the
/// detection window first runs the daily rollover check inside the same
/// critical section, so callers never observe a half-reset day.
pub struct HubService {
    clock: Arc<dyn Clock>,
    currency: String,
    state: Mutex<HubData>,
}

impl HubService {
    pub fn new(config: HubConfig, clock: Arc<dyn Clock>) -> Result<Self, EnergyError> {
        let now = clock.now();
        let today = clock.day_key(now);
        let tariff = TariffConfig::new(config.price_per_kwh, config.device_power)?;

        let state = HubData {
            rollover: RolloverCoordinator::new(today),
            ledger: RuntimeLedger::new(now),
            tariff,
            detections: DetectionWindow::new(config.detection_capacity),
            histories: [
                SensorHistory::new(config.history_capacity),
                SensorHistory::new(config.history_capacity),
            ],
            last_detection_id: 0,
        };

        Ok(Self {
            clock,
            currency: config.currency,
            state: Mutex::new(state),
        })
    }

    pub fn now(&self) -> OffsetDateTime {
        self.clock.now()
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    fn lock(&self) -> MutexGuard<'_, HubData> {
        // the state is plain data and is consistent between statements
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn enter(&self, now: OffsetDateTime) -> MutexGuard<'_, HubData> {
        let mut state = self.lock();
        state.roll_if_needed(now, self.clock.day_key(now));
        state
    }

    /// Runs the rollover check on its own. Returns whether a reset fired.
    pub fn check_rollover(&self, now: OffsetDateTime) -> bool {
        self.lock().roll_if_needed(now, self.clock.day_key(now))
    }

    pub fn active_day(&self, now: OffsetDateTime) -> DayKey {
        self.enter(now).rollover.active_day()
    }

    pub fn set_device_state(
        &self,
        location: Location,
        kind: DeviceKind,
        state: DeviceState,
        now: OffsetDateTime,
    ) -> DeviceState {
        let mut data = self.enter(now);
        let previous = data.ledger.state(location, kind);
        data.ledger.record_transition(location, kind, state, now);
        drop(data);

        if previous != state {
            info!("{} - {}: {} -> {}", location, kind, previous, state);
        } else {
            debug!("{} - {}: {} re-asserted", location, kind, state);
        }

        state
    }

    pub fn device_state(&self, location: Location, kind: DeviceKind, now: OffsetDateTime) -> DeviceState {
        self.enter(now).ledger.state(location, kind)
    }

    pub fn device_states(&self, location: Location, now: OffsetDateTime) -> BTreeMap<DeviceKind, DeviceState> {
        self.enter(now).ledger.states(location)
    }

    pub fn device_commands(&self, now: OffsetDateTime) -> DeviceCommands {
        let data = self.enter(now);

        Location::ALL
            .iter()
            .map(|location| (*location, data.ledger.states(*location)))
            .collect()
    }

    pub fn runtime_seconds(&self, location: Location, kind: DeviceKind, now: OffsetDateTime) -> u64 {
        self.enter(now).ledger.runtime_seconds(location, kind, now)
    }

    pub fn all_runtimes(&self, location: Location, now: OffsetDateTime) -> BTreeMap<DeviceKind, u64> {
        self.enter(now).ledger.runtimes(location, now)
    }

    pub fn set_device_power(&self, kind: DeviceKind, watts: f64) -> Result<(), EnergyError> {
        self.lock().tariff.set_power(kind, watts)?;
        info!("power updated - {}: {}W", kind, watts);

        Ok(())
    }

    pub fn set_tariff(&self, price_per_kwh: f64) -> Result<(), EnergyError> {
        self.lock().tariff.set_price(price_per_kwh)?;
        info!("electricity price updated: {} {}/kWh", price_per_kwh, self.currency);

        Ok(())
    }

    pub fn energy_report(&self, now: OffsetDateTime) -> EnergyReport {
        let data = self.enter(now);
        let runtimes = data.runtimes(now);

        EnergyCalculator::new(&data.tariff, &self.currency)
            .report(data.rollover.active_day(), &runtimes)
    }

    pub fn add_detection(
        &self,
        detection: NewDetection,
        now: OffsetDateTime,
    ) -> Result<DetectionRecord, DetectionError> {
        let confidence = detection.confidence.unwrap_or(0.0);
        if !(0.0..=1.0).contains(&confidence) {
            return Err(DetectionError::InvalidConfidence(confidence));
        }

        let mut data = self.enter(now);
        let record = DetectionRecord {
            id: data.next_detection_id(now),
            captured_at: now,
            image: detection.image,
            description: detection
                .description
                .unwrap_or_else(|| DEFAULT_DETECTION_DESCRIPTION.to_string()),
            confidence,
            status: DetectionStatus::Detected,
        };

        if let Some(evicted) = data.detections.add_today(record.clone()) {
            debug!("detection {} evicted, today's slot is full", evicted.id);
        }
        drop(data);

        info!("detection added: {} at {}", record.description, record.captured_at);

        Ok(record)
    }

    pub fn remove_detection(&self, id: u64, now: OffsetDateTime) -> bool {
        let removed = self.enter(now).detections.remove_by_id(id);
        if removed {
            info!("detection deleted: {}", id);
        }

        removed
    }

    pub fn list_detections(&self, slot: DaySlot, now: OffsetDateTime) -> Vec<DetectionRecord> {
        self.enter(now).detections.list(slot)
    }

    pub fn detection_counts(&self, now: OffsetDateTime) -> [usize; 3] {
        self.enter(now).detections.counts()
    }

    /// Stores whichever values are present. A reading enters the history only
    /// when both are.
    pub fn push_reading(
        &self,
        location: Location,
        temperature: Option<f64>,
        humidity: Option<f64>,
        now: OffsetDateTime,
    ) -> Option<SensorReading> {
        let mut data = self.enter(now);
        let history = data.history_mut(location);

        match (temperature, humidity) {
            (Some(temperature), Some(humidity)) => {
                let reading = SensorReading {
                    timestamp: now,
                    temperature,
                    humidity,
                };
                history.append(reading);
                debug!("{} - temp: {}°C | hum: {}%", location, temperature, humidity);
                Some(reading)
            }
            (temperature, humidity) => {
                if let Some(temperature) = temperature {
                    history.set_temperature(temperature);
                }
                if let Some(humidity) = humidity {
                    history.set_humidity(humidity);
                }
                debug!("{} - partial reading: {:?} / {:?}", location, temperature, humidity);
                None
            }
        }
    }

    pub fn history(&self, location: Location, now: OffsetDateTime) -> HistoryResponse {
        let data = self.enter(now);
        let readings = data.history(location).readings();

        HistoryResponse {
            floor: location,
            date: data.rollover.active_day().to_string(),
            count: readings.len(),
            data: readings,
        }
    }

    pub fn floor_data(&self, now: OffsetDateTime) -> DataResponse {
        let data = self.enter(now);

        Location::ALL
            .iter()
            .map(|location| {
                let history = data.history(*location);
                let floor = FloorData {
                    temp: history.temperature(),
                    hum: history.humidity(),
                    devices: data.ledger.states(*location),
                    runtime: data.ledger.runtimes(*location, now),
                };
                (*location, floor)
            })
            .collect()
    }

    pub fn stats(&self, now: OffsetDateTime) -> StatsResponse {
        let data = self.enter(now);

        let floors = Location::ALL
            .iter()
            .map(|location| {
                let devices = DeviceKind::ALL
                    .iter()
                    .map(|kind| {
                        let total_seconds = data.ledger.runtime_seconds(*location, *kind, now);
                        let stat = DeviceStat {
                            total_seconds,
                            formatted: format_duration(total_seconds),
                            current_state: data.ledger.state(*location, *kind),
                        };
                        (*kind, stat)
                    })
                    .collect();
                (*location, devices)
            })
            .collect();

        StatsResponse {
            date: data.rollover.active_day().to_string(),
            floors,
        }
    }

    pub fn stats_detail(&self, now: OffsetDateTime) -> StatsDetailResponse {
        let data = self.enter(now);

        let climate: BTreeMap<Location, ClimateStats> = Location::ALL
            .iter()
            .map(|location| (*location, data.history(*location).stats()))
            .collect();
        let recent = Location::ALL
            .iter()
            .map(|location| (*location, data.history(*location).recent(RECENT_READINGS)))
            .collect();

        let site = EnergyCalculator::new(&data.tariff, &self.currency)
            .site_consumption(&data.runtimes(now));

        StatsDetailResponse {
            success: true,
            summary: StatsSummary {
                avg_temp: mean_of(climate.values().filter_map(|c| c.avg_temp)),
                avg_hum: mean_of(climate.values().filter_map(|c| c.avg_hum)),
                total_energy_kwh: round_to(site.energy_kwh, 2),
                total_cost: site.cost.round() as i64,
                total_cost_formatted: format_currency(site.cost, &self.currency),
            },
            climate,
            recent,
        }
    }
}

/// Mean of the floors that have readings, one decimal; 0 when none do.
fn mean_of(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        round_to(sum / count as f64, 1)
    }
}
