use std::collections::BTreeMap;

use climasync_api::models::{DeviceKind, DeviceState, Location};
use time::OffsetDateTime;

/// ON-time bookkeeping for one device.
///
/// `accumulated_on_ms` only ever holds completed intervals. While the device
/// is ON the open interval `now - last_change` is added at read time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerEntry {
    pub last_state: DeviceState,
    pub last_change: OffsetDateTime,
    pub accumulated_on_ms: u64,
}

impl LedgerEntry {
    pub fn new(at: OffsetDateTime) -> Self {
        Self {
            last_state: DeviceState::Off,
            last_change: at,
            accumulated_on_ms: 0,
        }
    }

    /// Every call is a flush point, including same-state re-assertions.
    pub fn record(&mut self, state: DeviceState, now: OffsetDateTime) {
        self.accumulated_on_ms = self
            .accumulated_on_ms
            .saturating_add(self.open_interval_ms(now));
        self.last_state = state;
        // never rebase into the past, or the next fold would count time twice
        if now > self.last_change {
            self.last_change = now;
        }
    }

    pub fn runtime_ms(&self, now: OffsetDateTime) -> u64 {
        self.accumulated_on_ms
            .saturating_add(self.open_interval_ms(now))
    }

    pub fn reset(&mut self, now: OffsetDateTime) {
        *self = Self::new(now);
    }

    fn open_interval_ms(&self, now: OffsetDateTime) -> u64 {
        if self.last_state.is_on() {
            elapsed_ms(self.last_change, now)
        } else {
            0
        }
    }
}

fn elapsed_ms(from: OffsetDateTime, to: OffsetDateTime) -> u64 {
    let millis = (to - from).whole_milliseconds();
    if millis <= 0 {
        0
    } else {
        u64::try_from(millis).unwrap_or(u64::MAX)
    }
}

#[derive(Debug, Clone)]
pub struct RuntimeLedger {
    entries: [[LedgerEntry; DeviceKind::ALL.len()]; Location::ALL.len()],
}

impl RuntimeLedger {
    pub fn new(at: OffsetDateTime) -> Self {
        Self {
            entries: [[LedgerEntry::new(at); DeviceKind::ALL.len()]; Location::ALL.len()],
        }
    }

    pub fn entry(&self, location: Location, kind: DeviceKind) -> &LedgerEntry {
        &self.entries[location.index()][kind.index()]
    }

    pub fn record_transition(
        &mut self,
        location: Location,
        kind: DeviceKind,
        state: DeviceState,
        now: OffsetDateTime,
    ) {
        self.entries[location.index()][kind.index()].record(state, now);
    }

    pub fn runtime_seconds(&self, location: Location, kind: DeviceKind, now: OffsetDateTime) -> u64 {
        self.entry(location, kind).runtime_ms(now) / 1000
    }

    pub fn runtimes(&self, location: Location, now: OffsetDateTime) -> BTreeMap<DeviceKind, u64> {
        DeviceKind::ALL
            .iter()
            .map(|kind| (*kind, self.runtime_seconds(location, *kind, now)))
            .collect()
    }

    pub fn state(&self, location: Location, kind: DeviceKind) -> DeviceState {
        self.entry(location, kind).last_state
    }

    pub fn states(&self, location: Location) -> BTreeMap<DeviceKind, DeviceState> {
        DeviceKind::ALL
            .iter()
            .map(|kind| (*kind, self.state(location, *kind)))
            .collect()
    }

    /// Forces every device OFF with zero accumulated time.
    pub fn reset_all(&mut self, now: OffsetDateTime) {
        self.entries
            .iter_mut()
            .flatten()
            .for_each(|entry| entry.reset(now));
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;
    use time::{Duration, OffsetDateTime};

    use super::*;

    const T0: OffsetDateTime = datetime!(2026-05-01 06:00 UTC);

    fn at(seconds: i64) -> OffsetDateTime {
        T0 + Duration::seconds(seconds)
    }

    #[test]
    fn test_query_mid_interval_does_not_mutate() {
        let mut ledger = RuntimeLedger::new(T0);
        ledger.record_transition(Location::Floor1, DeviceKind::Heater, DeviceState::On, at(0));
        let before = *ledger.entry(Location::Floor1, DeviceKind::Heater);

        assert_eq!(ledger.runtime_seconds(Location::Floor1, DeviceKind::Heater, at(1800)), 1800);
        assert_eq!(*ledger.entry(Location::Floor1, DeviceKind::Heater), before);

        ledger.record_transition(Location::Floor1, DeviceKind::Heater, DeviceState::Off, at(3600));
        assert_eq!(ledger.runtime_seconds(Location::Floor1, DeviceKind::Heater, at(5000)), 3600);
    }

    #[test]
    fn test_redundant_transitions_do_not_change_total() {
        let mut plain = RuntimeLedger::new(T0);
        let mut chatty = RuntimeLedger::new(T0);
        let kind = DeviceKind::Ventilation;

        plain.record_transition(Location::Floor2, kind, DeviceState::On, at(10));
        plain.record_transition(Location::Floor2, kind, DeviceState::Off, at(400));
        plain.record_transition(Location::Floor2, kind, DeviceState::On, at(1000));

        chatty.record_transition(Location::Floor2, kind, DeviceState::Off, at(5));
        chatty.record_transition(Location::Floor2, kind, DeviceState::On, at(10));
        chatty.record_transition(Location::Floor2, kind, DeviceState::On, at(120));
        chatty.record_transition(Location::Floor2, kind, DeviceState::On, at(333));
        chatty.record_transition(Location::Floor2, kind, DeviceState::Off, at(400));
        chatty.record_transition(Location::Floor2, kind, DeviceState::Off, at(700));
        chatty.record_transition(Location::Floor2, kind, DeviceState::On, at(1000));
        chatty.record_transition(Location::Floor2, kind, DeviceState::On, at(1500));

        for instant in [1500, 2000, 9999] {
            assert_eq!(
                plain.runtime_seconds(Location::Floor2, kind, at(instant)),
                chatty.runtime_seconds(Location::Floor2, kind, at(instant)),
            );
        }
        assert_eq!(chatty.runtime_seconds(Location::Floor2, kind, at(2000)), 390 + 1000);
    }

    #[test]
    fn test_same_state_call_rebases_open_interval() {
        let mut entry = LedgerEntry::new(T0);
        entry.record(DeviceState::On, at(0));
        entry.record(DeviceState::On, at(90));

        assert_eq!(entry.accumulated_on_ms, 90_000);
        assert_eq!(entry.last_change, at(90));
        assert_eq!(entry.runtime_ms(at(100)), 100_000);
    }

    #[test]
    fn test_sub_second_remainders_are_kept() {
        let mut entry = LedgerEntry::new(T0);
        entry.record(DeviceState::On, at(0));
        entry.record(DeviceState::Off, at(0) + Duration::milliseconds(1500));
        entry.record(DeviceState::On, at(10));
        entry.record(DeviceState::Off, at(10) + Duration::milliseconds(600));

        assert_eq!(entry.runtime_ms(at(20)), 2100);
        assert_eq!(entry.runtime_ms(at(20)) / 1000, 2);
    }

    #[test]
    fn test_backwards_now_folds_nothing() {
        let mut entry = LedgerEntry::new(T0);
        entry.record(DeviceState::On, at(100));
        entry.record(DeviceState::On, at(40));

        assert_eq!(entry.accumulated_on_ms, 0);
        assert_eq!(entry.last_change, at(100));
        assert_eq!(entry.runtime_ms(at(160)), 60_000);
    }

    #[test]
    fn test_reset_all_forces_off() {
        let mut ledger = RuntimeLedger::new(T0);
        ledger.record_transition(Location::Floor1, DeviceKind::Lighting, DeviceState::On, at(0));
        ledger.record_transition(Location::Floor2, DeviceKind::Fogger, DeviceState::On, at(0));

        ledger.reset_all(at(500));

        for location in Location::ALL {
            for kind in DeviceKind::ALL {
                let entry = ledger.entry(location, kind);
                assert_eq!(entry.last_state, DeviceState::Off);
                assert_eq!(entry.accumulated_on_ms, 0);
                assert_eq!(entry.last_change, at(500));
            }
        }
        assert_eq!(ledger.runtimes(Location::Floor1, at(900))[&DeviceKind::Lighting], 0);
    }
}
