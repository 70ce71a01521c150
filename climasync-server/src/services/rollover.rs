use super::clock::DayKey;

/// Slots in the detection window; gaps longer than this discard everything.
pub const RETAINED_DAYS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RolloverOutcome {
    /// The marker already names today.
    Current,
    /// A new day started; `days` is how many calendar days were crossed.
    Rolled { from: DayKey, to: DayKey, days: u32 },
    /// The observed day lies before the marker. Nothing was reset.
    ClockWentBack { active: DayKey, observed: DayKey },
}

/// Holds the active-day marker and decides when the daily reset fires.
#[derive(Debug, Clone)]
pub struct RolloverCoordinator {
    active_day: DayKey,
}

impl RolloverCoordinator {
    pub fn new(today: DayKey) -> Self {
        Self { active_day: today }
    }

    pub fn active_day(&self) -> DayKey {
        self.active_day
    }

    pub fn check(&mut self, today: DayKey) -> RolloverOutcome {
        let elapsed = self.active_day.days_until(today);

        if elapsed == 0 {
            return RolloverOutcome::Current;
        }

        if elapsed < 0 {
            return RolloverOutcome::ClockWentBack {
                active: self.active_day,
                observed: today,
            };
        }

        let from = std::mem::replace(&mut self.active_day, today);

        RolloverOutcome::Rolled {
            from,
            to: today,
            days: u32::try_from(elapsed).unwrap_or(u32::MAX),
        }
    }
}
