use std::fmt;

use time::{Date, OffsetDateTime, UtcOffset};

/// Calendar day used to detect the midnight rollover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayKey(Date);

impl DayKey {
    pub fn at(instant: OffsetDateTime, offset: UtcOffset) -> Self {
        Self(instant.to_offset(offset).date())
    }

    pub fn date(&self) -> Date {
        self.0
    }

    /// Whole days from `self` to `later`; negative when `later` is earlier.
    pub fn days_until(&self, later: DayKey) -> i64 {
        (later.0 - self.0).whole_days()
    }
}

impl From<Date> for DayKey {
    fn from(date: Date) -> Self {
        Self(date)
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.0.year(),
            u8::from(self.0.month()),
            self.0.day()
        )
    }
}

pub trait Clock: Send + Sync {
    fn now(&self) -> OffsetDateTime;

    fn offset(&self) -> UtcOffset;

    fn day_key(&self, at: OffsetDateTime) -> DayKey {
        DayKey::at(at, self.offset())
    }
}

#[derive(Debug, Clone)]
pub struct SystemClock {
    offset: UtcOffset,
}

impl SystemClock {
    pub fn new(utc_offset_hours: i8) -> Result<Self, time::error::ComponentRange> {
        Ok(Self {
            offset: UtcOffset::from_hms(utc_offset_hours, 0, 0)?,
        })
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            offset: UtcOffset::UTC,
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }

    fn offset(&self) -> UtcOffset {
        self.offset
    }
}

#[cfg(any(test, feature = "mock"))]
pub use manual::ManualClock;

#[cfg(any(test, feature = "mock"))]
mod manual {
    use std::sync::{Mutex, PoisonError};

    use time::{Duration, OffsetDateTime, UtcOffset};

    use super::Clock;

    /// Clock that only moves when told to.
    #[derive(Debug)]
    pub struct ManualClock {
        now: Mutex<OffsetDateTime>,
        offset: UtcOffset,
    }

    impl ManualClock {
        pub fn new(start: OffsetDateTime) -> Self {
            Self {
                now: Mutex::new(start),
                offset: UtcOffset::UTC,
            }
        }

        pub fn with_offset(start: OffsetDateTime, offset: UtcOffset) -> Self {
            Self {
                now: Mutex::new(start),
                offset,
            }
        }

        pub fn set(&self, at: OffsetDateTime) {
            *self.now.lock().unwrap_or_else(PoisonError::into_inner) = at;
        }

        pub fn advance(&self, by: Duration) -> OffsetDateTime {
            let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
            *now += by;
            *now
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> OffsetDateTime {
            *self.now.lock().unwrap_or_else(PoisonError::into_inner)
        }

        fn offset(&self) -> UtcOffset {
            self.offset
        }
    }
}

#[cfg(test)]
mod tests {
    use time::macros::{datetime, offset};
    use time::Duration;

    use super::*;

    #[test]
    fn test_day_key_formats_iso_date() {
        let key = DayKey::at(datetime!(2026-03-04 23:59:59 UTC), UtcOffset::UTC);

        assert_eq!(key.to_string(), "2026-03-04");
    }

    #[test]
    fn test_day_key_respects_offset() {
        let instant = datetime!(2026-03-04 18:30 UTC);

        assert_eq!(DayKey::at(instant, UtcOffset::UTC).to_string(), "2026-03-04");
        assert_eq!(DayKey::at(instant, offset!(+7)).to_string(), "2026-03-05");
    }

    #[test]
    fn test_days_until() {
        let monday = DayKey::at(datetime!(2026-03-02 12:00 UTC), UtcOffset::UTC);
        let thursday = DayKey::at(datetime!(2026-03-05 01:00 UTC), UtcOffset::UTC);

        assert_eq!(monday.days_until(thursday), 3);
        assert_eq!(thursday.days_until(monday), -3);
    }

    #[test]
    fn test_manual_clock_advances() {
        let clock = ManualClock::new(datetime!(2026-03-02 23:00 UTC));
        let before = clock.day_key(clock.now());

        let after = clock.advance(Duration::hours(2));

        assert_eq!(after, datetime!(2026-03-03 01:00 UTC));
        assert_eq!(before.days_until(clock.day_key(after)), 1);
    }

    #[test]
    fn test_system_clock_rejects_bad_offset() {
        assert!(SystemClock::new(7).is_ok());
        assert!(SystemClock::new(30).is_err());
    }
}
