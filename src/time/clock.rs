//! Sources of the current time.
//!
//! Code that reads the time through a [`Clock`] can be tested against a
//! [`FixedClock`] instead of the system clock.

use std::fmt::Debug;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, TimeDelta, Utc};

use super::duration::Duration;

/// An abstract source of the current instant.
pub trait Clock: Debug + Send + Sync {
    /// The current instant.
    fn instant(&self) -> DateTime<Utc>;

    /// Offset used to present local date-times.
    fn offset(&self) -> FixedOffset;

    /// Milliseconds since the Unix epoch.
    fn millis(&self) -> i64 {
        self.instant().timestamp_millis()
    }

    /// The current wall-clock date-time at this clock's offset.
    fn now_local(&self) -> NaiveDateTime {
        self.instant().with_timezone(&self.offset()).naive_local()
    }
}

/// The operating system clock.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    /// System clock presenting times in UTC.
    pub fn utc() -> Self {
        Self {
            offset: Utc.fix(),
        }
    }

    /// System clock presenting times at `offset`.
    pub fn with_offset(offset: FixedOffset) -> Self {
        Self { offset }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::utc()
    }
}

impl Clock for SystemClock {
    fn instant(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn offset(&self) -> FixedOffset {
        self.offset
    }
}

/// A clock that always reports the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    instant: DateTime<Utc>,
    offset: FixedOffset,
}

impl FixedClock {
    /// Clock stopped at `instant`.
    pub fn new(instant: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self { instant, offset }
    }
}

impl Clock for FixedClock {
    fn instant(&self) -> DateTime<Utc> {
        self.instant
    }

    fn offset(&self) -> FixedOffset {
        self.offset
    }
}

/// A clock running a fixed duration ahead of (or behind) another.
#[derive(Debug, Clone)]
pub struct OffsetClock {
    base: Arc<dyn Clock>,
    shift: TimeDelta,
}

impl OffsetClock {
    /// Shift `base` by `duration`. Durations beyond chrono's range saturate.
    pub fn new(base: Arc<dyn Clock>, duration: Duration) -> Self {
        let shift = TimeDelta::try_from(duration).unwrap_or(if duration.is_negative() {
            TimeDelta::MIN
        } else {
            TimeDelta::MAX
        });
        Self { base, shift }
    }
}

impl Clock for OffsetClock {
    fn instant(&self) -> DateTime<Utc> {
        let base = self.base.instant();
        base.checked_add_signed(self.shift).unwrap_or(if self.shift < TimeDelta::zero() {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        })
    }

    fn offset(&self) -> FixedOffset {
        self.base.offset()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::parse_instant;
    use chrono::NaiveDate;

    fn fixed() -> FixedClock {
        let current = NaiveDate::from_ymd_opt(2000, 1, 5)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .unwrap()
            .and_utc();
        FixedClock::new(current, Utc.fix())
    }

    #[test]
    fn test_fixed_clock_instant() {
        assert_eq!(fixed().instant(), parse_instant("2000-01-05T00:00:00Z").unwrap());
    }

    #[test]
    fn test_fixed_clock_millis() {
        let clock = fixed();
        assert_eq!(clock.millis(), clock.instant().timestamp_millis());
        assert_eq!(clock.millis(), 947_030_400_000);
    }

    #[test]
    fn test_now_local_applies_offset() {
        let clock = FixedClock::new(fixed().instant(), FixedOffset::east_opt(8 * 3_600).unwrap());
        let expected = NaiveDate::from_ymd_opt(2000, 1, 5)
            .and_then(|date| date.and_hms_opt(8, 0, 0))
            .unwrap();
        assert_eq!(clock.now_local(), expected);
    }

    #[test]
    fn test_offset_clock() {
        let clock = OffsetClock::new(Arc::new(fixed()), Duration::of_hours(-1));
        assert_eq!(clock.instant(), parse_instant("2000-01-04T23:00:00Z").unwrap());
        assert_eq!(clock.millis(), fixed().millis() - 3_600_000);
    }

    #[test]
    fn test_system_clock_moves_forward() {
        let clock = SystemClock::utc();
        let first = clock.instant();
        assert!(clock.instant() >= first);
        assert_eq!(clock.offset(), Utc.fix());
    }
}
