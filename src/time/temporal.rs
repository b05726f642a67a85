//! Points in time and the arithmetic between them.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeDelta, TimeZone, Utc};

use super::duration::Duration;
use super::error::{TimeError, TimeResult};

/// A point in time, with or without a place on the global timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Temporal {
    /// A UTC instant.
    Instant(DateTime<Utc>),
    /// A wall-clock date-time with no offset.
    Local(NaiveDateTime),
    /// A date-time at a fixed offset from UTC.
    Offset(DateTime<FixedOffset>),
}

impl Temporal {
    fn kind(&self) -> &'static str {
        match self {
            Self::Instant(_) => "instant",
            Self::Local(_) => "local date-time",
            Self::Offset(_) => "offset date-time",
        }
    }

    /// Position on the global timeline, if the point has one.
    pub fn to_instant(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Instant(instant) => Some(*instant),
            Self::Offset(offset) => Some(offset.to_utc()),
            Self::Local(_) => None,
        }
    }
}

impl From<DateTime<Utc>> for Temporal {
    fn from(instant: DateTime<Utc>) -> Self {
        Self::Instant(instant)
    }
}

impl From<NaiveDateTime> for Temporal {
    fn from(local: NaiveDateTime) -> Self {
        Self::Local(local)
    }
}

impl From<DateTime<FixedOffset>> for Temporal {
    fn from(offset: DateTime<FixedOffset>) -> Self {
        Self::Offset(offset)
    }
}

impl Duration {
    /// Time from `start` to `end`, negative when `end` is earlier.
    ///
    /// `end` is first converted to the kind of `start`. A local start reads
    /// the wall-clock part of an offset end and ignores the offset. Instant
    /// and offset starts compare on the global timeline, so a local end is
    /// rejected there, as is an instant end with a local start.
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::{DateTime, FixedOffset};
    /// use stdlib_tour::time::Duration;
    ///
    /// let start = DateTime::parse_from_rfc3339("2000-01-01T00:00:00Z").unwrap();
    /// let end: DateTime<FixedOffset> =
    ///     DateTime::parse_from_rfc3339("2000-01-03T01:01:01+08:00").unwrap();
    /// let elapsed = Duration::between(start, end).unwrap();
    /// assert_eq!(elapsed, Duration::parse("P1DT17H1M1S").unwrap());
    /// ```
    pub fn between(start: impl Into<Temporal>, end: impl Into<Temporal>) -> TimeResult<Self> {
        let (start, end) = (start.into(), end.into());
        let delta = match (start, end) {
            (Temporal::Local(from), Temporal::Local(to)) => to - from,
            (Temporal::Local(from), Temporal::Offset(to)) => to.naive_local() - from,
            _ => match (start.to_instant(), end.to_instant()) {
                (Some(from), Some(to)) => to - from,
                _ => {
                    return Err(TimeError::IncompatibleTemporal {
                        start: start.kind(),
                        end: end.kind(),
                    });
                }
            },
        };
        Ok(delta.into())
    }
}

// =============================================================================
// Adjust
// =============================================================================

/// Shift a date-time by a [`Duration`].
pub trait Adjust: Sized {
    /// `self + duration`, or [`TimeError::Overflow`] outside chrono's range.
    fn plus(self, duration: Duration) -> TimeResult<Self>;

    /// `self - duration`, or [`TimeError::Overflow`] outside chrono's range.
    fn minus(self, duration: Duration) -> TimeResult<Self> {
        self.plus(duration.checked_neg().ok_or(TimeError::Overflow)?)
    }
}

impl Adjust for NaiveDateTime {
    fn plus(self, duration: Duration) -> TimeResult<Self> {
        let delta = TimeDelta::try_from(duration)?;
        self.checked_add_signed(delta).ok_or(TimeError::Overflow)
    }
}

impl<Tz: TimeZone> Adjust for DateTime<Tz> {
    fn plus(self, duration: Duration) -> TimeResult<Self> {
        let delta = TimeDelta::try_from(duration)?;
        self.checked_add_signed(delta).ok_or(TimeError::Overflow)
    }
}

/// Parse an RFC 3339 instant such as `2000-01-05T00:00:00Z`.
pub fn parse_instant(text: &str) -> TimeResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|instant| instant.to_utc())
        .map_err(|source| TimeError::InvalidInstant {
            text: text.to_owned(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn local(year: i32, month: u32, day: u32, h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(h, m, s))
            .unwrap()
    }

    fn offset(local: NaiveDateTime, hours: i32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(hours * 3_600)
            .unwrap()
            .from_local_datetime(&local)
            .unwrap()
    }

    fn two_days_and_change() -> Duration {
        Duration::of_days(2).plus_hours(1).plus_minutes(1).plus_seconds(1)
    }

    #[test]
    fn test_between_instants() {
        let start = parse_instant("2000-01-01T00:00:00Z").unwrap();
        let end = parse_instant("2000-01-03T01:01:01Z").unwrap();
        assert_eq!(Duration::between(start, end).unwrap(), two_days_and_change());
        assert_eq!(Duration::between(end, start).unwrap(), -two_days_and_change());
    }

    #[test]
    fn test_between_local_date_times() {
        let elapsed = Duration::between(local(2000, 1, 1, 0, 0, 0), local(2000, 1, 3, 1, 1, 1));
        assert_eq!(elapsed.unwrap(), two_days_and_change());
    }

    #[test]
    fn test_between_offsets_uses_global_timeline() {
        let start = offset(local(2000, 1, 1, 0, 0, 0), 0);
        let end = offset(local(2000, 1, 3, 1, 1, 1), 8);
        let expected = Duration::of_days(1).plus_hours(17).plus_minutes(1).plus_seconds(1);
        assert_eq!(Duration::between(start, end).unwrap(), expected);
    }

    #[test]
    fn test_between_local_and_offset_drops_offset() {
        let start = local(2000, 1, 1, 0, 0, 0);
        let end = offset(local(2000, 1, 3, 1, 1, 1), 0);
        assert_eq!(Duration::between(start, end).unwrap(), two_days_and_change());

        let shifted = offset(local(2000, 1, 3, 1, 1, 1), 8);
        assert_eq!(Duration::between(start, shifted).unwrap(), two_days_and_change());
    }

    #[test]
    fn test_between_incompatible_kinds() {
        let instant = parse_instant("2000-01-01T00:00:00Z").unwrap();
        let local = local(2000, 1, 3, 1, 1, 1);
        assert_eq!(
            Duration::between(instant, local),
            Err(TimeError::IncompatibleTemporal {
                start: "instant",
                end: "local date-time",
            })
        );
        assert!(Duration::between(local, instant).is_err());
    }

    #[test]
    fn test_adjust_local_date_time() {
        let base = local(2000, 1, 5, 0, 0, 0);
        assert_eq!(base.plus(Duration::of_days(1)).unwrap(), local(2000, 1, 6, 0, 0, 0));
        assert_eq!(base.minus(Duration::of_days(1)).unwrap(), local(2000, 1, 4, 0, 0, 0));
        assert_eq!(base.plus(Duration::of_seconds(1)).unwrap(), local(2000, 1, 5, 0, 0, 1));
    }

    #[test]
    fn test_adjust_zoned_and_overflow() {
        let instant = parse_instant("2000-01-05T00:00:00Z").unwrap();
        let later = instant.plus(Duration::of_millis(1_500)).unwrap();
        assert_eq!(later.timestamp_millis() - instant.timestamp_millis(), 1_500);
        assert_eq!(instant.plus(Duration::of_seconds(i64::MAX)), Err(TimeError::Overflow));
    }

    #[test]
    fn test_parse_instant_rejects_garbage() {
        assert!(matches!(
            parse_instant("2000-01-05"),
            Err(TimeError::InvalidInstant { .. })
        ));
    }
}
