//! Signed elapsed time.

use std::ops::{Add, Neg, Sub};

use chrono::TimeDelta;

use super::error::{TimeError, TimeResult};

pub(crate) const NANOS_PER_SECOND: i64 = 1_000_000_000;
pub(crate) const NANOS_PER_MILLI: i64 = 1_000_000;
pub(crate) const SECONDS_PER_MINUTE: i64 = 60;
pub(crate) const SECONDS_PER_HOUR: i64 = 60 * SECONDS_PER_MINUTE;
pub(crate) const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;

/// Units a [`Duration`] can be built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    /// Nanoseconds.
    Nanos,
    /// Milliseconds.
    Millis,
    /// Seconds.
    Seconds,
    /// Minutes of 60 seconds.
    Minutes,
    /// Hours of 60 minutes.
    Hours,
    /// Days of exactly 24 hours.
    Days,
}

impl TimeUnit {
    /// Length of one unit in seconds, for units of at least a second.
    const fn seconds(self) -> Option<i64> {
        match self {
            Self::Nanos | Self::Millis => None,
            Self::Seconds => Some(1),
            Self::Minutes => Some(SECONDS_PER_MINUTE),
            Self::Hours => Some(SECONDS_PER_HOUR),
            Self::Days => Some(SECONDS_PER_DAY),
        }
    }
}

/// A signed amount of time: whole seconds plus a nanosecond adjustment.
///
/// `seconds` is floored and `nanos` is always in `0..1_000_000_000`, so
/// -0.5s is stored as `-1s + 500_000_000ns`. Days are exactly 24 hours.
///
/// # Example
///
/// ```
/// use stdlib_tour::time::Duration;
///
/// let d = Duration::of_days(2).plus_hours(1).plus_minutes(80);
/// assert_eq!(d.to_string(), "PT50H20M");
/// assert_eq!(Duration::parse("P2DT1H80M").unwrap(), d);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Duration {
    seconds: i64,
    nanos: u32,
}

impl Duration {
    /// Zero length.
    pub const ZERO: Self = Self {
        seconds: 0,
        nanos: 0,
    };

    /// Build from seconds and a nanosecond adjustment of any sign or size.
    pub fn of_seconds_and_nanos(seconds: i64, nano_adjustment: i64) -> Option<Self> {
        let seconds = seconds.checked_add(nano_adjustment.div_euclid(NANOS_PER_SECOND))?;
        let nanos = nano_adjustment.rem_euclid(NANOS_PER_SECOND);
        Some(Self {
            seconds,
            nanos: u32::try_from(nanos).ok()?,
        })
    }

    /// Build from an amount of `unit`, failing on overflow.
    pub fn of(amount: i64, unit: TimeUnit) -> TimeResult<Self> {
        let result = match unit {
            TimeUnit::Nanos => Self::of_seconds_and_nanos(0, amount),
            TimeUnit::Millis => Self::of_seconds_and_nanos(
                amount.div_euclid(1000),
                amount.rem_euclid(1000) * NANOS_PER_MILLI,
            ),
            _ => unit
                .seconds()
                .and_then(|per| amount.checked_mul(per))
                .map(|seconds| Self { seconds, nanos: 0 }),
        };
        result.ok_or(TimeError::Overflow)
    }

    fn of_or_panic(amount: i64, unit: TimeUnit) -> Self {
        match Self::of(amount, unit) {
            Ok(duration) => duration,
            Err(_) => panic!("overflow creating a duration of {amount} {unit:?}"),
        }
    }

    /// Duration of whole days.
    ///
    /// # Panics
    ///
    /// If the number of seconds overflows `i64`.
    pub fn of_days(days: i64) -> Self {
        Self::of_or_panic(days, TimeUnit::Days)
    }

    /// Duration of whole hours.
    ///
    /// # Panics
    ///
    /// If the number of seconds overflows `i64`.
    pub fn of_hours(hours: i64) -> Self {
        Self::of_or_panic(hours, TimeUnit::Hours)
    }

    /// Duration of whole minutes.
    ///
    /// # Panics
    ///
    /// If the number of seconds overflows `i64`.
    pub fn of_minutes(minutes: i64) -> Self {
        Self::of_or_panic(minutes, TimeUnit::Minutes)
    }

    /// Duration of whole seconds.
    pub const fn of_seconds(seconds: i64) -> Self {
        Self { seconds, nanos: 0 }
    }

    /// Duration of milliseconds.
    pub fn of_millis(millis: i64) -> Self {
        Self::of_or_panic(millis, TimeUnit::Millis)
    }

    /// Duration of nanoseconds.
    pub fn of_nanos(nanos: i64) -> Self {
        Self::of_or_panic(nanos, TimeUnit::Nanos)
    }

    /// Whole seconds, floored.
    pub const fn seconds(&self) -> i64 {
        self.seconds
    }

    /// Nanosecond adjustment in `0..1_000_000_000`.
    pub const fn nanos(&self) -> u32 {
        self.nanos
    }

    /// Whether the duration is zero.
    pub const fn is_zero(&self) -> bool {
        self.seconds == 0 && self.nanos == 0
    }

    /// Whether the duration is below zero.
    pub const fn is_negative(&self) -> bool {
        self.seconds < 0
    }

    // =========================================================================
    // Arithmetic
    // =========================================================================

    /// `self + other`, or `None` on overflow.
    pub fn checked_add(self, other: Self) -> Option<Self> {
        let seconds = self.seconds.checked_add(other.seconds)?;
        Self::of_seconds_and_nanos(seconds, i64::from(self.nanos) + i64::from(other.nanos))
    }

    /// `self - other`, or `None` on overflow.
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.checked_add(other.checked_neg()?)
    }

    /// `-self`, or `None` for the most negative duration.
    pub fn checked_neg(self) -> Option<Self> {
        Self::of_seconds_and_nanos(self.seconds.checked_neg()?, -i64::from(self.nanos))
    }

    /// `|self|`, or `None` for the most negative duration.
    pub fn checked_abs(self) -> Option<Self> {
        if self.is_negative() {
            self.checked_neg()
        } else {
            Some(self)
        }
    }

    /// Same length, opposite sign. Panics like [`Neg`].
    pub fn negated(self) -> Self {
        -self
    }

    /// Absolute length. Panics for the most negative duration.
    pub fn abs(self) -> Self {
        if self.is_negative() { -self } else { self }
    }

    fn plus_or_panic(self, amount: i64, unit: TimeUnit) -> Self {
        self + Self::of_or_panic(amount, unit)
    }

    /// Add whole days.
    pub fn plus_days(self, days: i64) -> Self {
        self.plus_or_panic(days, TimeUnit::Days)
    }

    /// Add hours.
    pub fn plus_hours(self, hours: i64) -> Self {
        self.plus_or_panic(hours, TimeUnit::Hours)
    }

    /// Add minutes.
    pub fn plus_minutes(self, minutes: i64) -> Self {
        self.plus_or_panic(minutes, TimeUnit::Minutes)
    }

    /// Add seconds.
    pub fn plus_seconds(self, seconds: i64) -> Self {
        self.plus_or_panic(seconds, TimeUnit::Seconds)
    }

    /// Add milliseconds.
    pub fn plus_millis(self, millis: i64) -> Self {
        self.plus_or_panic(millis, TimeUnit::Millis)
    }

    /// Add nanoseconds.
    pub fn plus_nanos(self, nanos: i64) -> Self {
        self.plus_or_panic(nanos, TimeUnit::Nanos)
    }

    // =========================================================================
    // Conversion
    // =========================================================================

    /// Whole days, truncated toward zero.
    pub const fn to_days(&self) -> i64 {
        self.seconds / SECONDS_PER_DAY
    }

    /// Whole hours, truncated toward zero.
    pub const fn to_hours(&self) -> i64 {
        self.seconds / SECONDS_PER_HOUR
    }

    /// Whole minutes, truncated toward zero.
    pub const fn to_minutes(&self) -> i64 {
        self.seconds / SECONDS_PER_MINUTE
    }

    /// Whole seconds, floored.
    pub const fn to_seconds(&self) -> i64 {
        self.seconds
    }

    /// Total milliseconds, truncated toward zero.
    pub fn to_millis(&self) -> i128 {
        self.to_nanos() / i128::from(NANOS_PER_MILLI)
    }

    /// Total nanoseconds.
    pub fn to_nanos(&self) -> i128 {
        i128::from(self.seconds) * i128::from(NANOS_PER_SECOND) + i128::from(self.nanos)
    }
}

impl Add for Duration {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        match self.checked_add(rhs) {
            Some(sum) => sum,
            None => panic!("overflow when adding durations"),
        }
    }
}

impl Sub for Duration {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        match self.checked_sub(rhs) {
            Some(difference) => difference,
            None => panic!("overflow when subtracting durations"),
        }
    }
}

impl Neg for Duration {
    type Output = Self;

    fn neg(self) -> Self {
        match self.checked_neg() {
            Some(negated) => negated,
            None => panic!("overflow when negating duration"),
        }
    }
}

// =============================================================================
// Interop
// =============================================================================

impl From<TimeDelta> for Duration {
    fn from(delta: TimeDelta) -> Self {
        // TimeDelta's range is a strict subset of ours.
        Self::of_seconds_and_nanos(delta.num_seconds(), i64::from(delta.subsec_nanos()))
            .unwrap_or_default()
    }
}

impl TryFrom<Duration> for TimeDelta {
    type Error = TimeError;

    fn try_from(duration: Duration) -> TimeResult<Self> {
        TimeDelta::new(duration.seconds, duration.nanos).ok_or(TimeError::Overflow)
    }
}

impl TryFrom<std::time::Duration> for Duration {
    type Error = TimeError;

    fn try_from(duration: std::time::Duration) -> TimeResult<Self> {
        let seconds = i64::try_from(duration.as_secs()).map_err(|_| TimeError::Overflow)?;
        Ok(Self {
            seconds,
            nanos: duration.subsec_nanos(),
        })
    }
}

impl TryFrom<Duration> for std::time::Duration {
    type Error = TimeError;

    fn try_from(duration: Duration) -> TimeResult<Self> {
        let seconds = u64::try_from(duration.seconds).map_err(|_| TimeError::Overflow)?;
        Ok(std::time::Duration::new(seconds, duration.nanos))
    }
}
