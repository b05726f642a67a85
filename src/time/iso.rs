//! ISO-8601 duration text.
//!
//! Accepted grammar (case-insensitive, `n` may carry its own sign):
//!
//! ```text
//! [-+]P[nD][T[nH][nM][n[.fffffffff]S]]
//! ```
//!
//! At least one component is required, and a `T` must be followed by at
//! least one time component. Days are 24 hours. Formatting always emits
//! the `PT[nH][nM][nS]` form, which parses back to the same value.

use std::fmt;

use super::duration::{
    Duration, NANOS_PER_SECOND, SECONDS_PER_DAY, SECONDS_PER_HOUR, SECONDS_PER_MINUTE,
};
use super::error::{TimeError, TimeResult};

/// Most fractional digits a seconds component may carry.
const MAX_FRACTION_DIGITS: usize = 9;

// =============================================================================
// Parsing
// =============================================================================

/// One numeric component: whole units plus signed nanoseconds (seconds only).
#[derive(Debug, Clone, Copy, Default)]
struct Component {
    whole: i64,
    nanos: i64,
}

struct Scanner<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            bytes: text.as_bytes(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn eat(&mut self, letter: u8) -> bool {
        let matched = self
            .peek()
            .is_some_and(|b| b.to_ascii_uppercase() == letter);
        if matched {
            self.pos += 1;
        }
        matched
    }

    fn eat_sign(&mut self) -> bool {
        match self.peek() {
            Some(b'-') => {
                self.pos += 1;
                true
            }
            Some(b'+') => {
                self.pos += 1;
                false
            }
            _ => false,
        }
    }

    fn digits(&mut self) -> &'a [u8] {
        let start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        &self.bytes[start..self.pos]
    }

    /// Scan `[-+]digits[.fraction]<unit>`.
    ///
    /// Rewinds and returns `None` when the text at the cursor is not a
    /// component of this unit.
    fn component(&mut self, unit: u8, fractional: bool) -> Result<Option<Component>, &'static str> {
        let start = self.pos;
        let negative = self.eat_sign();
        let digits = self.digits();
        if digits.is_empty() {
            self.pos = start;
            return Ok(None);
        }

        let mut component = Component {
            whole: parse_whole(digits, negative)?,
            nanos: 0,
        };

        if fractional && matches!(self.peek(), Some(b'.' | b',')) {
            self.pos += 1;
            let fraction = self.digits();
            if fraction.len() > MAX_FRACTION_DIGITS {
                return Err("more than nine fractional digits");
            }
            let nanos = fraction
                .iter()
                .chain(std::iter::repeat(&b'0'))
                .take(MAX_FRACTION_DIGITS)
                .fold(0i64, |acc, digit| acc * 10 + i64::from(digit - b'0'));
            component.nanos = if negative { -nanos } else { nanos };
        }

        if self.eat(unit) {
            Ok(Some(component))
        } else {
            self.pos = start;
            Ok(None)
        }
    }
}

fn parse_whole(digits: &[u8], negative: bool) -> Result<i64, &'static str> {
    digits
        .iter()
        .try_fold(0i64, |acc, digit| {
            let value = i64::from(digit - b'0');
            let shifted = acc.checked_mul(10)?;
            if negative {
                shifted.checked_sub(value)
            } else {
                shifted.checked_add(value)
            }
        })
        .ok_or("numeric overflow")
}

impl Duration {
    /// Parse an ISO-8601 duration such as `P2DT1H80M20.003000900S`.
    pub fn parse(text: &str) -> TimeResult<Self> {
        parse_components(text).map_err(|reason| TimeError::Parse {
            text: text.to_owned(),
            reason,
        })
    }
}

impl std::str::FromStr for Duration {
    type Err = TimeError;

    fn from_str(text: &str) -> TimeResult<Self> {
        Self::parse(text)
    }
}

fn parse_components(text: &str) -> Result<Duration, &'static str> {
    let mut scanner = Scanner::new(text);
    let negate = scanner.eat_sign();
    if !scanner.eat(b'P') {
        return Err("missing 'P' designator");
    }

    let days = scanner.component(b'D', false)?;
    let mut time = [None; 3];
    if scanner.eat(b'T') {
        time = [
            scanner.component(b'H', false)?,
            scanner.component(b'M', false)?,
            scanner.component(b'S', true)?,
        ];
        if time.iter().all(Option::is_none) {
            return Err("'T' must be followed by a time component");
        }
    }
    if scanner.pos != scanner.bytes.len() {
        return Err("unexpected text after the last component");
    }
    if days.is_none() && time.iter().all(Option::is_none) {
        return Err("no components");
    }

    let [hours, minutes, seconds] = time.map(Option::unwrap_or_default);
    let days = days.unwrap_or_default();

    let total = [
        (days.whole, SECONDS_PER_DAY),
        (hours.whole, SECONDS_PER_HOUR),
        (minutes.whole, SECONDS_PER_MINUTE),
        (seconds.whole, 1),
    ]
    .into_iter()
    .try_fold(0i64, |acc, (amount, per)| acc.checked_add(amount.checked_mul(per)?))
    .ok_or("numeric overflow")?;

    let duration =
        Duration::of_seconds_and_nanos(total, seconds.nanos).ok_or("numeric overflow")?;
    if negate {
        duration.checked_neg().ok_or("numeric overflow")
    } else {
        Ok(duration)
    }
}

// =============================================================================
// Formatting
// =============================================================================

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("PT0S");
        }

        let seconds = self.seconds();
        let nanos = i64::from(self.nanos());
        // A negative fraction borrows from the whole seconds.
        let effective = if seconds < 0 && nanos > 0 {
            seconds + 1
        } else {
            seconds
        };
        let hours = effective / SECONDS_PER_HOUR;
        let minutes = (effective % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
        let secs = effective % SECONDS_PER_MINUTE;

        let mut out = String::from("PT");
        if hours != 0 {
            out.push_str(&format!("{hours}H"));
        }
        if minutes != 0 {
            out.push_str(&format!("{minutes}M"));
        }
        if secs == 0 && nanos == 0 && out.len() > 2 {
            return f.write_str(&out);
        }

        if seconds < 0 && nanos > 0 && secs == 0 {
            out.push_str("-0");
        } else {
            out.push_str(&secs.to_string());
        }
        if nanos > 0 {
            let fraction = if seconds < 0 {
                2 * NANOS_PER_SECOND - nanos
            } else {
                nanos + NANOS_PER_SECOND
            };
            // Drop the leading carry digit and trailing zeros.
            let digits = fraction.to_string();
            out.push('.');
            out.push_str(digits[1..].trim_end_matches('0'));
        }
        out.push('S');
        f.write_str(&out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_iso8601_creation() {
        assert_eq!(Duration::parse("P1D").unwrap(), Duration::of_days(1));
        assert_eq!(Duration::parse("PT24H").unwrap(), Duration::of_days(1));
        assert_eq!(Duration::parse("PT1H").unwrap(), Duration::of_hours(1));
        assert_eq!(Duration::parse("PT1M").unwrap(), Duration::of_minutes(1));
        assert_eq!(Duration::parse("PT1S").unwrap(), Duration::of_seconds(1));
        assert_eq!(Duration::parse("PT0.001S").unwrap(), Duration::of_millis(1));
        assert_eq!(Duration::parse("PT0.000000001S").unwrap(), Duration::of_nanos(1));
        assert_eq!(
            Duration::parse("P2DT1H80M20.003000900S").unwrap(),
            Duration::of_days(2)
                .plus_hours(1)
                .plus_minutes(80)
                .plus_seconds(20)
                .plus_millis(3)
                .plus_nanos(900)
        );
    }

    #[test]
    fn test_parse_signs_and_case() {
        assert_eq!(Duration::parse("-PT6H3M").unwrap(), -Duration::of_minutes(363));
        assert_eq!(Duration::parse("PT-6H3M").unwrap(), Duration::of_minutes(-357));
        assert_eq!(Duration::parse("-PT-6H+3M").unwrap(), Duration::of_minutes(357));
        assert_eq!(Duration::parse("pt1.5s").unwrap(), Duration::of_millis(1_500));
        assert_eq!(Duration::parse("PT-0,5S").unwrap(), Duration::of_millis(-500));
        assert_eq!("+P1D".parse::<Duration>().unwrap(), Duration::of_days(1));
    }

    #[test]
    fn test_parse_rejects_malformed_text() {
        for text in ["", "P", "PT", "1D", "P1H", "PT1D", "PT1S1M", "P1DT", "PT1.S1", "PT0.0000000001S", "P1DX"] {
            assert!(
                matches!(Duration::parse(text), Err(TimeError::Parse { .. })),
                "{text:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_overflow() {
        assert!(Duration::parse("P9223372036854775807D").is_err());
        assert!(Duration::parse("PT99999999999999999999S").is_err());
        assert_eq!(
            Duration::parse("PT9223372036854775807S").unwrap(),
            Duration::of_seconds(i64::MAX)
        );
    }

    #[test]
    fn test_format() {
        assert_eq!(Duration::ZERO.to_string(), "PT0S");
        assert_eq!(Duration::of_days(2).to_string(), "PT48H");
        assert_eq!(Duration::of_seconds(3_661).to_string(), "PT1H1M1S");
        assert_eq!(Duration::of_millis(20_003).to_string(), "PT20.003S");
        assert_eq!(Duration::of_millis(-500).to_string(), "PT-0.5S");
        assert_eq!(Duration::of_millis(-1_500).to_string(), "PT-1.5S");
        assert_eq!(Duration::of_minutes(-61).to_string(), "PT-1H-1M");
        assert_eq!(Duration::of_nanos(1).to_string(), "PT0.000000001S");
    }

    #[test]
    fn test_canonical_form_round_trips() {
        let parsed = Duration::parse("PT50H20M20.003000900S").unwrap();
        assert_eq!(parsed.to_string(), "PT50H20M20.0030009S");
        assert_eq!(Duration::parse(&parsed.to_string()).unwrap(), parsed);
    }

    proptest! {
        #[test]
        fn prop_format_then_parse(seconds in -1_000_000_000_000i64..1_000_000_000_000, nanos in 0i64..1_000_000_000) {
            let duration = Duration::of_seconds_and_nanos(seconds, nanos).unwrap();
            prop_assert_eq!(Duration::parse(&duration.to_string()).unwrap(), duration);
        }
    }
}
