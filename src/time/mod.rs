//! Durations, points in time and clocks.
//!
//! [`Duration`] is a signed seconds-plus-nanoseconds amount with ISO-8601
//! text support. Points in time are plain chrono values wrapped by
//! [`Temporal`] when they need to be compared across kinds.
//!
//! # Example
//!
//! ```
//! use stdlib_tour::time::{parse_instant, Clock, Duration, FixedClock};
//! use chrono::FixedOffset;
//!
//! let now = parse_instant("2000-01-05T00:00:00Z").unwrap();
//! let clock = FixedClock::new(now, FixedOffset::east_opt(0).unwrap());
//! assert_eq!(clock.instant(), now);
//!
//! let start = parse_instant("2000-01-01T00:00:00Z").unwrap();
//! assert_eq!(Duration::between(start, clock.instant()).unwrap(), Duration::of_days(4));
//! ```

mod clock;
mod duration;
mod error;
mod iso;
mod temporal;

pub use clock::{Clock, FixedClock, OffsetClock, SystemClock};
pub use duration::{Duration, TimeUnit};
pub use error::{TimeError, TimeResult};
pub use temporal::{parse_instant, Adjust, Temporal};
