//! Free-time parsing, clocks and countdowns.
//!
//! Free-time values are kept as the text the user typed and parsed on demand.
//! Every parse returns an explicit `Result`; callers decide whether a failure
//! means "contributes nothing" (matching, reminders) or "show a placeholder"
//! (countdowns).

use std::cell::Cell;
use std::fmt;

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::FreeTimeError;

/// Wall-clock layouts accepted for a free-time slot, tried in order.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parse a free-time string into a local wall-clock timestamp.
///
/// Accepts `YYYY-MM-DD HH:MM[:SS[.fff]]` (space or `T` separated), RFC 3339
/// with an offset (reduced to the wall-clock time in that offset) and a bare
/// `YYYY-MM-DD`, which means midnight.
pub fn parse_free_time(input: &str) -> Result<NaiveDateTime, FreeTimeError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(FreeTimeError::Empty);
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(parsed);
        }
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.naive_local());
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN));
    }

    Err(FreeTimeError::Unrecognized {
        input: trimmed.to_string(),
    })
}

/// Source of "now" for a session.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;

    /// Calendar day used for streak bookkeeping.
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Reads the local system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock that only moves when told to.
///
/// Used by tests and by scripted shell sessions pinned with `--now`.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Cell<NaiveDateTime>,
}

impl ManualClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Cell::new(now),
        }
    }

    pub fn set(&self, now: NaiveDateTime) {
        self.now.set(now);
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        self.now.get()
    }
}

/// Time left until a group's free-time slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    Remaining(Duration),
    Passed,
    Unavailable,
}

impl Countdown {
    pub fn until(free_time: &str, now: NaiveDateTime) -> Self {
        match parse_free_time(free_time) {
            Ok(at) => {
                let left = at - now;
                if left > Duration::zero() {
                    Countdown::Remaining(left)
                } else {
                    Countdown::Passed
                }
            }
            Err(_) => Countdown::Unavailable,
        }
    }

    /// Whole seconds left, if the slot is still ahead.
    pub fn remaining_secs(&self) -> Option<i64> {
        match self {
            Countdown::Remaining(left) => Some(left.num_seconds()),
            _ => None,
        }
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Countdown::Remaining(left) => {
                let secs = left.num_seconds();
                write!(
                    f,
                    "{:02}:{:02}:{:02}",
                    secs / 3600,
                    (secs % 3600) / 60,
                    secs % 60
                )
            }
            Countdown::Passed => f.write_str("passed"),
            Countdown::Unavailable => f.write_str("unknown"),
        }
    }
}

/// True when `free_time` is strictly ahead of `now` by no more than `lead`.
pub fn starts_within(free_time: &str, now: NaiveDateTime, lead: Duration) -> bool {
    match parse_free_time(free_time) {
        Ok(at) => {
            let left = at - now;
            left > Duration::zero() && left <= lead
        }
        Err(_) => false,
    }
}
