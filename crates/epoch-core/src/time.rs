//! Points on a single 24-hour clock.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::duration::Duration;
use crate::error::{InvalidTime, ParseTimeError};

const MINUTES_PER_HOUR: i64 = 60;
const HOURS_PER_DAY: i64 = 24;

/// A normalized clock time between `00:00` and `23:59`.
///
/// Ordering is lexicographic on `(hour, minute)`. Times never wrap past
/// midnight; arithmetic that would leave the day fails with [`InvalidTime`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Time {
    hour: u8,
    minute: u8,
}

impl Time {
    /// Creates a time, carrying whole hours out of (or borrowing them into) the minute.
    ///
    /// `Time::new(9, 75)` is 10:15 and `Time::new(10, -5)` is 09:55. Fails when
    /// the carried hour falls outside `0..=23`.
    pub fn new(hour: i64, minute: i64) -> Result<Self, InvalidTime> {
        let carried_hour = hour.saturating_add(minute.div_euclid(MINUTES_PER_HOUR));
        let minute = minute.rem_euclid(MINUTES_PER_HOUR);
        let invalid = InvalidTime {
            hour: carried_hour,
            minute,
        };
        if !(0..HOURS_PER_DAY).contains(&carried_hour) {
            return Err(invalid);
        }
        Ok(Self {
            hour: u8::try_from(carried_hour).map_err(|_| invalid)?,
            minute: u8::try_from(minute).map_err(|_| invalid)?,
        })
    }

    /// Creates a time from minutes elapsed since midnight.
    pub fn from_minute_of_day(minutes: i64) -> Result<Self, InvalidTime> {
        Self::new(0, minutes)
    }

    pub const fn hour(self) -> u8 {
        self.hour
    }

    pub const fn minute(self) -> u8 {
        self.minute
    }

    /// Returns `(hour, minute)`.
    pub const fn components(self) -> (u8, u8) {
        (self.hour, self.minute)
    }

    /// Minutes elapsed since midnight.
    pub fn minute_of_day(self) -> i64 {
        i64::from(self.hour) * MINUTES_PER_HOUR + i64::from(self.minute)
    }

    /// The non-negative gap between two times, regardless of argument order.
    pub fn time_between(self, other: Self) -> Duration {
        let (earlier, later) = if self <= other {
            (self, other)
        } else {
            (other, self)
        };
        Duration::from_minutes(later.minute_of_day() - earlier.minute_of_day())
    }

    /// Moves this time forward by a signed duration.
    pub fn checked_add(self, duration: Duration) -> Result<Self, InvalidTime> {
        self.shifted(i64::from(self.minute).checked_add(duration.total_minutes()))
    }

    /// Moves this time backward by a signed duration.
    pub fn checked_sub(self, duration: Duration) -> Result<Self, InvalidTime> {
        self.shifted(i64::from(self.minute).checked_sub(duration.total_minutes()))
    }

    /// Rebuilds this time with a new minute count, `None` meaning it overflowed.
    fn shifted(self, minute: Option<i64>) -> Result<Self, InvalidTime> {
        let hour = i64::from(self.hour);
        let minute = minute.ok_or(InvalidTime {
            hour,
            minute: i64::from(self.minute),
        })?;
        Self::new(hour, minute)
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Parses a strict 24-hour `H:MM` or `HH:MM` string.
impl FromStr for Time {
    type Err = ParseTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ParseTimeError::Malformed {
            input: s.to_string(),
        };
        let (hour, minute) = s.split_once(':').ok_or_else(malformed)?;
        let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(hour) || minute.len() != 2 || !all_digits(minute) {
            return Err(malformed());
        }
        let hour: i64 = hour.parse().map_err(|_| malformed())?;
        let minute: i64 = minute.parse().map_err(|_| malformed())?;
        if minute >= MINUTES_PER_HOUR {
            return Err(InvalidTime { hour, minute }.into());
        }
        Ok(Self::new(hour, minute)?)
    }
}

impl TryFrom<String> for Time {
    type Error = ParseTimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Time> for String {
    fn from(time: Time) -> Self {
        time.to_string()
    }
}
