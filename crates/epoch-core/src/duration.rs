//! Signed spans of clock time and the quarter-hour rounding primitives.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Neg, Sub};

use serde::{Deserialize, Serialize};

const MINUTES_PER_HOUR: i64 = 60;

/// Length of one rounding step in minutes.
const QUARTER_MINUTES: i64 = 15;

/// A signed span of time, stored as total minutes.
///
/// [`hours`](Self::hours) and [`minutes`](Self::minutes) return the normalized
/// magnitude (`0 <= minutes < 60`); the sign is reported separately by
/// [`is_negative`](Self::is_negative). Zero is never negative.
///
/// Arithmetic saturates at the bounds of the minute count.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Duration {
    total_minutes: i64,
}

impl Duration {
    /// The empty duration.
    pub const ZERO: Self = Self::from_minutes(0);

    /// Fifteen minutes, the rounding granularity.
    pub const QUARTER_HOUR: Self = Self::from_minutes(QUARTER_MINUTES);

    /// Creates a duration from a signed hour and minute pair.
    ///
    /// The parts may have mixed signs: `Duration::new(1, -30)` is thirty minutes.
    pub const fn new(hours: i64, minutes: i64) -> Self {
        Self::from_minutes(hours.saturating_mul(MINUTES_PER_HOUR).saturating_add(minutes))
    }

    /// Creates a duration from a signed minute count.
    pub const fn from_minutes(minutes: i64) -> Self {
        Self {
            total_minutes: minutes,
        }
    }

    /// Returns the signed total number of minutes.
    pub const fn total_minutes(self) -> i64 {
        self.total_minutes
    }

    /// Returns the whole hours of the magnitude.
    pub const fn hours(self) -> i64 {
        self.total_minutes.saturating_abs() / MINUTES_PER_HOUR
    }

    /// Returns the minutes of the magnitude past the whole hours, in `0..60`.
    pub const fn minutes(self) -> i64 {
        self.total_minutes.saturating_abs() % MINUTES_PER_HOUR
    }

    pub const fn is_negative(self) -> bool {
        self.total_minutes < 0
    }

    #[must_use]
    pub const fn abs(self) -> Self {
        Self::from_minutes(self.total_minutes.saturating_abs())
    }

    /// Whether the minute component is a multiple of fifteen.
    pub const fn is_quarter_aligned(self) -> bool {
        self.minutes() % QUARTER_MINUTES == 0
    }

    /// Smallest non-negative amount (at most 14 minutes) that makes this
    /// duration quarter aligned when added to it.
    #[must_use]
    pub const fn distance_up_to_next_quarter(self) -> Self {
        Self::from_minutes(
            (QUARTER_MINUTES - self.total_minutes.rem_euclid(QUARTER_MINUTES)) % QUARTER_MINUTES,
        )
    }

    /// Non-positive amount (at least -14 minutes) that makes this duration
    /// quarter aligned when added to it. Zero when already aligned.
    #[must_use]
    pub const fn distance_down_to_previous_quarter(self) -> Self {
        let up = self.distance_up_to_next_quarter().total_minutes;
        if up == 0 {
            Self::ZERO
        } else {
            Self::from_minutes(up - QUARTER_MINUTES)
        }
    }

    /// Both rounding candidates as `(up, down)`.
    ///
    /// `down <= 0 <= up`, and `up - down` is fifteen minutes unless both are zero.
    pub const fn quarter_adjustments(self) -> (Self, Self) {
        (
            self.distance_up_to_next_quarter(),
            self.distance_down_to_previous_quarter(),
        )
    }

    /// Picks the rounding candidate that leaves the smaller drift magnitude.
    ///
    /// Rounding up wins only when `|drift + up|` is strictly smaller than
    /// `|drift + down|`; equal magnitudes round down.
    #[must_use]
    pub fn best_quarter_adjustment(self, accumulated_drift: Self) -> Self {
        let (up, down) = self.quarter_adjustments();
        if (accumulated_drift + up).abs() < (accumulated_drift + down).abs() {
            up
        } else {
            down
        }
    }
}

impl Add for Duration {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::from_minutes(self.total_minutes.saturating_add(rhs.total_minutes))
    }
}

impl Sub for Duration {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::from_minutes(self.total_minutes.saturating_sub(rhs.total_minutes))
    }
}

impl Neg for Duration {
    type Output = Self;

    fn neg(self) -> Self {
        Self::from_minutes(self.total_minutes.saturating_neg())
    }
}

impl Sum for Duration {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Self> for Duration {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Formats as `Xh Ym` when at least an hour, otherwise `Ym`.
impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let hours = self.hours();
        let minutes = self.minutes();
        if hours > 0 {
            write!(f, "{sign}{hours}h {minutes}m")
        } else {
            write!(f, "{sign}{minutes}m")
        }
    }
}
