//! Timeline entries and the raw durations derived from them.

use serde::{Deserialize, Serialize};

use crate::duration::Duration;
use crate::error::IncompatibleCodes;
use crate::rounding::DriftCarryingDuration;
use crate::time::Time;
use crate::tlp::Tlp;

/// An activity code the user switched to at a clock time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampedEntry {
    pub tlp: Tlp,
    pub time: Time,
}

impl TimestampedEntry {
    pub const fn new(tlp: Tlp, time: Time) -> Self {
        Self { tlp, time }
    }

    /// Time spent on this entry's code until the next entry started.
    pub fn to_next(&self, next: &Self) -> RawDuration {
        RawDuration::new(self.tlp.clone(), self.time.time_between(next.time))
    }
}

/// Unrounded time attributed to an activity code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDuration {
    pub tlp: Tlp,
    pub duration: Duration,
}

impl RawDuration {
    pub const fn new(tlp: Tlp, duration: Duration) -> Self {
        Self { tlp, duration }
    }

    /// Sums two durations for the same code.
    pub fn combine(&self, other: &Self) -> Result<Self, IncompatibleCodes> {
        Ok(Self {
            tlp: self.tlp.combine(&other.tlp)?,
            duration: self.duration + other.duration,
        })
    }

    /// Pairs this duration with the drift accumulated before it.
    pub const fn with_drift(self, accumulated_drift: Duration) -> DriftCarryingDuration {
        DriftCarryingDuration::new(self, accumulated_drift)
    }

    pub const fn with_no_drift(self) -> DriftCarryingDuration {
        self.with_drift(Duration::ZERO)
    }
}
