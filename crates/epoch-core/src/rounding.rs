//! Drift-aware quarter-hour rounding.
//!
//! Each duration is rounded up or down to a quarter hour, whichever leaves the
//! running total of past adjustments (the accumulated drift) closer to zero.
//! Rounding an entry therefore counterbalances the error introduced by the
//! entries before it, rather than minimizing its own adjustment.

use std::cmp::Ordering;

use crate::duration::Duration;
use crate::entry::RawDuration;
use crate::tlp::Tlp;

/// A raw duration paired with the drift accumulated by earlier roundings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriftCarryingDuration {
    pub raw: RawDuration,
    pub accumulated_drift: Duration,
}

impl DriftCarryingDuration {
    pub const fn new(raw: RawDuration, accumulated_drift: Duration) -> Self {
        Self {
            raw,
            accumulated_drift,
        }
    }

    /// Rounds in the direction that minimizes the resulting drift magnitude.
    pub fn round(&self) -> RoundedDuration {
        let adjustment = self
            .raw
            .duration
            .best_quarter_adjustment(self.accumulated_drift);
        self.rounded_with(adjustment)
    }

    /// Rounds up to the next quarter hour regardless of drift.
    pub fn force_round_up(&self) -> RoundedDuration {
        self.rounded_with(self.raw.duration.distance_up_to_next_quarter())
    }

    /// Rounds down to the previous quarter hour regardless of drift.
    pub fn force_round_down(&self) -> RoundedDuration {
        self.rounded_with(self.raw.duration.distance_down_to_previous_quarter())
    }

    fn rounded_with(&self, adjustment: Duration) -> RoundedDuration {
        RoundedDuration {
            tlp: self.raw.tlp.clone(),
            duration: self.raw.duration,
            adjustment,
            accumulated_drift: self.accumulated_drift,
        }
    }
}

/// The outcome of one rounding decision.
///
/// Orders by `(new_accumulated_drift, adjusted_duration)`; the remaining
/// fields only break ties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundedDuration {
    tlp: Tlp,
    duration: Duration,
    adjustment: Duration,
    accumulated_drift: Duration,
}

impl RoundedDuration {
    pub const fn tlp(&self) -> &Tlp {
        &self.tlp
    }

    /// The duration before rounding.
    pub const fn duration(&self) -> Duration {
        self.duration
    }

    /// The signed amount added to reach a quarter hour.
    pub const fn adjustment(&self) -> Duration {
        self.adjustment
    }

    /// The drift carried into this decision.
    pub const fn accumulated_drift(&self) -> Duration {
        self.accumulated_drift
    }

    /// The rounded, quarter-aligned duration.
    pub fn adjusted_duration(&self) -> Duration {
        self.duration + self.adjustment
    }

    /// The drift to carry into the next decision.
    pub fn new_accumulated_drift(&self) -> Duration {
        self.accumulated_drift + self.adjustment
    }

    /// Recomputes this decision rounding up.
    #[must_use]
    pub fn force_round_up(&self) -> Self {
        self.as_drift_carrying().force_round_up()
    }

    /// Recomputes this decision rounding down.
    #[must_use]
    pub fn force_round_down(&self) -> Self {
        self.as_drift_carrying().force_round_down()
    }

    fn as_drift_carrying(&self) -> DriftCarryingDuration {
        RawDuration::new(self.tlp.clone(), self.duration).with_drift(self.accumulated_drift)
    }
}

impl PartialOrd for RoundedDuration {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RoundedDuration {
    fn cmp(&self, other: &Self) -> Ordering {
        self.new_accumulated_drift()
            .cmp(&other.new_accumulated_drift())
            .then_with(|| self.adjusted_duration().cmp(&other.adjusted_duration()))
            .then_with(|| self.duration.cmp(&other.duration))
            .then_with(|| self.tlp.key().cmp(other.tlp.key()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mins(m: i64) -> Duration {
        Duration::from_minutes(m)
    }

    fn carrying(code: i64, minutes: i64, drift: i64) -> DriftCarryingDuration {
        RawDuration::new(Tlp::new(code, "work"), mins(minutes)).with_drift(mins(drift))
    }

    #[test]
    fn rounds_down_when_down_leaves_less_drift() {
        let rounded = carrying(0, 457, 0).round();
        assert_eq!(rounded.duration(), mins(457));
        assert_eq!(rounded.adjustment(), mins(-7));
        assert_eq!(rounded.adjusted_duration(), mins(450));
        assert_eq!(rounded.new_accumulated_drift(), mins(-7));
    }

    #[test]
    fn rounds_up_to_counterbalance_negative_drift() {
        let rounded = carrying(0, 457, -7).round();
        assert_eq!(rounded.adjustment(), mins(8));
        assert_eq!(rounded.adjusted_duration(), mins(465));
        assert_eq!(rounded.new_accumulated_drift(), mins(1));
    }

    #[test]
    fn aligned_duration_keeps_drift() {
        let rounded = carrying(-2, 30, -7).round();
        assert_eq!(rounded.adjustment(), Duration::ZERO);
        assert_eq!(rounded.adjusted_duration(), mins(30));
        assert_eq!(rounded.new_accumulated_drift(), mins(-7));
    }

    #[test]
    fn result_invariants_hold() {
        for minutes in 0..=90 {
            for drift in -20..=20 {
                let item = carrying(1, minutes, drift);
                let rounded = item.round();
                assert_eq!(
                    rounded.adjusted_duration(),
                    rounded.duration() + rounded.adjustment()
                );
                assert_eq!(
                    rounded.new_accumulated_drift(),
                    rounded.accumulated_drift() + rounded.adjustment()
                );
                assert!(rounded.adjusted_duration().is_quarter_aligned());

                let up = item.force_round_up().new_accumulated_drift().abs();
                let down = item.force_round_down().new_accumulated_drift().abs();
                assert_eq!(rounded.new_accumulated_drift().abs(), up.min(down));
            }
        }
    }

    #[test]
    fn forced_rounding_ignores_drift() {
        let item = carrying(0, 457, 0);
        let up = item.force_round_up();
        assert_eq!(up.adjustment(), mins(8));
        assert_eq!(up.adjusted_duration(), mins(465));
        assert_eq!(up.new_accumulated_drift(), mins(8));

        let down = carrying(0, 457, -20).force_round_down();
        assert_eq!(down.adjustment(), mins(-7));
        assert_eq!(down.new_accumulated_drift(), mins(-27));
    }

    #[test]
    fn forcing_an_existing_result_recomputes_from_original() {
        let rounded = carrying(0, 457, 0).round();
        let up = rounded.force_round_up();
        assert_eq!(up.adjustment(), mins(8));
        assert_eq!(up.accumulated_drift(), Duration::ZERO);
        assert_eq!(up.force_round_down(), rounded);
    }

    #[test]
    fn orders_by_new_drift_then_adjusted_duration() {
        let small_drift = carrying(1, 61, 0).round(); // -1 drift, 60m
        let large_drift = carrying(2, 59, 0).round(); // +1 drift, 60m
        let same_drift_longer = carrying(3, 121, 0).round(); // -1 drift, 120m

        let mut all = vec![
            large_drift.clone(),
            same_drift_longer.clone(),
            small_drift.clone(),
        ];
        all.sort();
        assert_eq!(all, vec![small_drift, same_drift_longer, large_drift]);
    }
}
