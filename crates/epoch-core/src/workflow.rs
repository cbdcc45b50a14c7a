//! The entries-to-rounded-durations pipeline.
//!
//! # Stages
//!
//! 1. [`pairwise_durations`]: consecutive entries become raw durations
//! 2. [`merge_by_code`]: durations with the same identity are summed
//! 3. [`apply_manual_adjustments`]: each code picks up its stored starting drift
//! 4. [`round_sequence`]: a left-to-right fold of drift-aware rounding
//! 5. [`AdjustmentStage`]s: pluggable passes over the rounded sequence
//!
//! Stage 4 is order sensitive: every decision consumes the drift produced by
//! the decision before it, so the sequence must not be reordered or split.

use std::collections::HashMap;
use std::fmt;

use crate::duration::Duration;
use crate::entry::{RawDuration, TimestampedEntry};
use crate::error::{CoreError, IncompatibleCodes};
use crate::rounding::{DriftCarryingDuration, RoundedDuration};
use crate::tlp::TlpKey;

/// Source of per-code starting drift.
///
/// Codes without a stored drift start at zero.
pub trait DriftLookup {
    /// Returns the stored starting drift for a code, if any.
    fn starting_drift(&self, key: &TlpKey) -> Option<Duration>;
}

/// Drift stored as whole minutes.
impl DriftLookup for HashMap<TlpKey, i64> {
    fn starting_drift(&self, key: &TlpKey) -> Option<Duration> {
        self.get(key).copied().map(Duration::from_minutes)
    }
}

impl DriftLookup for HashMap<TlpKey, Duration> {
    fn starting_drift(&self, key: &TlpKey) -> Option<Duration> {
        self.get(key).copied()
    }
}

/// Manual choice of rounding direction for a code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoundingOverride {
    Up,
    Down,
}

/// A pass over the complete rounded sequence.
pub trait AdjustmentStage {
    /// Name used in logs.
    fn name(&self) -> &str;

    fn apply(&self, rounded: Vec<RoundedDuration>) -> Vec<RoundedDuration>;
}

impl<F> AdjustmentStage for F
where
    F: Fn(Vec<RoundedDuration>) -> Vec<RoundedDuration>,
{
    fn name(&self) -> &str {
        "custom"
    }

    fn apply(&self, rounded: Vec<RoundedDuration>) -> Vec<RoundedDuration> {
        self(rounded)
    }
}

/// Travel time adjustment. Currently passes the sequence through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct TravelTime;

impl AdjustmentStage for TravelTime {
    fn name(&self) -> &str {
        "travel_time"
    }

    fn apply(&self, rounded: Vec<RoundedDuration>) -> Vec<RoundedDuration> {
        rounded
    }
}

/// First-entry-of-the-day adjustment. Currently passes the sequence through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstEntry;

impl AdjustmentStage for FirstEntry {
    fn name(&self) -> &str {
        "first_entry"
    }

    fn apply(&self, rounded: Vec<RoundedDuration>) -> Vec<RoundedDuration> {
        rounded
    }
}

/// Full-day adjustment. Currently passes the sequence through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct FullDay;

impl AdjustmentStage for FullDay {
    fn name(&self) -> &str {
        "full_day"
    }

    fn apply(&self, rounded: Vec<RoundedDuration>) -> Vec<RoundedDuration> {
        rounded
    }
}

/// Turns each pair of consecutive entries into the time spent on the first.
///
/// Entries must be sorted by time ascending. Fewer than two entries yield
/// nothing.
pub fn pairwise_durations(entries: &[TimestampedEntry]) -> Vec<RawDuration> {
    entries
        .windows(2)
        .map(|pair| pair[0].to_next(&pair[1]))
        .collect()
}

/// Sums durations per code identity, keeping the order of first occurrence.
pub fn merge_by_code(durations: Vec<RawDuration>) -> Result<Vec<RawDuration>, IncompatibleCodes> {
    let mut positions: HashMap<TlpKey, usize> = HashMap::new();
    let mut merged: Vec<RawDuration> = Vec::new();

    for duration in durations {
        if let Some(&index) = positions.get(duration.tlp.key()) {
            // Grouped by key, so the identities always match.
            merged[index] = merged[index].combine(&duration)?;
        } else {
            positions.insert(*duration.tlp.key(), merged.len());
            merged.push(duration);
        }
    }

    Ok(merged)
}

/// Attaches each code's stored starting drift, defaulting to zero.
pub fn apply_manual_adjustments<L>(merged: Vec<RawDuration>, lookup: &L) -> Vec<DriftCarryingDuration>
where
    L: DriftLookup + ?Sized,
{
    merged
        .into_iter()
        .map(|raw| {
            let drift = lookup.starting_drift(raw.tlp.key()).unwrap_or_else(|| {
                tracing::trace!(code = %raw.tlp.key(), "no stored drift, starting at zero");
                Duration::ZERO
            });
            raw.with_drift(drift)
        })
        .collect()
}

/// Rounds every item, carrying drift from each decision into the next.
///
/// The drift entering item `i` is the drift left by item `i - 1` plus item
/// `i`'s own starting drift.
pub fn round_sequence(items: &[DriftCarryingDuration]) -> Vec<RoundedDuration> {
    round_sequence_with_overrides(items, &HashMap::new())
}

/// Like [`round_sequence`], but codes listed in `overrides` are forced in the
/// given direction instead of picking the drift-minimizing one.
pub fn round_sequence_with_overrides(
    items: &[DriftCarryingDuration],
    overrides: &HashMap<TlpKey, RoundingOverride>,
) -> Vec<RoundedDuration> {
    let mut carried = Duration::ZERO;
    let mut rounded = Vec::with_capacity(items.len());

    for item in items {
        let step = item.raw.clone().with_drift(carried + item.accumulated_drift);
        let result = match overrides.get(item.raw.tlp.key()) {
            Some(RoundingOverride::Up) => step.force_round_up(),
            Some(RoundingOverride::Down) => step.force_round_down(),
            None => step.round(),
        };
        tracing::trace!(
            code = %item.raw.tlp.key(),
            duration = %result.duration(),
            adjustment = %result.adjustment(),
            drift = %result.new_accumulated_drift(),
            "rounded"
        );
        carried = result.new_accumulated_drift();
        rounded.push(result);
    }

    rounded
}

/// An explicitly composed rounding pipeline.
pub struct Workflow {
    stages: Vec<Box<dyn AdjustmentStage>>,
    overrides: HashMap<TlpKey, RoundingOverride>,
}

impl Workflow {
    /// Creates a workflow running the given adjustment stages in order.
    pub fn new(stages: Vec<Box<dyn AdjustmentStage>>) -> Self {
        Self {
            stages,
            overrides: HashMap::new(),
        }
    }

    /// Appends an adjustment stage.
    #[must_use]
    pub fn with_stage(mut self, stage: impl AdjustmentStage + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Forces the rounding direction for the given codes.
    #[must_use]
    pub fn with_overrides(mut self, overrides: HashMap<TlpKey, RoundingOverride>) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// Runs every stage over a time-ordered timeline.
    pub fn run<L>(
        &self,
        entries: &[TimestampedEntry],
        lookup: &L,
    ) -> Result<Vec<RoundedDuration>, CoreError>
    where
        L: DriftLookup + ?Sized,
    {
        let raw = pairwise_durations(entries);
        tracing::debug!(entries = entries.len(), durations = raw.len(), "paired entries");

        let merged = merge_by_code(raw)?;
        tracing::debug!(codes = merged.len(), "merged durations by code");

        let carrying = apply_manual_adjustments(merged, lookup);
        let mut rounded = round_sequence_with_overrides(&carrying, &self.overrides);

        for stage in &self.stages {
            rounded = stage.apply(rounded);
            tracing::debug!(stage = stage.name(), rows = rounded.len(), "applied adjustment stage");
        }

        Ok(rounded)
    }
}

impl Default for Workflow {
    fn default() -> Self {
        Self::new(vec![
            Box::new(TravelTime),
            Box::new(FirstEntry),
            Box::new(FullDay),
        ])
    }
}

impl fmt::Debug for Workflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Workflow")
            .field("stages", &self.stage_names())
            .field("overrides", &self.overrides)
            .finish()
    }
}
