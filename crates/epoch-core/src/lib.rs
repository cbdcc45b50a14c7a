//! Core domain logic for the epoch time tracker.
//!
//! This crate contains the fundamental types and logic for:
//! - Clock arithmetic: [`Time`] and signed [`Duration`]s
//! - Activity codes: [`Tlp`] values and their [`TlpKey`] identity
//! - Rounding: drift-aware quarter-hour rounding of raw durations
//! - Workflow: the timeline-to-rounded-durations pipeline
//! - Repositories: storage interfaces for timelines and stored drift

mod duration;
mod entry;
mod error;
pub mod repo;
mod rounding;
mod time;
mod tlp;
pub mod workflow;

pub use duration::Duration;
pub use entry::{RawDuration, TimestampedEntry};
pub use error::{CoreError, IncompatibleCodes, InvalidTime, ParseTimeError};
pub use repo::{
    AdjustmentsRepository, CachedAdjustments, MemoryAdjustments, MemoryTimeline,
    TimelineRepository,
};
pub use rounding::{DriftCarryingDuration, RoundedDuration};
pub use time::Time;
pub use tlp::{Tlp, TlpKey};
pub use workflow::{AdjustmentStage, DriftLookup, RoundingOverride, Workflow};
