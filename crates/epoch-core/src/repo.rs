//! Repository interfaces for the timeline and stored drift adjustments.
//!
//! Storage backends implement [`TimelineRepository`] and
//! [`AdjustmentsRepository`]; the in-memory versions here back tests and
//! short-lived sessions. [`CachedAdjustments`] decorates any adjustments
//! repository with a read cache.

use std::collections::BTreeMap;
use std::convert::Infallible;

use crate::duration::Duration;
use crate::entry::{RawDuration, TimestampedEntry};
use crate::time::Time;
use crate::tlp::TlpKey;
use crate::workflow::DriftLookup;

/// Storage for the day's timeline, one entry per clock time.
pub trait TimelineRepository {
    type Error;

    /// Stores an entry, replacing any entry at the same time.
    fn add_entry(&mut self, entry: TimestampedEntry) -> Result<(), Self::Error>;

    /// Returns all entries sorted by time ascending.
    fn entries(&self) -> Result<Vec<TimestampedEntry>, Self::Error>;

    /// Removes the entry at `time`. Returns whether one existed.
    fn remove_entry_at(&mut self, time: Time) -> Result<bool, Self::Error>;

    /// Replaces the code of the entry at `entry.time`. Returns whether one existed.
    fn update_entry_tlp(&mut self, entry: TimestampedEntry) -> Result<bool, Self::Error>;

    /// Removes every entry.
    fn clear(&mut self) -> Result<(), Self::Error>;
}

/// Storage for per-code starting drift.
///
/// An adjustment is a [`RawDuration`] whose duration is the drift the code
/// starts the next rounding pass with.
pub trait AdjustmentsRepository {
    type Error;

    fn all(&self) -> Result<Vec<RawDuration>, Self::Error>;

    fn get(&self, key: &TlpKey) -> Result<Option<RawDuration>, Self::Error>;

    /// Removes the adjustment for `key`. Returns whether one existed.
    fn remove(&mut self, key: &TlpKey) -> Result<bool, Self::Error>;

    /// Stores an adjustment, replacing any existing one for the same code.
    fn set(&mut self, adjustment: RawDuration) -> Result<(), Self::Error>;

    fn set_all(&mut self, adjustments: Vec<RawDuration>) -> Result<(), Self::Error> {
        for adjustment in adjustments {
            self.set(adjustment)?;
        }
        Ok(())
    }
}

/// In-memory timeline.
#[derive(Debug, Clone, Default)]
pub struct MemoryTimeline {
    entries: BTreeMap<Time, TimestampedEntry>,
}

impl MemoryTimeline {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TimelineRepository for MemoryTimeline {
    type Error = Infallible;

    fn add_entry(&mut self, entry: TimestampedEntry) -> Result<(), Self::Error> {
        self.entries.insert(entry.time, entry);
        Ok(())
    }

    fn entries(&self) -> Result<Vec<TimestampedEntry>, Self::Error> {
        Ok(self.entries.values().cloned().collect())
    }

    fn remove_entry_at(&mut self, time: Time) -> Result<bool, Self::Error> {
        Ok(self.entries.remove(&time).is_some())
    }

    fn update_entry_tlp(&mut self, entry: TimestampedEntry) -> Result<bool, Self::Error> {
        match self.entries.get_mut(&entry.time) {
            Some(existing) => {
                existing.tlp = entry.tlp;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.entries.clear();
        Ok(())
    }
}

/// In-memory adjustments, ordered by code identity.
#[derive(Debug, Clone, Default)]
pub struct MemoryAdjustments {
    storage: BTreeMap<TlpKey, RawDuration>,
}

impl MemoryAdjustments {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AdjustmentsRepository for MemoryAdjustments {
    type Error = Infallible;

    fn all(&self) -> Result<Vec<RawDuration>, Self::Error> {
        Ok(self.storage.values().cloned().collect())
    }

    fn get(&self, key: &TlpKey) -> Result<Option<RawDuration>, Self::Error> {
        Ok(self.storage.get(key).cloned())
    }

    fn remove(&mut self, key: &TlpKey) -> Result<bool, Self::Error> {
        Ok(self.storage.remove(key).is_some())
    }

    fn set(&mut self, adjustment: RawDuration) -> Result<(), Self::Error> {
        self.storage.insert(*adjustment.tlp.key(), adjustment);
        Ok(())
    }
}

impl DriftLookup for MemoryAdjustments {
    fn starting_drift(&self, key: &TlpKey) -> Option<Duration> {
        self.storage.get(key).map(|adjustment| adjustment.duration)
    }
}

/// Read cache in front of an adjustments repository.
///
/// Reads are served from the cache; writes go to the wrapped repository first
/// and update the cache only when they succeed. Operations the cache does not
/// decorate are reached through [`inner`](Self::inner).
#[derive(Debug)]
pub struct CachedAdjustments<R> {
    wrapped: R,
    cache: BTreeMap<TlpKey, RawDuration>,
}

impl<R: AdjustmentsRepository> CachedAdjustments<R> {
    /// Wraps a repository and loads its contents.
    pub fn new(wrapped: R) -> Result<Self, R::Error> {
        let mut cached = Self {
            wrapped,
            cache: BTreeMap::new(),
        };
        cached.invalidate()?;
        Ok(cached)
    }

    /// Reloads the cache from the wrapped repository.
    pub fn invalidate(&mut self) -> Result<(), R::Error> {
        self.cache = self
            .wrapped
            .all()?
            .into_iter()
            .map(|adjustment| (*adjustment.tlp.key(), adjustment))
            .collect();
        tracing::debug!(adjustments = self.cache.len(), "loaded adjustment cache");
        Ok(())
    }

    pub const fn inner(&self) -> &R {
        &self.wrapped
    }

    /// Mutable access to the wrapped repository.
    ///
    /// Writes made this way bypass the cache; call [`invalidate`](Self::invalidate)
    /// afterwards.
    pub const fn inner_mut(&mut self) -> &mut R {
        &mut self.wrapped
    }

    pub fn into_inner(self) -> R {
        self.wrapped
    }
}

impl<R: AdjustmentsRepository> AdjustmentsRepository for CachedAdjustments<R> {
    type Error = R::Error;

    fn all(&self) -> Result<Vec<RawDuration>, Self::Error> {
        Ok(self.cache.values().cloned().collect())
    }

    fn get(&self, key: &TlpKey) -> Result<Option<RawDuration>, Self::Error> {
        Ok(self.cache.get(key).cloned())
    }

    fn remove(&mut self, key: &TlpKey) -> Result<bool, Self::Error> {
        let removed = self.wrapped.remove(key)?;
        self.cache.remove(key);
        Ok(removed)
    }

    fn set(&mut self, adjustment: RawDuration) -> Result<(), Self::Error> {
        self.wrapped.set(adjustment.clone())?;
        self.cache.insert(*adjustment.tlp.key(), adjustment);
        Ok(())
    }

    fn set_all(&mut self, adjustments: Vec<RawDuration>) -> Result<(), Self::Error> {
        self.wrapped.set_all(adjustments.clone())?;
        self.cache.extend(
            adjustments
                .into_iter()
                .map(|adjustment| (*adjustment.tlp.key(), adjustment)),
        );
        Ok(())
    }
}

impl<R> DriftLookup for CachedAdjustments<R> {
    fn starting_drift(&self, key: &TlpKey) -> Option<Duration> {
        self.cache.get(key).map(|adjustment| adjustment.duration)
    }
}
