//! Edit command for retagging a timeline entry.

use std::io::Write;

use anyhow::{Result, bail};
use epoch_core::{TimelineRepository, TimestampedEntry};

use super::util::describe;
use crate::cli::TlpFields;
use crate::nickname;
use crate::parse::Clock;

/// Replaces the activity code of the entry at `time`.
pub fn run<W, R>(
    writer: &mut W,
    timeline: &mut R,
    clock: &Clock,
    time: &str,
    tlp: &str,
    fields: &TlpFields,
) -> Result<()>
where
    W: Write,
    R: TimelineRepository,
    R::Error: std::error::Error + Send + Sync + 'static,
{
    let time = clock.parse(time)?;
    let tlp = nickname::resolve_tlp(tlp, fields)?;
    let description = describe(&tlp);

    if !timeline.update_entry_tlp(TimestampedEntry::new(tlp, time))? {
        bail!("no entry recorded at {time}");
    }
    writeln!(writer, "Changed {time} to {description}")?;
    Ok(())
}
