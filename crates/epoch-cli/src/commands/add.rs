//! Add command for recording a switch to an activity code.

use std::io::Write;

use anyhow::Result;
use epoch_core::{TimelineRepository, TimestampedEntry};

use super::util::describe;
use crate::cli::TlpFields;
use crate::nickname;
use crate::parse::Clock;

/// Records that work switched to `tlp` at `time` (now when omitted).
///
/// An existing entry at the same minute is replaced.
pub fn run<W, R>(
    writer: &mut W,
    timeline: &mut R,
    clock: &Clock,
    tlp: &str,
    time: Option<&str>,
    fields: &TlpFields,
) -> Result<()>
where
    W: Write,
    R: TimelineRepository,
    R::Error: std::error::Error + Send + Sync + 'static,
{
    let tlp = nickname::resolve_tlp(tlp, fields)?;
    let time = clock.parse(time.unwrap_or_default())?;
    let description = describe(&tlp);

    timeline.add_entry(TimestampedEntry::new(tlp, time))?;
    tracing::debug!(%time, "added timeline entry");

    writeln!(writer, "Added {time} {description}")?;
    Ok(())
}
