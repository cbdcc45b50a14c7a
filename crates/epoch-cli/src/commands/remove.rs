//! Remove command for deleting a single timeline entry.

use std::io::Write;

use anyhow::{Result, bail};
use epoch_core::TimelineRepository;

use crate::parse::Clock;

pub fn run<W, R>(writer: &mut W, timeline: &mut R, clock: &Clock, time: &str) -> Result<()>
where
    W: Write,
    R: TimelineRepository,
    R::Error: std::error::Error + Send + Sync + 'static,
{
    let time = clock.parse(time)?;
    if !timeline.remove_entry_at(time)? {
        bail!("no entry recorded at {time}");
    }
    writeln!(writer, "Removed entry at {time}")?;
    Ok(())
}
