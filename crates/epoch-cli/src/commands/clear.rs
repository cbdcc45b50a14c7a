//! Clear command for starting a fresh timeline.

use std::io::Write;

use anyhow::Result;
use epoch_core::TimelineRepository;

/// Removes every timeline entry. Stored drift is kept.
pub fn run<W, R>(writer: &mut W, timeline: &mut R) -> Result<()>
where
    W: Write,
    R: TimelineRepository,
    R::Error: std::error::Error + Send + Sync + 'static,
{
    let removed = timeline.entries()?.len();
    timeline.clear()?;
    tracing::debug!(removed, "cleared timeline");
    writeln!(writer, "Cleared {removed} entries")?;
    Ok(())
}
