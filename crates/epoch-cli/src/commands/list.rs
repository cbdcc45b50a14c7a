//! List command for showing the recorded timeline.

use std::io::Write;

use anyhow::{Context, Result};
use epoch_core::{TimelineRepository, TimestampedEntry};

use super::util::{Align, render_table};

/// Formats the timeline as a human-readable table.
pub fn format_timeline(entries: &[TimestampedEntry]) -> String {
    if entries.is_empty() {
        return "No entries recorded.\n".to_string();
    }
    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|entry| {
            vec![
                entry.time.to_string(),
                entry.tlp.key().to_string(),
                entry.tlp.description().to_string(),
            ]
        })
        .collect();
    render_table(
        &[
            ("TIME", Align::Left),
            ("TLP", Align::Left),
            ("DESCRIPTION", Align::Left),
        ],
        &rows,
    )
}

/// Formats the timeline as JSON.
pub fn format_timeline_json(entries: &[TimestampedEntry]) -> Result<String> {
    serde_json::to_string_pretty(entries).context("failed to serialize timeline")
}

pub fn run<W, R>(writer: &mut W, timeline: &R, json: bool) -> Result<()>
where
    W: Write,
    R: TimelineRepository,
    R::Error: std::error::Error + Send + Sync + 'static,
{
    let entries = timeline.entries()?;
    if json {
        writeln!(writer, "{}", format_timeline_json(&entries)?)?;
    } else {
        write!(writer, "{}", format_timeline(&entries))?;
    }
    Ok(())
}
