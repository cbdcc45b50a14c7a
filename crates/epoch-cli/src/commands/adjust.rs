//! Adjust commands for managing stored starting drift.
//!
//! A stored drift is the rounding error carried over from earlier reports for
//! one activity code. The report feeds it into that code's rounding decision.

use std::io::Write;

use anyhow::{Context, Result, bail};
use epoch_core::{AdjustmentsRepository, Duration, RawDuration};

use super::util::{Align, describe, render_table, signed};
use crate::cli::TlpFields;
use crate::nickname;

/// Largest stored drift magnitude accepted, one day of minutes.
pub const MAX_STORED_DRIFT_MINUTES: u64 = 24 * 60;

/// Stores `minutes` as the starting drift of a code, replacing any previous value.
pub fn set<W, R>(
    writer: &mut W,
    adjustments: &mut R,
    tlp: &str,
    minutes: i64,
    fields: &TlpFields,
) -> Result<()>
where
    W: Write,
    R: AdjustmentsRepository,
    R::Error: std::error::Error + Send + Sync + 'static,
{
    if minutes.unsigned_abs() > MAX_STORED_DRIFT_MINUTES {
        bail!("drift {minutes} is out of range: use at most {MAX_STORED_DRIFT_MINUTES} minutes either way");
    }
    let tlp = nickname::resolve_tlp(tlp, fields)?;
    let drift = Duration::from_minutes(minutes);
    let description = describe(&tlp);

    adjustments.set(RawDuration::new(tlp, drift))?;
    writeln!(writer, "Stored drift {} for {description}", signed(drift))?;
    Ok(())
}

/// Formats stored drift as a table.
pub fn format_adjustments(adjustments: &[RawDuration]) -> String {
    if adjustments.is_empty() {
        return "No stored drift.\n".to_string();
    }
    let rows: Vec<Vec<String>> = adjustments
        .iter()
        .map(|adjustment| {
            vec![
                adjustment.tlp.key().to_string(),
                adjustment.tlp.description().to_string(),
                signed(adjustment.duration),
            ]
        })
        .collect();
    render_table(
        &[
            ("TLP", Align::Left),
            ("DESCRIPTION", Align::Left),
            ("DRIFT", Align::Right),
        ],
        &rows,
    )
}

pub fn list<W, R>(writer: &mut W, adjustments: &R, json: bool) -> Result<()>
where
    W: Write,
    R: AdjustmentsRepository,
    R::Error: std::error::Error + Send + Sync + 'static,
{
    let stored = adjustments.all()?;
    if json {
        let json = serde_json::to_string_pretty(&stored).context("failed to serialize drift")?;
        writeln!(writer, "{json}")?;
    } else {
        write!(writer, "{}", format_adjustments(&stored))?;
    }
    Ok(())
}

pub fn remove<W, R>(writer: &mut W, adjustments: &mut R, tlp: &str, fields: &TlpFields) -> Result<()>
where
    W: Write,
    R: AdjustmentsRepository,
    R::Error: std::error::Error + Send + Sync + 'static,
{
    let key = nickname::resolve_key(tlp, fields)?;
    if !adjustments.remove(&key)? {
        bail!("no stored drift for {key}");
    }
    writeln!(writer, "Removed stored drift for {key}")?;
    Ok(())
}
