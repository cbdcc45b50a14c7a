//! Report command for showing rounded time per activity code.

use std::collections::HashMap;
use std::io::Write;

use anyhow::{Context, Result, bail};
use epoch_core::{
    DriftLookup, Duration, RoundedDuration, RoundingOverride, TimelineRepository,
    TimestampedEntry, Tlp, TlpKey, Workflow,
};
use serde::Serialize;

use super::util::{Align, render_table, signed};
use crate::nickname;

/// Report output and rounding preferences.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportOptions {
    pub json: bool,
    /// Codes always rounded up.
    pub up: Vec<i64>,
    /// Codes always rounded down.
    pub down: Vec<i64>,
}

impl ReportOptions {
    /// Builds options from command-line codes or nicknames.
    pub fn from_args(json: bool, up: &[String], down: &[String]) -> Result<Self> {
        let resolve = |codes: &[String]| -> Result<Vec<i64>> {
            codes.iter().map(|code| nickname::resolve_code(code)).collect()
        };
        let options = Self {
            json,
            up: resolve(up)?,
            down: resolve(down)?,
        };
        if let Some(code) = options.up.iter().find(|code| options.down.contains(*code)) {
            bail!("code {code} cannot be forced both up and down");
        }
        Ok(options)
    }
}

#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    #[serde(flatten)]
    tlp: &'a Tlp,
    raw_minutes: i64,
    starting_drift_minutes: i64,
    adjustment_minutes: i64,
    rounded_minutes: i64,
    drift_minutes: i64,
}

#[derive(Debug, Serialize)]
struct ReportJson<'a> {
    rows: Vec<ReportRow<'a>>,
    total_raw_minutes: i64,
    total_rounded_minutes: i64,
    drift_minutes: i64,
}

/// Maps every identity in the timeline whose code is forced to its direction.
pub fn rounding_overrides(
    entries: &[TimestampedEntry],
    options: &ReportOptions,
) -> HashMap<TlpKey, RoundingOverride> {
    entries
        .iter()
        .map(|entry| *entry.tlp.key())
        .filter_map(|key| {
            if options.up.contains(&key.tlp_code) {
                Some((key, RoundingOverride::Up))
            } else if options.down.contains(&key.tlp_code) {
                Some((key, RoundingOverride::Down))
            } else {
                None
            }
        })
        .collect()
}

/// Runs the rounding workflow over the timeline.
pub fn generate_report<L>(
    entries: &[TimestampedEntry],
    lookup: &L,
    options: &ReportOptions,
) -> Result<Vec<RoundedDuration>>
where
    L: DriftLookup + ?Sized,
{
    let overrides = rounding_overrides(entries, options);
    tracing::debug!(overrides = overrides.len(), "resolved rounding overrides");
    Workflow::default()
        .with_overrides(overrides)
        .run(entries, lookup)
        .context("failed to round timeline")
}

fn totals(rows: &[RoundedDuration]) -> (Duration, Duration, Duration) {
    let raw = rows.iter().map(RoundedDuration::duration).sum();
    let rounded = rows.iter().map(RoundedDuration::adjusted_duration).sum();
    let drift = rows
        .last()
        .map_or(Duration::ZERO, RoundedDuration::new_accumulated_drift);
    (raw, rounded, drift)
}

/// Formats rounded durations as a human-readable report.
pub fn format_report(rows: &[RoundedDuration]) -> String {
    if rows.is_empty() {
        return "Nothing to report: record at least two entries.\n".to_string();
    }

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            vec![
                row.tlp().key().to_string(),
                row.tlp().description().to_string(),
                row.duration().to_string(),
                signed(row.adjustment()),
                row.adjusted_duration().to_string(),
                signed(row.new_accumulated_drift()),
            ]
        })
        .collect();
    let mut output = render_table(
        &[
            ("TLP", Align::Left),
            ("DESCRIPTION", Align::Left),
            ("RAW", Align::Right),
            ("ADJUST", Align::Right),
            ("ROUNDED", Align::Right),
            ("DRIFT", Align::Right),
        ],
        &cells,
    );

    let (raw, rounded, drift) = totals(rows);
    output.push('\n');
    output.push_str(&format!(
        "Total: {raw} recorded, {rounded} rounded (drift {})\n",
        signed(drift)
    ));
    output
}

/// Formats rounded durations as JSON.
pub fn format_report_json(rows: &[RoundedDuration]) -> Result<String> {
    let (raw, rounded, drift) = totals(rows);
    let report = ReportJson {
        rows: rows
            .iter()
            .map(|row| ReportRow {
                tlp: row.tlp(),
                raw_minutes: row.duration().total_minutes(),
                starting_drift_minutes: row.accumulated_drift().total_minutes(),
                adjustment_minutes: row.adjustment().total_minutes(),
                rounded_minutes: row.adjusted_duration().total_minutes(),
                drift_minutes: row.new_accumulated_drift().total_minutes(),
            })
            .collect(),
        total_raw_minutes: raw.total_minutes(),
        total_rounded_minutes: rounded.total_minutes(),
        drift_minutes: drift.total_minutes(),
    };
    serde_json::to_string_pretty(&report).context("failed to serialize report")
}

pub fn run<W, T, L>(writer: &mut W, timeline: &T, lookup: &L, options: &ReportOptions) -> Result<()>
where
    W: Write,
    T: TimelineRepository,
    T::Error: std::error::Error + Send + Sync + 'static,
    L: DriftLookup + ?Sized,
{
    let entries = timeline.entries()?;
    let rows = generate_report(&entries, lookup, options)?;
    if options.json {
        writeln!(writer, "{}", format_report_json(&rows)?)?;
    } else {
        write!(writer, "{}", format_report(&rows))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use epoch_core::{
        AdjustmentsRepository, MemoryAdjustments, MemoryTimeline, RawDuration, Time,
    };
    use insta::assert_snapshot;

    fn entry(code: i64, description: &str, hour: i64, minute: i64) -> TimestampedEntry {
        TimestampedEntry::new(Tlp::new(code, description), Time::new(hour, minute).unwrap())
    }

    fn workday() -> Vec<TimestampedEntry> {
        vec![
            entry(0, "day", 9, 0),
            entry(-2, "lunch", 12, 0),
            entry(0, "day", 12, 30),
            entry(0, "day", 17, 7),
        ]
    }

    fn no_drift() -> HashMap<TlpKey, i64> {
        HashMap::new()
    }

    #[test]
    fn test_report_workday() {
        let rows = generate_report(&workday(), &no_drift(), &ReportOptions::default()).unwrap();
        assert_snapshot!(format_report(&rows), @r"
        TLP  DESCRIPTION     RAW  ADJUST  ROUNDED  DRIFT
        0    day; day     7h 37m     -7m   7h 30m    -7m
        -2   lunch           30m      0m      30m    -7m

        Total: 8h 7m recorded, 8h 0m rounded (drift -7m)
        ");
    }

    #[test]
    fn test_report_forced_up() {
        let options = ReportOptions::from_args(false, &["day".to_string()], &[]).unwrap();
        let rows = generate_report(&workday(), &no_drift(), &options).unwrap();
        assert_snapshot!(format_report(&rows), @r"
        TLP  DESCRIPTION     RAW  ADJUST  ROUNDED  DRIFT
        0    day; day     7h 37m     +8m   7h 45m    +8m
        -2   lunch           30m      0m      30m    +8m

        Total: 8h 7m recorded, 8h 15m rounded (drift +8m)
        ");
    }

    #[test]
    fn test_report_needs_two_entries() {
        let rows =
            generate_report(&[entry(0, "day", 9, 0)], &no_drift(), &ReportOptions::default())
                .unwrap();
        assert_eq!(
            format_report(&rows),
            "Nothing to report: record at least two entries.\n"
        );
    }

    #[test]
    fn test_conflicting_overrides_are_rejected() {
        let err = ReportOptions::from_args(false, &["0".to_string()], &["day".to_string()])
            .unwrap_err();
        assert_eq!(err.to_string(), "code 0 cannot be forced both up and down");
    }

    #[test]
    fn test_overrides_cover_every_identity_with_the_code() {
        let entries = vec![
            TimestampedEntry::new(
                Tlp::from_key(TlpKey::new(4).with_customer(1), "a"),
                Time::new(9, 0).unwrap(),
            ),
            TimestampedEntry::new(
                Tlp::from_key(TlpKey::new(4).with_customer(2), "b"),
                Time::new(10, 0).unwrap(),
            ),
            entry(5, "c", 11, 0),
        ];
        let options = ReportOptions {
            down: vec![4],
            ..ReportOptions::default()
        };
        let overrides = rounding_overrides(&entries, &options);
        assert_eq!(overrides.len(), 2);
        assert_eq!(
            overrides.get(&TlpKey::new(4).with_customer(2)),
            Some(&RoundingOverride::Down)
        );
        assert!(!overrides.contains_key(&TlpKey::new(5)));
    }

    #[test]
    fn test_report_json() {
        let rows = generate_report(&workday(), &no_drift(), &ReportOptions::default()).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&format_report_json(&rows).unwrap()).unwrap();

        assert_eq!(json["total_raw_minutes"], 487);
        assert_eq!(json["total_rounded_minutes"], 480);
        assert_eq!(json["drift_minutes"], -7);
        assert_eq!(
            json["rows"][0],
            serde_json::json!({
                "tlp_code": 0,
                "description": "day; day",
                "raw_minutes": 457,
                "starting_drift_minutes": 0,
                "adjustment_minutes": -7,
                "rounded_minutes": 450,
                "drift_minutes": -7
            })
        );
        assert_eq!(json["rows"][1]["starting_drift_minutes"], -7);
    }

    #[test]
    fn test_extreme_stored_drift_does_not_overflow() {
        let lookup: HashMap<TlpKey, i64> = [(TlpKey::new(-2), i64::MAX), (TlpKey::new(0), i64::MIN)]
            .into_iter()
            .collect();
        let rows = generate_report(&workday(), &lookup, &ReportOptions::default()).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(format_report(&rows).starts_with("TLP"));
        assert!(format_report_json(&rows).is_ok());
    }

    #[test]
    fn test_run_uses_stored_drift() {
        let mut timeline = MemoryTimeline::new();
        for item in workday() {
            timeline.add_entry(item).unwrap();
        }
        let mut adjustments = MemoryAdjustments::new();
        adjustments
            .set(RawDuration::new(
                Tlp::new(0, "day"),
                Duration::from_minutes(-7),
            ))
            .unwrap();

        let mut out = Vec::new();
        run(&mut out, &timeline, &adjustments, &ReportOptions::default()).unwrap();
        let output = String::from_utf8(out).unwrap();
        // Stored -7 tips the day upwards, landing the total drift at +1.
        assert!(output.contains("7h 45m"), "{output}");
        assert!(output.contains("(drift +1m)"), "{output}");
    }
}
