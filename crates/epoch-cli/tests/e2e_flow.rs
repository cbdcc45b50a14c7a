//! End-to-end tests for the complete tracking flow.
//!
//! Tests the full pipeline: add → list → report → adjust → edit → clear,
//! running the real binary against a temporary home directory.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

fn epoch_binary() -> String {
    env!("CARGO_BIN_EXE_epoch").to_string()
}

fn db_path(temp: &Path) -> PathBuf {
    temp.join("epoch.db")
}

/// Runs epoch with `HOME` pointed at `temp` and the database inside it.
fn epoch(temp: &Path, args: &[&str]) -> Output {
    Command::new(epoch_binary())
        .env("HOME", temp)
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("XDG_DATA_HOME")
        .env_remove("RUST_LOG")
        .env("EPOCH_DATABASE_PATH", db_path(temp))
        .args(args)
        .output()
        .expect("failed to run epoch")
}

/// Runs epoch, asserts success and returns stdout.
fn epoch_ok(temp: &Path, args: &[&str]) -> String {
    let output = epoch(temp, args);
    assert!(
        output.status.success(),
        "epoch {args:?} should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).unwrap()
}

fn record_workday(temp: &Path) {
    assert_eq!(epoch_ok(temp, &["add", "day", "9:00"]), "Added 09:00 0 (day)\n");
    assert_eq!(
        epoch_ok(temp, &["add", "lunch", "12:00"]),
        "Added 12:00 -2 (lunch)\n"
    );
    epoch_ok(temp, &["add", "day", "12.30"]);
    // Small hours are afternoon: 5;07 is 17:07.
    assert_eq!(epoch_ok(temp, &["add", "day", "5;07"]), "Added 17:07 0 (day)\n");
}

#[test]
fn test_workday_report() {
    let temp = TempDir::new().unwrap();
    record_workday(temp.path());

    let report = epoch_ok(temp.path(), &["report"]);
    assert!(report.contains("day; day"), "{report}");
    assert!(
        report.contains("Total: 8h 7m recorded, 8h 0m rounded (drift -7m)"),
        "{report}"
    );

    let json: serde_json::Value =
        serde_json::from_str(&epoch_ok(temp.path(), &["report", "--json"])).unwrap();
    assert_eq!(json["total_raw_minutes"], 487);
    assert_eq!(json["total_rounded_minutes"], 480);
    assert_eq!(json["rows"][0]["tlp_code"], 0);
    assert_eq!(json["rows"][0]["rounded_minutes"], 450);
    assert_eq!(json["rows"][1]["tlp_code"], -2);
}

#[test]
fn test_stored_drift_and_overrides() {
    let temp = TempDir::new().unwrap();
    record_workday(temp.path());

    assert_eq!(
        epoch_ok(temp.path(), &["adjust", "set", "day", "-7"]),
        "Stored drift -7m for 0 (day)\n"
    );
    let listed = epoch_ok(temp.path(), &["adjust", "list"]);
    assert!(listed.contains("-7m"), "{listed}");

    // Stored -7 tips the 7h 37m day up to 7h 45m.
    let report = epoch_ok(temp.path(), &["report"]);
    assert!(report.contains("(drift +1m)"), "{report}");

    // Forcing it down piles onto the stored drift instead.
    let report = epoch_ok(temp.path(), &["report", "--down", "day"]);
    assert!(report.contains("(drift -14m)"), "{report}");

    let conflicting = epoch(temp.path(), &["report", "--up", "0", "--down", "day"]);
    assert!(!conflicting.status.success());

    epoch_ok(temp.path(), &["adjust", "remove", "day"]);
    let report = epoch_ok(temp.path(), &["report"]);
    assert!(report.contains("(drift -7m)"), "{report}");
}

#[test]
fn test_list_edit_remove_clear() {
    let temp = TempDir::new().unwrap();
    record_workday(temp.path());

    let entries: serde_json::Value =
        serde_json::from_str(&epoch_ok(temp.path(), &["list", "--json"])).unwrap();
    let times: Vec<&str> = entries
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["time"].as_str().unwrap())
        .collect();
    assert_eq!(times, vec!["09:00", "12:00", "12:30", "17:07"]);

    assert_eq!(
        epoch_ok(temp.path(), &["edit", "12:30", "7", "--desc", "review"]),
        "Changed 12:30 to 7 (review)\n"
    );
    assert_eq!(
        epoch_ok(temp.path(), &["remove", "12:00"]),
        "Removed entry at 12:00\n"
    );
    let listed = epoch_ok(temp.path(), &["list"]);
    assert!(listed.contains("12:30  7    review"), "{listed}");
    assert!(!listed.contains("12:00"), "{listed}");

    let missing = epoch(temp.path(), &["remove", "12:00"]);
    assert!(!missing.status.success());

    assert_eq!(epoch_ok(temp.path(), &["clear"]), "Cleared 3 entries\n");
    assert_eq!(epoch_ok(temp.path(), &["list"]), "No entries recorded.\n");
}

#[test]
fn test_invalid_time_is_rejected() {
    let temp = TempDir::new().unwrap();
    let output = epoch(temp.path(), &["add", "day", "25:00"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("25"), "{stderr}");

    let output = epoch(temp.path(), &["add", "day", "9:30xm"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("xm"), "{stderr}");
}

#[test]
fn test_extreme_numbers_fail_cleanly() {
    let temp = TempDir::new().unwrap();

    let output = epoch(temp.path(), &["add", "day", "+9223372036854775807"]);
    assert_eq!(output.status.code(), Some(1), "{output:?}");
    assert!(epoch_ok(temp.path(), &["list"]).contains("No entries"));

    let output = epoch(temp.path(), &["adjust", "set", "lunch", "9223372036854775807"]);
    assert_eq!(output.status.code(), Some(1), "{output:?}");
    assert_eq!(epoch_ok(temp.path(), &["adjust", "list"]), "No stored drift.\n");
}

#[test]
fn test_config_file_sets_afternoon_cutoff() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("epoch.toml");
    std::fs::write(&config, "afternoon_cutoff = 0\n").unwrap();

    let added = epoch_ok(
        temp.path(),
        &["--config", config.to_str().unwrap(), "add", "day", "4:15"],
    );
    assert_eq!(added, "Added 04:15 0 (day)\n");
}

#[test]
fn test_no_subcommand_prints_help() {
    let temp = TempDir::new().unwrap();
    let output = epoch_ok(temp.path(), &[]);
    assert!(output.contains("Usage"), "{output}");
}
