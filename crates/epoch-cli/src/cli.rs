//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Quarter-hour time tracker.
///
/// Records when you switch between activity codes and reports the time spent
/// on each, rounded to quarter hours while keeping the total rounding drift
/// small.
#[derive(Debug, Parser)]
#[command(name = "epoch", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Record switching to an activity code.
    Add {
        /// Activity code number, or a nickname (day, break, lunch).
        #[arg(value_name = "TLP", allow_hyphen_values = true)]
        tlp: String,

        /// When the switch happened: omitted for now, +N/-N minutes from now,
        /// or H:MM with '.', ';' or ':' and an optional AM/PM.
        #[arg(allow_hyphen_values = true)]
        time: Option<String>,

        #[command(flatten)]
        fields: TlpFields,
    },

    /// List the recorded timeline.
    List {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Remove the entry at a time.
    Remove {
        /// Time of the entry to remove.
        #[arg(allow_hyphen_values = true)]
        time: String,
    },

    /// Change the activity code of the entry at a time.
    Edit {
        /// Time of the entry to change.
        #[arg(allow_hyphen_values = true)]
        time: String,

        /// New activity code number or nickname.
        #[arg(value_name = "TLP", allow_hyphen_values = true)]
        tlp: String,

        #[command(flatten)]
        fields: TlpFields,
    },

    /// Remove every timeline entry.
    Clear,

    /// Show rounded time per activity code.
    Report {
        /// Output as JSON.
        #[arg(long)]
        json: bool,

        /// Always round this code up (repeatable).
        #[arg(long = "up", value_name = "TLP", allow_hyphen_values = true)]
        up: Vec<String>,

        /// Always round this code down (repeatable).
        #[arg(long = "down", value_name = "TLP", allow_hyphen_values = true)]
        down: Vec<String>,
    },

    /// Manage stored starting drift per activity code.
    #[command(subcommand)]
    Adjust(AdjustAction),
}

/// Stored drift operations.
#[derive(Debug, Subcommand)]
pub enum AdjustAction {
    /// Set the starting drift for a code.
    Set {
        /// Activity code number or nickname.
        #[arg(value_name = "TLP", allow_hyphen_values = true)]
        tlp: String,

        /// Drift in minutes (negative means previously under-reported).
        #[arg(allow_hyphen_values = true)]
        minutes: i64,

        #[command(flatten)]
        fields: TlpFields,
    },

    /// List stored drift.
    List {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Remove the stored drift for a code.
    Remove {
        /// Activity code number or nickname.
        #[arg(value_name = "TLP", allow_hyphen_values = true)]
        tlp: String,

        #[command(flatten)]
        fields: TlpFields,
    },
}

/// Optional classification fields and description of an activity code.
#[derive(Debug, Clone, Default, Args)]
pub struct TlpFields {
    /// Free-text description (defaults to the nickname).
    #[arg(short = 'd', long = "desc")]
    pub description: Option<String>,

    /// Customer number.
    #[arg(long, allow_hyphen_values = true)]
    pub customer: Option<i64>,

    /// Product number.
    #[arg(long, allow_hyphen_values = true)]
    pub product: Option<i64>,

    /// Code number.
    #[arg(long, allow_hyphen_values = true)]
    pub code: Option<i64>,

    /// SLG number.
    #[arg(long, allow_hyphen_values = true)]
    pub slg: Option<i64>,

    /// DLG number.
    #[arg(long, allow_hyphen_values = true)]
    pub dlg: Option<i64>,

    /// Project number.
    #[arg(long, allow_hyphen_values = true)]
    pub prj: Option<i64>,
}
