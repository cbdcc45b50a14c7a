//! CLI subcommand implementations.

pub mod add;
pub mod adjust;
pub mod clear;
pub mod edit;
pub mod list;
pub mod remove;
pub mod report;
pub mod util;
