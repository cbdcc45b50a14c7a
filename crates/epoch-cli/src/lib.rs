//! Epoch time tracker CLI library.
//!
//! This crate provides the CLI interface for the epoch time tracker.

mod cli;
pub mod commands;
mod config;
pub mod nickname;
pub mod parse;

pub use cli::{AdjustAction, Cli, Commands, TlpFields};
pub use config::Config;
