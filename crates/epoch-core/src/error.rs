//! Error types for the core domain.

use thiserror::Error;

use crate::tlp::TlpKey;

/// A clock time outside `00:00..=23:59`.
///
/// Holds the hour and minute after carrying whole hours out of the minute.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("invalid time {hour}:{minute:02}: hour must be 0-23 and minute 0-59")]
pub struct InvalidTime {
    pub hour: i64,
    pub minute: i64,
}

/// Two activity codes with different identities were combined.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("cannot combine activity codes with different identities: [{left}] and [{right}]")]
pub struct IncompatibleCodes {
    pub left: TlpKey,
    pub right: TlpKey,
}

/// A strict `H:MM` time string could not be parsed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseTimeError {
    /// The text is not two colon-separated numbers.
    #[error("malformed time {input:?}, expected H:MM")]
    Malformed { input: String },

    /// The numbers do not form a valid clock time.
    #[error(transparent)]
    OutOfRange(#[from] InvalidTime),
}

/// Any failure raised by the rounding pipeline.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error(transparent)]
    IncompatibleCodes(#[from] IncompatibleCodes),
}
