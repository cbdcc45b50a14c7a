//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Default hour below which an AM/PM-less time is read as afternoon.
const DEFAULT_AFTERNOON_CUTOFF: u8 = 7;

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the database file.
    pub database_path: PathBuf,

    /// Times without AM/PM whose hour is below this are read as PM
    /// (with the default of 7, `4:15` means 16:15). Zero disables it.
    pub afternoon_cutoff: u8,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_path", &self.database_path)
            .field("afternoon_cutoff", &self.afternoon_cutoff)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            database_path: data_dir.join("epoch.db"),
            afternoon_cutoff: DEFAULT_AFTERNOON_CUTOFF,
        }
    }
}

impl Config {
    /// Loads configuration from the default locations, optionally layering a
    /// specific file on top.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (EPOCH_*)
        figment = figment.merge(Env::prefixed("EPOCH_"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for epoch.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("epoch"))
}

/// Returns the platform-specific data directory for epoch.
///
/// On Linux: `~/.local/share/epoch`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("epoch"))
}
