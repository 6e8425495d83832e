//! Panel configuration.
//!
//! Only file locations and the statistics window are configurable. The
//! digest, signature scheme, and key size are fixed constants in
//! [`sealroll_core::crypto`].

use std::path::PathBuf;

use sealroll_core::KeyPaths;

use crate::error::{PanelError, Result};

/// Environment variable overriding the private key path.
pub const ENV_PRIVATE_KEY: &str = "SEALROLL_PRIVATE_KEY";
/// Environment variable overriding the public key path.
pub const ENV_PUBLIC_KEY: &str = "SEALROLL_PUBLIC_KEY";
/// Environment variable overriding the SQLite database path.
pub const ENV_DATABASE: &str = "SEALROLL_DATABASE";
/// Environment variable overriding the users-per-day window.
pub const ENV_STATS_DAYS: &str = "SEALROLL_STATS_DAYS";

pub const DEFAULT_DATABASE: &str = "sealroll.db";
pub const DEFAULT_STATS_DAYS: u32 = 7;

/// Configuration for the Panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelConfig {
    /// Where the PEM keypair lives.
    pub keys: KeyPaths,
    /// SQLite database file.
    pub database_path: PathBuf,
    /// Number of days covered by [`Panel::users_per_day`](crate::Panel::users_per_day).
    pub stats_days: u32,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            keys: KeyPaths::default(),
            database_path: PathBuf::from(DEFAULT_DATABASE),
            stats_days: DEFAULT_STATS_DAYS,
        }
    }
}

impl PanelConfig {
    /// Defaults overridden by `SEALROLL_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = lookup(ENV_PRIVATE_KEY) {
            config.keys.private_key = PathBuf::from(path);
        }
        if let Some(path) = lookup(ENV_PUBLIC_KEY) {
            config.keys.public_key = PathBuf::from(path);
        }
        if let Some(path) = lookup(ENV_DATABASE) {
            config.database_path = PathBuf::from(path);
        }
        if let Some(days) = lookup(ENV_STATS_DAYS) {
            config.stats_days = days.trim().parse().map_err(|e| {
                PanelError::Config(format!("{ENV_STATS_DAYS}={days:?} is not a day count: {e}"))
            })?;
        }

        Ok(config)
    }
}
