//! Config module.
//!
//! This module contains everything related to the synchronizer
//! configuration. The configuration is passed explicitly to the
//! synchronizer, there is no process-wide registry.

use dirs::data_dir;
use log::warn;
use std::{path::PathBuf, result};
use thiserror::Error;

/// Refresh interval applied when the configuration leaves it unset.
pub const DEFAULT_REFRESH_INTERVAL_MS: i64 = 5 * 60 * 1000;

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot get XDG_DATA_HOME directory")]
    GetXdgDataDirError,
}

pub type Result<T> = result::Result<T, Error>;

/// Represents the synchronization settings of one account.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SyncConfig {
    /// Represents the account display name, used for logging.
    pub name: String,
    /// Whether synchronization is enabled for the account. A disabled
    /// account short-circuits every run.
    pub enabled: bool,
    /// Milliseconds that must elapse between two runs for the same
    /// folder. A value of zero or less disables throttling.
    pub refresh_interval_ms: i64,
    /// Represents the directory holding the cache database.
    pub cache_dir: Option<PathBuf>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            name: String::default(),
            enabled: true,
            refresh_interval_ms: DEFAULT_REFRESH_INTERVAL_MS,
            cache_dir: None,
        }
    }
}

impl SyncConfig {
    /// Resolves the cache directory, falling back to the XDG data
    /// directory when unset or invalid.
    pub fn cache_dir(&self) -> Result<PathBuf> {
        match self.cache_dir.as_ref().filter(|dir| dir.is_dir()) {
            Some(dir) => Ok(dir.clone()),
            None => {
                warn!("cache dir not set or invalid, falling back to $XDG_DATA_HOME");
                data_dir()
                    .map(|dir| dir.join(&self.name))
                    .ok_or(Error::GetXdgDataDirError)
            }
        }
    }
}

#[cfg(test)]
mod config {
    use std::env::temp_dir;

    use super::SyncConfig;

    #[test]
    fn cache_dir_prefers_configured_directory() {
        let dir = temp_dir();
        let config = SyncConfig {
            cache_dir: Some(dir.clone()),
            ..SyncConfig::default()
        };

        assert_eq!(dir, config.cache_dir().unwrap());
    }
}
