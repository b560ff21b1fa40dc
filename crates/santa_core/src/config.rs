//! Engine configuration.
//!
//! # Responsibility
//! - Hold the exclusion window, permanent table and store location.
//! - Load them from a JSON file, defaulting every missing field.
//!
//! # Invariants
//! - Configuration is passed by value into services; there is no global copy.
//! - A relative `store_path` is resolved against the config file's directory.

use crate::engine::exclusion::PermanentExclusions;
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};

/// Number of most recent periods whose receivers are avoided.
pub const DEFAULT_EXCLUSION_WINDOW: usize = 3;
/// Store file name used when the config names none.
pub const DEFAULT_STORE_FILE: &str = "data.json";

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Json(serde_json::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Json(err) => write!(f, "config is not valid JSON: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Explicit configuration value handed to `PeriodService`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SantaConfig {
    /// How many of the most recent periods feed rolling exclusions.
    pub exclusion_window: usize,
    /// Static giver → never-receive table, e.g. spouses.
    pub permanent_exclusions: PermanentExclusions,
    /// Location of the store document.
    pub store_path: PathBuf,
}

impl Default for SantaConfig {
    fn default() -> Self {
        Self {
            exclusion_window: DEFAULT_EXCLUSION_WINDOW,
            permanent_exclusions: PermanentExclusions::default(),
            store_path: PathBuf::from(DEFAULT_STORE_FILE),
        }
    }
}

impl SantaConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.store_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("store_path cannot be empty".to_string()));
        }
        Ok(())
    }
}

/// Loads and validates a JSON config file.
///
/// # Errors
/// - `Io` when the file cannot be read.
/// - `Json` when it is not a valid config object (unknown ids included).
/// - `Invalid` when `store_path` is empty.
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<SantaConfig> {
    let path = path.as_ref();
    let result = read_config(path);
    match &result {
        Ok(config) => info!(
            "event=config_load module=config status=ok exclusion_window={} permanent_givers={}",
            config.exclusion_window,
            config.permanent_exclusions.len()
        ),
        Err(err) => error!(
            "event=config_load module=config status=error path={} error={}",
            path.display(),
            err
        ),
    }
    result
}

fn read_config(path: &Path) -> ConfigResult<SantaConfig> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut config: SantaConfig = serde_json::from_str(&raw)?;
    config.validate()?;

    if config.store_path.is_relative() {
        if let Some(base) = path.parent() {
            config.store_path = base.join(&config.store_path);
        }
    }
    Ok(config)
}
