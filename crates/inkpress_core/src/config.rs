//! Runtime configuration for the content store.
//!
//! # Responsibility
//! - Resolve database and logging settings from defaults, an optional
//!   `app.env` file and the process environment (in that precedence order).
//!
//! # Invariants
//! - Loading never mutates the process environment.
//! - A missing `app.env` file is not an error; a malformed one is.

use crate::db::DEFAULT_BUSY_TIMEOUT;
use crate::logging::default_log_level;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File name looked up inside the configuration directory.
pub const CONFIG_FILE_NAME: &str = "app.env";

const DEFAULT_DB_SOURCE: &str = "inkpress.sqlite3";

const KEY_DB_SOURCE: &str = "DB_SOURCE";
const KEY_BUSY_TIMEOUT_MS: &str = "DB_BUSY_TIMEOUT_MS";
const KEY_LOG_LEVEL: &str = "LOG_LEVEL";
const KEY_LOG_DIR: &str = "LOG_DIR";

#[derive(Debug)]
pub enum ConfigError {
    /// `app.env` exists but could not be read or parsed.
    File {
        path: PathBuf,
        source: dotenvy::Error,
    },
    /// A key holds a value that cannot be interpreted.
    InvalidValue { key: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File { path, source } => {
                write!(f, "failed to read config file `{}`: {source}", path.display())
            }
            Self::InvalidValue { key, value } => {
                write!(f, "invalid value `{value}` for `{key}`")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::File { source, .. } => Some(source),
            Self::InvalidValue { .. } => None,
        }
    }
}

/// Settings needed to open the store and its logger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// SQLite file path, or `:memory:`.
    pub db_source: String,
    /// How long a connection waits for another writer before failing.
    pub busy_timeout: Duration,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute directory for rolling log files. `None` disables file logging.
    pub log_dir: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_source: DEFAULT_DB_SOURCE.to_string(),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl StoreConfig {
    /// Loads configuration from `dir/app.env` and the process environment.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let mut values = read_env_file(&dir.as_ref().join(CONFIG_FILE_NAME))?;
        for key in [KEY_DB_SOURCE, KEY_BUSY_TIMEOUT_MS, KEY_LOG_LEVEL, KEY_LOG_DIR] {
            if let Ok(value) = std::env::var(key) {
                values.insert(key.to_string(), value);
            }
        }
        Self::from_values(&values)
    }

    /// Builds a configuration from already-collected key/value pairs.
    pub fn from_values(values: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(source) = non_empty(values, KEY_DB_SOURCE) {
            config.db_source = source.to_string();
        }

        if let Some(raw) = non_empty(values, KEY_BUSY_TIMEOUT_MS) {
            let millis = raw
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidValue {
                    key: KEY_BUSY_TIMEOUT_MS,
                    value: raw.to_string(),
                })?;
            config.busy_timeout = Duration::from_millis(millis);
        }

        if let Some(level) = non_empty(values, KEY_LOG_LEVEL) {
            config.log_level = level.to_ascii_lowercase();
        }

        if let Some(dir) = non_empty(values, KEY_LOG_DIR) {
            let path = PathBuf::from(dir);
            if !path.is_absolute() {
                return Err(ConfigError::InvalidValue {
                    key: KEY_LOG_DIR,
                    value: dir.to_string(),
                });
            }
            config.log_dir = Some(path);
        }

        Ok(config)
    }
}

fn read_env_file(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    let mut values = HashMap::new();
    if !path.is_file() {
        return Ok(values);
    }

    let iter = dotenvy::from_path_iter(path).map_err(|source| ConfigError::File {
        path: path.to_path_buf(),
        source,
    })?;
    for item in iter {
        let (key, value) = item.map_err(|source| ConfigError::File {
            path: path.to_path_buf(),
            source,
        })?;
        values.insert(key, value);
    }
    Ok(values)
}

fn non_empty<'a>(values: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    values
        .get(key)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}
