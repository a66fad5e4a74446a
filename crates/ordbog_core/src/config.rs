//! Runtime configuration resolved from the environment.
//!
//! # Responsibility
//! - Resolve data directory, storage backend and logging settings.
//! - Keep defaults in one place for every front end.
//!
//! # Invariants
//! - Resolved paths are absolute.
//! - Blank variables count as unset.

use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const ENV_DATA_DIR: &str = "ORDBOG_DATA_DIR";
pub const ENV_BACKEND: &str = "ORDBOG_BACKEND";
pub const ENV_LOG_LEVEL: &str = "ORDBOG_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "ORDBOG_LOG_DIR";

const DEFAULT_DIR_NAME: &str = "ordbog";
const DATABASE_FILE_NAME: &str = "ordbog.sqlite3";
const LOG_DIR_NAME: &str = "logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    UnknownBackend(String),
    UnresolvablePath { path: PathBuf, message: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownBackend(value) => {
                write!(f, "unknown storage backend `{value}`; expected sqlite|json")
            }
            Self::UnresolvablePath { path, message } => {
                write!(f, "cannot resolve path `{}`: {message}", path.display())
            }
        }
    }
}

impl Error for ConfigError {}

/// Durable medium the word stores write through to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    /// One SQLite database holding both namespaces.
    #[default]
    Sqlite,
    /// One JSON file per namespace.
    Json,
}

impl StorageBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Json => "json",
        }
    }
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sqlite" | "db" => Ok(Self::Sqlite),
            "json" | "file" => Ok(Self::Json),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

/// Resolved core configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub data_dir: PathBuf,
    pub backend: StorageBackend,
    pub log_level: String,
    pub log_dir: PathBuf,
}

impl CoreConfig {
    /// Resolves configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolves configuration through `lookup`, falling back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let data_dir = match read(ENV_DATA_DIR) {
            Some(raw) => absolutize(Path::new(&raw))?,
            None => std::env::temp_dir().join(DEFAULT_DIR_NAME),
        };
        let backend = match read(ENV_BACKEND) {
            Some(raw) => raw.parse()?,
            None => StorageBackend::default(),
        };
        let log_level = read(ENV_LOG_LEVEL).unwrap_or_else(|| default_log_level().to_string());
        let log_dir = match read(ENV_LOG_DIR) {
            Some(raw) => absolutize(Path::new(&raw))?,
            None => data_dir.join(LOG_DIR_NAME),
        };

        Ok(Self {
            data_dir,
            backend,
            log_level,
            log_dir,
        })
    }

    /// Replaces the data directory; a log directory derived from the old
    /// data directory follows it.
    pub fn with_data_dir(mut self, data_dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let data_dir = absolutize(data_dir.as_ref())?;
        if self.log_dir == self.data_dir.join(LOG_DIR_NAME) {
            self.log_dir = data_dir.join(LOG_DIR_NAME);
        }
        self.data_dir = data_dir;
        Ok(self)
    }

    /// SQLite database location for the `sqlite` backend.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE_NAME)
    }
}

fn absolutize(path: &Path) -> Result<PathBuf, ConfigError> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .map_err(|err| ConfigError::UnresolvablePath {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
}
