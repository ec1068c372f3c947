//! Runtime configuration resolved from the environment.
//!
//! # Responsibility
//! - Select the store backend (SQLite file or demo data) at startup.
//! - Resolve logging level/directory and the session stand-in.
//!
//! # Invariants
//! - Blank variables are treated as unset.
//! - Without `RANKDASH_DB_PATH` the demo store is selected.

use crate::logging::{default_log_level, normalize_level, LoggingError};
use crate::model::user::UserId;
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use uuid::Uuid;

pub const ENV_DB_PATH: &str = "RANKDASH_DB_PATH";
pub const ENV_DEMO: &str = "RANKDASH_DEMO";
pub const ENV_LOG_LEVEL: &str = "RANKDASH_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "RANKDASH_LOG_DIR";
pub const ENV_SESSION_USER: &str = "RANKDASH_SESSION_USER";

/// Backend selected for the data-access interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    /// SQLite database file; created and migrated on open.
    Sqlite { path: PathBuf },
    /// Canned mock data, nothing persisted.
    Demo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub log_level: &'static str,
    /// File logging is disabled when unset.
    pub log_dir: Option<PathBuf>,
    /// Session identity supplied by the surrounding auth provider.
    pub session_user: Option<UserId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidLogLevel(LoggingError),
    InvalidSessionUser(String),
    InvalidFlag { key: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLogLevel(err) => write!(f, "{err}"),
            Self::InvalidSessionUser(value) => {
                write!(f, "session user must be a uuid, got `{value}`")
            }
            Self::InvalidFlag { key, value } => {
                write!(f, "{key} must be one of 1|0|true|false|yes|no, got `{value}`")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidLogLevel(err) => Some(err),
            Self::InvalidSessionUser(_) => None,
            Self::InvalidFlag { .. } => None,
        }
    }
}

impl From<LoggingError> for ConfigError {
    fn from(value: LoggingError) -> Self {
        Self::InvalidLogLevel(value)
    }
}

impl AppConfig {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which maps variable names to
    /// values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let demo = match read(ENV_DEMO) {
            Some(value) => parse_flag(ENV_DEMO, &value)?,
            None => false,
        };
        let store = match read(ENV_DB_PATH) {
            Some(path) if !demo => StoreConfig::Sqlite {
                path: PathBuf::from(path),
            },
            Some(_) => {
                warn!("event=config_load module=config status=ok note=demo_overrides_db_path");
                StoreConfig::Demo
            }
            None => StoreConfig::Demo,
        };

        let log_level = match read(ENV_LOG_LEVEL) {
            Some(level) => normalize_level(&level)?,
            None => default_log_level(),
        };

        let session_user = read(ENV_SESSION_USER)
            .map(|value| parse_user_id(&value))
            .transpose()?;

        Ok(Self {
            store,
            log_level,
            log_dir: read(ENV_LOG_DIR).map(PathBuf::from),
            session_user,
        })
    }

    /// Overrides the log level, validating the new value.
    pub fn set_log_level(&mut self, level: &str) -> Result<(), ConfigError> {
        self.log_level = normalize_level(level)?;
        Ok(())
    }
}

/// Parses a session user id.
pub fn parse_user_id(value: &str) -> Result<UserId, ConfigError> {
    Uuid::parse_str(value.trim())
        .ok()
        .filter(|id| !id.is_nil())
        .ok_or_else(|| ConfigError::InvalidSessionUser(value.to_string()))
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            key,
            value: value.to_string(),
        }),
    }
}
