//! File layout and bootstrap account settings.
//!
//! # Responsibility
//! - Name every file the core owns relative to one data directory.
//! - Overlay environment overrides on the built-in defaults.

use crate::model::user::{DEFAULT_ADMIN_SECRET, DEFAULT_ADMIN_USERNAME};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Environment variable overriding [`StoreConfig::data_dir`].
pub const DATA_DIR_ENV: &str = "STUDENTDB_DATA_DIR";

const RECORDS_FILE_NAME: &str = "students.csv";
const LEDGER_FILE_NAME: &str = "users.txt";
const ACTIVITY_DIR_NAME: &str = "user_logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyValue(&'static str),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyValue(name) => write!(f, "`{name}` cannot be empty"),
        }
    }
}

impl Error for ConfigError {}

/// Where the record file, credential ledger and activity logs live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
    pub records_file: String,
    pub ledger_file: String,
    pub activity_dir: String,
    pub admin_username: String,
    pub admin_secret: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            records_file: RECORDS_FILE_NAME.to_string(),
            ledger_file: LEDGER_FILE_NAME.to_string(),
            activity_dir: ACTIVITY_DIR_NAME.to_string(),
            admin_username: DEFAULT_ADMIN_USERNAME.to_string(),
            admin_secret: DEFAULT_ADMIN_SECRET.to_string(),
        }
    }
}

impl StoreConfig {
    /// Defaults rooted at `data_dir`.
    pub fn in_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Defaults with `STUDENTDB_DATA_DIR` applied when set and non-blank.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        match lookup(DATA_DIR_ENV) {
            Some(raw) if !raw.trim().is_empty() => Self::in_dir(raw.trim()),
            _ => Self::default(),
        }
    }

    /// Replaces the data directory, rejecting blank input.
    pub fn with_data_dir(mut self, data_dir: &str) -> Result<Self, ConfigError> {
        let trimmed = data_dir.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::EmptyValue("data_dir"));
        }
        self.data_dir = PathBuf::from(trimmed);
        Ok(self)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn records_path(&self) -> PathBuf {
        self.data_dir.join(&self.records_file)
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.data_dir.join(&self.ledger_file)
    }

    pub fn activity_dir_path(&self) -> PathBuf {
        self.data_dir.join(&self.activity_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, StoreConfig, DATA_DIR_ENV};
    use std::path::PathBuf;

    #[test]
    fn defaults_match_legacy_layout() {
        let config = StoreConfig::default();
        assert_eq!(config.records_path(), PathBuf::from("./students.csv"));
        assert_eq!(config.ledger_path(), PathBuf::from("./users.txt"));
        assert_eq!(config.activity_dir_path(), PathBuf::from("./user_logs"));
        assert_eq!(config.admin_username, "admin");
    }

    #[test]
    fn env_override_is_trimmed_and_blank_is_ignored() {
        let config = StoreConfig::from_lookup(|name| {
            (name == DATA_DIR_ENV).then(|| "  /srv/students  ".to_string())
        });
        assert_eq!(config.data_dir(), PathBuf::from("/srv/students"));

        let blank = StoreConfig::from_lookup(|_| Some("   ".to_string()));
        assert_eq!(blank, StoreConfig::default());
    }

    #[test]
    fn with_data_dir_rejects_blank() {
        assert_eq!(
            StoreConfig::default().with_data_dir(" "),
            Err(ConfigError::EmptyValue("data_dir"))
        );
        let config = StoreConfig::default().with_data_dir("/data").unwrap();
        assert_eq!(config.ledger_path(), PathBuf::from("/data/users.txt"));
    }
}
