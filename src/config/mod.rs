use crate::core::review::ReviewPolicy;
use crate::errors::{AppError, AppResult};
use crate::utils::date::{DEFAULT_UTC_OFFSET, parse_utc_offset};
use crate::utils::path::expand_tilde;
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    /// Key-value file holding the device identifier. Empty disables identity.
    #[serde(default = "default_identity_file")]
    pub identity_file: String,
    /// Offset used for every calendar date ("today", solved_at, review_by).
    #[serde(default = "default_utc_offset")]
    pub utc_offset: String,
    #[serde(default = "default_review_threshold_minutes")]
    pub review_threshold_minutes: i64,
    #[serde(default = "default_review_delay_days")]
    pub review_delay_days: u64,
    #[serde(default = "default_board_limit")]
    pub board_limit: usize,
    #[serde(default = "default_recent_sessions")]
    pub recent_sessions: usize,
    #[serde(default = "default_target_hours")]
    pub target_hours: u32,
}

fn default_identity_file() -> String {
    Config::identity_file_path().to_string_lossy().to_string()
}
fn default_utc_offset() -> String {
    DEFAULT_UTC_OFFSET.to_string()
}
fn default_review_threshold_minutes() -> i64 {
    40
}
fn default_review_delay_days() -> u64 {
    3
}
fn default_board_limit() -> usize {
    5
}
fn default_recent_sessions() -> usize {
    8
}
fn default_target_hours() -> u32 {
    1000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: Self::database_file().to_string_lossy().to_string(),
            identity_file: default_identity_file(),
            utc_offset: default_utc_offset(),
            review_threshold_minutes: default_review_threshold_minutes(),
            review_delay_days: default_review_delay_days(),
            board_limit: default_board_limit(),
            recent_sessions: default_recent_sessions(),
            target_hours: default_target_hours(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("rstudylog")
        } else {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".rstudylog")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rstudylog.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rstudylog.sqlite")
    }

    /// Return the default location of the device identity file
    pub fn identity_file_path() -> PathBuf {
        Self::config_dir().join("device.json")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Write the configuration file
    pub fn save(&self) -> AppResult<()> {
        fs::create_dir_all(Self::config_dir())?;
        fs::write(Self::config_file(), serde_yaml::to_string(self)?)?;
        Ok(())
    }

    /// Initialize the configuration directory, the config file (skipped in
    /// test mode) and the parent directory of the database.
    pub fn init_all(&self, is_test: bool) -> AppResult<()> {
        fs::create_dir_all(Self::config_dir())?;

        if !is_test {
            self.save()?;
        }

        if let Some(parent) = self.database_path().parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        Ok(())
    }

    pub fn database_path(&self) -> PathBuf {
        expand_tilde(&self.database)
    }

    /// `None` means no persistent storage is available for the device id.
    pub fn identity_path(&self) -> Option<PathBuf> {
        let trimmed = self.identity_file.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(expand_tilde(trimmed))
        }
    }

    pub fn offset(&self) -> AppResult<FixedOffset> {
        parse_utc_offset(&self.utc_offset)
    }

    pub fn review_policy(&self) -> ReviewPolicy {
        ReviewPolicy {
            threshold_seconds: self.review_threshold_minutes.max(0).saturating_mul(60),
            delay_days: self.review_delay_days,
        }
    }
}
