//! src/config.rs
//! ============================================================================
//! # Config: Application Configuration Loader and Saver
//!
//! User-editable settings for the audit checklist, stored as TOML in the
//! platform config directory resolved through
//! [`directories`](https://docs.rs/directories).
//!
//! ## Features
//! - XDG-compliant config discovery and writing (Linux, macOS, Windows)
//! - Defaults written out on first run
//! - Async load/save on Tokio
//! - Explicit path override for `--config`
//!
//! ## Example
//! ```rust,ignore
//! let config = Config::load().await?;
//! let data_dir = config.storage.resolved_data_dir()?;
//! ```

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use tokio::fs as TokioFs;

use crate::{error::AppError, util::debounce::DebounceConfig};

const QUALIFIER: &str = "org";
const ORGANIZATION: &str = "audit";
const APPLICATION: &str = "FileAuditor";

fn project_dirs() -> Result<ProjectDirs, AppError> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
        .ok_or(AppError::NoProjectDir("project"))
}

/// Where the record collection and view state live.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Overrides the platform data directory when set.
    pub data_dir: Option<PathBuf>,
}

impl StorageConfig {
    /// Configured data directory, or the platform default.
    pub fn resolved_data_dir(&self) -> Result<PathBuf, AppError> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(project_dirs()?.data_dir().to_path_buf()),
        }
    }
}

/// Tracing subscriber settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive; `RUST_LOG` wins when set.
    pub level: String,

    /// Overrides the platform cache directory when set.
    pub log_dir: Option<PathBuf>,

    /// Mirror events to stderr.
    pub stderr: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: None,
            stderr: false,
        }
    }
}

impl LoggingConfig {
    pub fn resolved_log_dir(&self) -> Result<PathBuf, AppError> {
        match &self.log_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(project_dirs()?.cache_dir().join("logs")),
        }
    }
}

/// Debounce windows for text input and persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebounceSettings {
    pub notes: DebounceConfig,

    pub search: DebounceConfig,

    pub persist: DebounceConfig,
}

impl Default for DebounceSettings {
    fn default() -> Self {
        Self {
            notes: DebounceConfig::notes_input(),
            search: DebounceConfig::search_input(),
            persist: DebounceConfig::persist(),
        }
    }
}

/// Main configuration struct for the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seed an empty store with the sample checklist on first load.
    pub seed_defaults: bool,

    pub storage: StorageConfig,

    pub logging: LoggingConfig,

    pub debounce: DebounceSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed_defaults: true,
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
            debounce: DebounceSettings::default(),
        }
    }
}

impl Config {
    /// Loads config from the platform config dir, creating it with defaults
    /// when missing.
    ///
    /// The config is expected at `$XDG_CONFIG_HOME/FileAuditor/config.toml`
    /// (Linux), or equivalent on Windows/macOS.
    pub async fn load() -> Result<Self, AppError> {
        Self::load_from(&Self::config_path()?).await
    }

    /// Loads config from an explicit path, creating it with defaults when
    /// missing.
    pub async fn load_from(path: &Path) -> Result<Self, AppError> {
        if TokioFs::try_exists(path).await.unwrap_or(false) {
            info!("Loading config from {}", path.display());
            let text = TokioFs::read_to_string(path).await?;
            let cfg: Self = toml::from_str(&text)?;

            Ok(cfg)
        } else {
            info!(
                "No config file found at {}, using default configuration. Creating it now.",
                path.display()
            );

            let default_config = Self::default();
            default_config.save_to(path).await?;

            Ok(default_config)
        }
    }

    /// Saves config to the platform config dir.
    pub async fn save(&self) -> Result<(), AppError> {
        self.save_to(&Self::config_path()?).await
    }

    pub async fn save_to(&self, path: &Path) -> Result<(), AppError> {
        info!("Saving config to {}", path.display());

        if let Some(parent) = path.parent() {
            TokioFs::create_dir_all(parent).await?;
        }

        let toml_str = toml::to_string_pretty(self)?;
        TokioFs::write(path, toml_str).await?;

        Ok(())
    }

    /// Returns the canonical config file path using `directories::ProjectDirs`.
    pub fn config_path() -> Result<PathBuf, AppError> {
        Ok(project_dirs()?.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_load_from_missing_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/config.toml");

        let cfg = Config::load_from(&path).await.unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());

        let again = Config::load_from(&path).await.unwrap();
        assert_eq!(again, cfg);
    }

    #[tokio::test]
    async fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        tokio::fs::write(
            &path,
            r#"
seed_defaults = false

[logging]
level = "debug"

[debounce.notes]
delay = "150ms"
"#,
        )
        .await
        .unwrap();

        let cfg = Config::load_from(&path).await.unwrap();
        assert!(!cfg.seed_defaults);
        assert_eq!(cfg.logging.level, "debug");
        assert!(!cfg.logging.stderr);
        assert_eq!(cfg.debounce.notes.delay, Duration::from_millis(150));
        assert_eq!(cfg.debounce.notes.max_delay, None);
        assert_eq!(cfg.debounce.search, DebounceConfig::search_input());
    }

    #[tokio::test]
    async fn test_malformed_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        tokio::fs::write(&path, "seed_defaults = [").await.unwrap();

        assert!(matches!(
            Config::load_from(&path).await,
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_explicit_data_dir_wins() {
        let storage = StorageConfig {
            data_dir: Some(PathBuf::from("/tmp/audit-data")),
        };
        assert_eq!(
            storage.resolved_data_dir().unwrap(),
            PathBuf::from("/tmp/audit-data")
        );
    }
}
