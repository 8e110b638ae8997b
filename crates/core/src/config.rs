//! Layered application configuration (defaults, TOML file, environment).

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use ::config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{error::ConfigError, filter::DEFAULT_LOCALIZED_LANGUAGE, search::OverlapPolicy};

/// Directory under the user's config dir holding `config.toml`.
pub const CONFIG_DIR: &str = "gamelist";
/// Prefix for environment overrides (`GAMELIST_SEARCH_DELAY_MS=250`).
pub const ENV_PREFIX: &str = "GAMELIST";

const DEFAULT_SEARCH_DELAY_MS: u64 = 1000;

const DEFAULT_CONFIG_TOML: &str = r#"# Game catalog browser settings.

# Artificial wait before a search result is shown, in milliseconds.
search_delay_ms = 1000

# Language code required by the "localized only" checkbox.
localized_language = "RUS"

# How overlapping searches are reconciled:
# "last_completed_wins" or "latest_submission_wins".
overlap_policy = "last_completed_wins"

# Replace the bundled dataset with a JSON file.
# catalog_path = "/path/to/games.json"
"#;

/// Runtime settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Delay before a submitted search is displayed.
    pub search_delay_ms: u64,
    /// Language code tested by the localized-language filter.
    pub localized_language: String,
    /// Optional dataset replacing the bundled catalog.
    pub catalog_path: Option<PathBuf>,
    /// Reconciliation of overlapping submissions.
    pub overlap_policy: OverlapPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            search_delay_ms: DEFAULT_SEARCH_DELAY_MS,
            localized_language: DEFAULT_LOCALIZED_LANGUAGE.to_string(),
            catalog_path: None,
            overlap_policy: OverlapPolicy::default(),
        }
    }
}

impl AppConfig {
    /// Load from the default config file plus `GAMELIST_*` overrides.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(config_path())
    }

    /// Load from the given file (missing is fine) plus `GAMELIST_*` overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::load_with(path, Environment::with_prefix(ENV_PREFIX).try_parsing(true))
    }

    fn load_with(path: impl AsRef<Path>, env: Environment) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(false))
            .add_source(env)
            .build()?;
        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;
        info!(path = %path.display(), ?config, "Configuration loaded");
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.localized_language.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "localized_language",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Search delay as a [`Duration`].
    pub fn search_delay(&self) -> Duration {
        Duration::from_millis(self.search_delay_ms)
    }
}

/// Location of the user's config file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
        .join("config.toml")
}

/// Write the commented default config if no config file exists yet.
pub fn ensure_default_config() -> Result<PathBuf, ConfigError> {
    let path = config_path();
    write_default_config(&path)?;
    Ok(path)
}

fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    if path.exists() {
        return Ok(());
    }
    let write_err = |source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    fs::write(path, DEFAULT_CONFIG_TOML).map_err(write_err)?;
    info!(path = %path.display(), "Wrote default configuration");
    Ok(())
}
