use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod profiles;
pub mod types;

pub use profiles::ProfileLibrary;
pub use types::load_type_table;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid profile search pattern {pattern}: {source}")]
    ProfilePatternError {
        pattern: String,
        source: glob::PatternError,
    },

    #[error("No profile named '{name}' in {profiles_path}")]
    ProfileNotFound { name: String, profiles_path: PathBuf },

    #[error("No profiles found in {profiles_path}")]
    NoProfiles { profiles_path: PathBuf },
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding one `*.toml` file per profile.
    pub profiles_path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_profile: Option<String>,
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        config.profiles_path = expand_path(&config.profiles_path).unwrap_or(config.profiles_path);

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/xamlgen");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Loads every profile under `profiles_path`.
    pub fn profile_library(&self) -> Result<ProfileLibrary, ConfigError> {
        ProfileLibrary::load_dir(&self.profiles_path)
    }
}

/// Expands `~` and environment variables. `None` if a variable is undefined.
pub fn expand_path(path: &Path) -> Option<PathBuf> {
    let path_str = path.to_string_lossy();
    match shellexpand::full(&path_str) {
        Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
        Err(_) => None,
    }
}
