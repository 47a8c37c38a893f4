//! Loading profiles from a directory of TOML files.

use std::path::{Path, PathBuf};

use log::{debug, warn};
use xamlgen_engine::Profile;

use crate::ConfigError;

/// All profiles found in one directory, sorted by name.
#[derive(Debug, Clone, Default)]
pub struct ProfileLibrary {
    pub profiles_path: PathBuf,
    profiles: Vec<Profile>,
}

impl ProfileLibrary {
    /// Loads every `*.toml` file in `dir` as one profile.
    ///
    /// Files that cannot be read, parsed or validated are skipped with a warning.
    pub fn load_dir<P: AsRef<Path>>(dir: P) -> Result<Self, ConfigError> {
        let dir = dir.as_ref();
        let pattern = dir.join("*.toml").to_string_lossy().into_owned();
        let paths = glob::glob(&pattern).map_err(|source| ConfigError::ProfilePatternError {
            pattern: pattern.clone(),
            source,
        })?;

        let mut profiles = Vec::new();
        for entry in paths {
            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    warn!("Skipping unreadable profile entry: {e}");
                    continue;
                }
            };
            match load_profile(&path) {
                Ok(profile) => {
                    debug!("Loaded profile '{}' from {}", profile.name, path.display());
                    profiles.push(profile);
                }
                Err(e) => warn!("Skipping profile {}: {e}", path.display()),
            }
        }

        Ok(Self::from_profiles(dir, profiles))
    }

    pub fn from_profiles(profiles_path: impl Into<PathBuf>, mut profiles: Vec<Profile>) -> Self {
        profiles.sort_by_key(|p| p.name.to_lowercase());
        Self {
            profiles_path: profiles_path.into(),
            profiles,
        }
    }

    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Looks a profile up by name, ignoring case.
    pub fn get(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| ConfigError::ProfileNotFound {
                name: name.to_string(),
                profiles_path: self.profiles_path.clone(),
            })
    }

    /// The profile to generate with: `requested` if given, else the configured
    /// active profile, else the first by name.
    pub fn active(
        &self,
        requested: Option<&str>,
        configured: Option<&str>,
    ) -> Result<&Profile, ConfigError> {
        if let Some(name) = requested.or(configured) {
            return self.get(name);
        }
        self.profiles.first().ok_or_else(|| ConfigError::NoProfiles {
            profiles_path: self.profiles_path.clone(),
        })
    }
}

fn load_profile(path: &Path) -> anyhow::Result<Profile> {
    let content = std::fs::read_to_string(path)?;
    let profile: Profile = toml::from_str(&content)?;
    profile.validate()?;
    Ok(profile)
}
