//! Config Resolver.
//!
//! Repository configuration lives on disk as one JSON file per repository,
//! `<dir>/<owner>/<repo>.json`, next to a `<dir>/_global.json` holding
//! groups shared across repositories. A missing repository file means the
//! bot should not process events for that repository at all.

use crate::error::AppError;
use crate::models::{GlobalConfig, RepoConfig};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Loads and merges reviewer configuration from a directory tree.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    dir: PathBuf,
}

impl ConfigStore {
    /// Create a store rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Load the configuration for `owner/repo`, with global groups merged in.
    ///
    /// Returns [`AppError::UnsupportedRepo`] when no file exists for the
    /// repository, and [`AppError::ConfigConflict`] when a global group name
    /// collides with a repo-specific one. Collisions are never resolved by
    /// picking a side.
    pub fn load(&self, full_name: &str) -> Result<RepoConfig, AppError> {
        let (owner, repo) = full_name.split_once('/').ok_or_else(|| {
            AppError::invalid_payload(format!("malformed repository name: {}", full_name))
        })?;

        let path = self.dir.join(owner).join(format!("{}.json", repo));
        let mut config: RepoConfig = read_json(&path)?.ok_or(AppError::UnsupportedRepo)?;

        let global_path = self.dir.join("_global.json");
        if let Some(global) = read_json::<GlobalConfig>(&global_path)? {
            for (name, people) in global.groups {
                if config.groups.contains_key(&name) {
                    return Err(AppError::config_conflict(format!(
                        "group {} overlaps with _global.json",
                        name
                    )));
                }
                config.groups.insert(name, people);
            }
        }

        Ok(config)
    }
}

/// Read and parse a JSON file, mapping a missing file to `None`.
fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>, AppError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(AppError::internal(format!(
                "failed to read {}: {}",
                path.display(),
                err
            )))
        }
    };

    serde_json::from_str(&text)
        .map(Some)
        .map_err(|err| AppError::config_conflict(format!("{}: {}", path.display(), err)))
}
