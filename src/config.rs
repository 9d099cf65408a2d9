//! Connection settings loaded from `config.toml`
//!
//! ```toml
//! url = "http://localhost:3000/api"
//! token = "..."
//! project_id = 1
//! ```
//!
//! Command-line flags and `SEMAPHORE_URL` / `SEMAPHORE_TOKEN` take
//! precedence over the file.

use crate::paths;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// API base URL, e.g. `http://localhost:3000/api`
    #[serde(default)]
    pub url: Option<String>,
    /// Bearer token
    #[serde(default)]
    pub token: Option<String>,
    /// Default project for project-scoped components
    #[serde(default)]
    pub project_id: Option<i64>,
}

impl Config {
    /// Load config from an explicit path, or from the default location.
    ///
    /// An explicit path must exist; a missing default file yields an empty
    /// config.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_path(&paths::expand(&path.to_string_lossy())),
            None => {
                let path = paths::config_file()?;
                if path.exists() {
                    Self::from_path(&path)
                } else {
                    log::debug!("No config file at {}, using defaults", path.display());
                    Ok(Self::default())
                }
            }
        }
    }

    /// Load config from a TOML file
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        let config =
            toml::from_str(&content).with_context(|| format!("Invalid {}", path.display()))?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Resolve the API url: flag/env first, then file
    pub fn url(&self, flag: Option<&str>) -> String {
        flag.map(str::to_string)
            .or_else(|| self.url.clone())
            .unwrap_or_default()
    }

    /// Resolve the token: flag/env first, then file
    pub fn token(&self, flag: Option<&str>) -> String {
        flag.map(str::to_string)
            .or_else(|| self.token.clone())
            .unwrap_or_default()
    }

    /// Resolve the project scope: flag first, then file
    pub fn project_id(&self, flag: Option<i64>) -> Option<i64> {
        flag.or(self.project_id)
    }
}

/// Path the config would be loaded from
pub fn location(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(paths::expand(&path.to_string_lossy())),
        None => paths::config_file(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_explicit_file() {
        let _guard = crate::paths::env_lock();
        let file = write_config(
            r#"
url = "http://localhost:3000/api"
token = "abc"
project_id = 4
"#,
        );
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.url.as_deref(), Some("http://localhost:3000/api"));
        assert_eq!(config.token.as_deref(), Some("abc"));
        assert_eq!(config.project_id, Some(4));
    }

    #[test]
    fn test_partial_file() {
        let file = write_config("url = \"http://sem/api\"\n");
        let config = Config::from_path(file.path()).unwrap();
        assert_eq!(config.token, None);
        assert_eq!(config.project_id, None);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let _guard = crate::paths::env_lock();
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(Config::load(Some(&missing)).is_err());
    }

    #[test]
    fn test_unknown_key_is_error() {
        let file = write_config("url = \"http://sem/api\"\npassword = \"x\"\n");
        assert!(Config::from_path(file.path()).is_err());
    }

    #[test]
    fn test_flag_takes_precedence() {
        let config = Config {
            url: Some("http://file/api".to_string()),
            token: Some("file-token".to_string()),
            project_id: Some(1),
        };
        assert_eq!(config.url(Some("http://flag/api")), "http://flag/api");
        assert_eq!(config.url(None), "http://file/api");
        assert_eq!(config.token(Some("flag-token")), "flag-token");
        assert_eq!(config.project_id(Some(9)), Some(9));
        assert_eq!(config.project_id(None), Some(1));
    }

    #[test]
    fn test_unresolved_values_are_empty() {
        let config = Config::default();
        assert_eq!(config.url(None), "");
        assert_eq!(config.token(None), "");
        assert_eq!(config.project_id(None), None);
    }
}
