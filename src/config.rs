//! Storage root configuration.
//!
//! The root is always passed to [`IdentityStore`](crate::identity::IdentityStore)
//! explicitly. The CLI resolves it from, in order: `--root`, a YAML file
//! given by `--config`, the `AGENTID_ROOT` environment variable.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::IdentityError;

/// Environment variable naming the storage root.
pub const ROOT_ENV: &str = "AGENTID_ROOT";

/// Where identity records live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Base directory; host directories are created beneath it.
    pub root: PathBuf,
}

impl StoreConfig {
    /// Creates a config for the given root.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Loads a config from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Config`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, IdentityError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            IdentityError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_yaml(&content)
            .map_err(|e| IdentityError::Config(format!("failed to parse {}: {e}", path.display())))
    }

    fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Reads the root from [`ROOT_ENV`], if set and non-empty.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        std::env::var_os(ROOT_ENV).filter(|v| !v.is_empty()).map(Self::new)
    }

    /// Resolves the config from an explicit root, a config file, or the environment.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Config`] if a config file fails to load or no
    /// source provides a root.
    pub fn resolve(root: Option<&Path>, config_file: Option<&Path>) -> Result<Self, IdentityError> {
        if let Some(root) = root {
            return Ok(Self::new(root));
        }
        if let Some(path) = config_file {
            return Self::load(path);
        }
        Self::from_env().ok_or_else(|| {
            IdentityError::Config(format!("no storage root: pass --root, --config, or set {ROOT_ENV}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_yaml() {
        let config = StoreConfig::from_yaml("root: /var/lib/agentid\n").unwrap();
        assert_eq!(config, StoreConfig::new("/var/lib/agentid"));
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(StoreConfig::from_yaml("root: /x\nextra: 1\n").is_err());
    }

    #[test]
    fn explicit_root_wins_over_file() {
        let config =
            StoreConfig::resolve(Some(Path::new("/a")), Some(Path::new("/nonexistent.yaml")))
                .unwrap();
        assert_eq!(config.root, PathBuf::from("/a"));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = StoreConfig::load(Path::new("/nonexistent/agentid.yaml")).unwrap_err();
        assert!(matches!(err, IdentityError::Config(ref m) if m.contains("failed to read")));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agentid.yaml");
        std::fs::write(&path, "root: /srv/ids\n").unwrap();

        let config = StoreConfig::resolve(None, Some(path.as_path())).unwrap();
        assert_eq!(config.root, PathBuf::from("/srv/ids"));
    }
}
