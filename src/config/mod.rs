//! Configuration for narlock
//!
//! Settings live in a project-local `narlock.toml`; every field has a
//! default so the file is optional. `--config` points at an explicit
//! file instead.

use crate::error::{NarlockError, NarlockResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default project-local config file name.
pub const LOCAL_CONFIG_FILE: &str = "narlock.toml";

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Binary cache settings
    pub cache: CacheConfig,

    /// Store layout settings
    pub store: StoreConfig,

    /// Lockfile settings
    pub lock: LockConfig,
}

/// Binary cache endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache root URL
    pub url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: crate::cache::DEFAULT_CACHE_URL.to_string(),
            timeout_secs: 60,
        }
    }
}

/// Store namespace settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Prefix store paths live under
    pub prefix: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            prefix: crate::store::DEFAULT_STORE_PREFIX.to_string(),
        }
    }
}

/// Lockfile settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LockConfig {
    /// Path of the lockfile to maintain
    pub path: PathBuf,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("nix.lock"),
        }
    }
}

impl Config {
    /// Load configuration. An explicit path must exist; otherwise the
    /// local `narlock.toml` is used when present, else defaults.
    pub fn load(explicit: Option<&Path>) -> NarlockResult<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let local = PathBuf::from(LOCAL_CONFIG_FILE);
                if !local.exists() {
                    debug!("no {LOCAL_CONFIG_FILE} found, using defaults");
                    return Ok(Self::default());
                }
                local
            }
        };

        Self::load_from_file(&path)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> NarlockResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| NarlockError::io(format!("reading config from {}", path.display()), e))?;

        toml::from_str(&content).map_err(|e| NarlockError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// HTTP timeout as a duration.
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.cache.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.cache.url, "https://cache.nixos.org");
        assert_eq!(config.store.prefix, "/nix/store/");
        assert_eq!(config.lock.path, PathBuf::from("nix.lock"));
        assert_eq!(config.timeout().as_secs(), 60);
    }

    #[test]
    fn load_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("narlock.toml");
        fs::write(&path, "[cache]\nurl = \"https://cache.example.org\"\n").unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.cache.url, "https://cache.example.org");
        assert_eq!(config.store.prefix, "/nix/store/");
    }

    #[test]
    fn invalid_toml_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("narlock.toml");
        fs::write(&path, "cache = [broken").unwrap();

        let err = Config::load_from_file(&path).unwrap_err();
        assert!(matches!(err, NarlockError::ConfigInvalid { .. }));
    }

    #[test]
    fn explicit_missing_path_errors() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(Config::load(Some(&missing)).is_err());
    }
}
