// Configuration file handling

use crate::seed::{DEFAULT_SEED_URL, HttpSeedSource, JsonlSeedSource, SeedSource};
use crate::store::{DEFAULT_DESCRIPTION, DEFAULT_SEED_LIMIT, StoreOptions};
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Settings read from `tasklist.yml`
///
/// Every key is optional; anything left out takes its default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Whether to import seed records at startup
    pub seed_enabled: bool,
    pub seed_url: String,
    /// Local JSONL seed file, used instead of `seed_url` when set
    pub seed_file: Option<PathBuf>,
    pub seed_limit: usize,
    pub default_description: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed_enabled: true,
            seed_url: DEFAULT_SEED_URL.to_string(),
            seed_file: None,
            seed_limit: DEFAULT_SEED_LIMIT,
            default_description: DEFAULT_DESCRIPTION.to_string(),
        }
    }
}

impl Config {
    /// `<config dir>/tasklist/tasklist.yml`, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tasklist").join("tasklist.yml"))
    }

    /// Load from `path`; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = ?path, "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config =
            serde_yaml::from_str(&content).with_context(|| format!("Failed to parse config {}", path.display()))?;

        debug!(path = ?path, ?config, "Loaded config");
        Ok(config)
    }

    /// Load from the default location, or defaults when there is none
    pub fn load_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            seed_limit: self.seed_limit,
            default_description: self.default_description.clone(),
        }
    }

    /// Seed source to use at startup, or `None` when seeding is off
    pub fn seed_source(&self) -> Option<Box<dyn SeedSource>> {
        if !self.seed_enabled {
            return None;
        }
        let source: Box<dyn SeedSource> = match &self.seed_file {
            Some(path) => Box::new(JsonlSeedSource::new(path.clone())),
            None => Box::new(HttpSeedSource::new(self.seed_url.clone())),
        };
        Some(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp = TempDir::new().unwrap();

        let config = Config::load(&temp.path().join("tasklist.yml")).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.seed_limit, 20);
        assert_eq!(config.default_description, "No description");
        assert!(config.seed_enabled);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tasklist.yml");
        fs::write(&path, "seed_limit: 5\ndefault_description: TBD\n").unwrap();

        let config = Config::load(&path).unwrap();

        assert_eq!(config.seed_limit, 5);
        assert_eq!(config.default_description, "TBD");
        assert_eq!(config.seed_url, DEFAULT_SEED_URL);
        assert_eq!(config.seed_file, None);
    }

    #[test]
    fn test_malformed_file_is_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tasklist.yml");
        fs::write(&path, "seed_limit: [not, a, number]\n").unwrap();

        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_store_options_from_config() {
        let config = Config {
            seed_limit: 3,
            default_description: "n/a".to_string(),
            ..Config::default()
        };

        let options = config.store_options();

        assert_eq!(options.seed_limit, 3);
        assert_eq!(options.default_description, "n/a");
    }

    #[test]
    fn test_seed_source_selection() {
        let config = Config::default();
        assert_eq!(config.seed_source().unwrap().describe(), DEFAULT_SEED_URL);

        let config = Config {
            seed_file: Some(PathBuf::from("seed.jsonl")),
            ..Config::default()
        };
        assert_eq!(config.seed_source().unwrap().describe(), "seed.jsonl");

        let config = Config {
            seed_enabled: false,
            ..Config::default()
        };
        assert!(config.seed_source().is_none());
    }
}
