//! Configuration file and store factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use visiotest_core::traits::RecordStore;

use crate::json_file::JsonFileStore;
use crate::mock::MockStore;

/// Which record store to use.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StoreConfig {
    /// Logging stand-in that keeps nothing.
    #[default]
    Mock,
    /// JSON-lines files under `dir`.
    Json {
        #[serde(default = "default_store_dir")]
        dir: PathBuf,
    },
}

fn default_store_dir() -> PathBuf {
    PathBuf::from("./visiotest-data")
}

/// Top-level visiotest configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisiotestConfig {
    /// Highest level of each test.
    #[serde(default = "default_max_level")]
    pub max_level: u32,
    /// Pause after a test finishes before returning to the menu, in milliseconds.
    #[serde(default = "default_completion_delay")]
    pub completion_delay_ms: u64,
    /// Where session snapshots and exports are written.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub store: StoreConfig,
}

fn default_max_level() -> u32 {
    10
}
fn default_completion_delay() -> u64 {
    2000
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./visiotest-results")
}

impl Default for VisiotestConfig {
    fn default() -> Self {
        Self {
            max_level: default_max_level(),
            completion_delay_ms: default_completion_delay(),
            output_dir: default_output_dir(),
            store: StoreConfig::default(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `visiotest.toml` in the current directory
/// 2. `~/.config/visiotest/config.toml`
///
/// Environment variable override: `VISIOTEST_STORE_DIR` switches to a JSON store there.
pub fn load_config() -> Result<VisiotestConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<VisiotestConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("visiotest.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<VisiotestConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => VisiotestConfig::default(),
    };

    if let Ok(dir) = std::env::var("VISIOTEST_STORE_DIR") {
        config.store = StoreConfig::Json {
            dir: PathBuf::from(dir),
        };
    }

    config.output_dir = resolve_path(&config.output_dir);
    if let StoreConfig::Json { dir } = &mut config.store {
        *dir = resolve_path(dir);
    }

    anyhow::ensure!(config.max_level >= 1, "max_level must be at least 1");
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("visiotest"))
}

/// Create a record store from its configuration.
pub fn create_store(config: &StoreConfig) -> Result<Arc<dyn RecordStore>> {
    match config {
        StoreConfig::Mock => Ok(Arc::new(MockStore::new())),
        StoreConfig::Json { dir } => Ok(Arc::new(JsonFileStore::new(dir.clone())?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_VISIOTEST_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_VISIOTEST_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_VISIOTEST_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("no vars"), "no vars");
        std::env::remove_var("_VISIOTEST_TEST_VAR");
    }

    #[test]
    fn default_config() {
        let config = VisiotestConfig::default();
        assert_eq!(config.max_level, 10);
        assert_eq!(config.completion_delay_ms, 2000);
        assert_eq!(config.store, StoreConfig::Mock);
    }

    #[test]
    fn parse_json_store_config() {
        let toml_str = r#"
max_level = 8
completion_delay_ms = 500

[store]
type = "json"
dir = "/tmp/visiotest-data"
"#;
        let config: VisiotestConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.max_level, 8);
        assert_eq!(config.completion_delay_ms, 500);
        assert_eq!(
            config.store,
            StoreConfig::Json {
                dir: PathBuf::from("/tmp/visiotest-data")
            }
        );
        assert_eq!(config.output_dir, PathBuf::from("./visiotest-results"));
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let err = load_config_from(Some(Path::new("/nonexistent/visiotest.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn zero_max_level_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("visiotest.toml");
        std::fs::write(&path, "max_level = 0\n").unwrap();
        let err = load_config_from(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("max_level"));
    }

    #[test]
    fn factory_builds_both_stores() {
        let mock = create_store(&StoreConfig::Mock).unwrap();
        assert_eq!(mock.name(), "mock");

        let dir = tempfile::tempdir().unwrap();
        let json = create_store(&StoreConfig::Json {
            dir: dir.path().join("data"),
        })
        .unwrap();
        assert_eq!(json.name(), "json");
        assert!(dir.path().join("data").is_dir());
    }
}
