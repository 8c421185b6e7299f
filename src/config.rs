use crate::latest::LatestStrategy;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const TOOL_NAME: &str = "sops";
pub const GITHUB_REPOSITORY: &str = "getsops/sops";
/// Used when the release feed cannot be reached.
pub const DEFAULT_VERSION: &str = "v3.10.2";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub default_version: String,
    pub latest_strategy: LatestStrategy,
    pub tool_cache_dir: Option<PathBuf>,
}

pub struct SetupDirs {
    pub tool_cache_dir: PathBuf,
    pub temp_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_version: DEFAULT_VERSION.to_string(),
            latest_strategy: LatestStrategy::default(),
            tool_cache_dir: None,
        }
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "setup-sops", "setup-sops")
        .context("Failed to determine project directories")
}

fn env_path(name: &str) -> Option<PathBuf> {
    env::var_os(name)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// `RUNNER_TOOL_CACHE` and `RUNNER_TEMP` take precedence over the
/// configured and per-user locations.
pub fn get_dirs(config: &Config) -> Result<SetupDirs> {
    let project_dirs = project_dirs()?;

    let tool_cache_dir = env_path("RUNNER_TOOL_CACHE")
        .or_else(|| config.tool_cache_dir.clone())
        .unwrap_or_else(|| project_dirs.cache_dir().join("tools"));
    let temp_dir = env_path("RUNNER_TEMP")
        .unwrap_or_else(|| project_dirs.cache_dir().join("temp"));

    fs::create_dir_all(&tool_cache_dir)
        .with_context(|| format!("Failed to create {}", tool_cache_dir.display()))?;
    fs::create_dir_all(&temp_dir)
        .with_context(|| format!("Failed to create {}", temp_dir.display()))?;

    Ok(SetupDirs {
        tool_cache_dir,
        temp_dir,
    })
}

/// Loads `config.json` from the user config directory; a missing file
/// yields the defaults and is not created.
pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

pub fn config_path() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().join("config.json"))
}

pub fn load_config_from(config_path: &Path) -> Result<Config> {
    if !config_path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read {}", config_path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid configuration in {}", config_path.display()))
}

pub fn save_config(config: &Config, config_path: &Path) -> Result<()> {
    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let content = serde_json::to_string_pretty(config)?;
    fs::write(config_path, content)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_config_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let config = load_config_from(&temp.path().join("config.json")).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.default_version, "v3.10.2");
        assert_eq!(config.latest_strategy, LatestStrategy::Direct);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        fs::write(&path, r#"{ "latest_strategy": "enumerate" }"#).unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.latest_strategy, LatestStrategy::Enumerate);
        assert_eq!(config.default_version, DEFAULT_VERSION);
        assert!(config.tool_cache_dir.is_none());
    }

    #[test]
    fn test_save_and_reload() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.json");
        let config = Config {
            default_version: "v3.9.0".to_string(),
            latest_strategy: LatestStrategy::Enumerate,
            tool_cache_dir: Some(temp.path().join("tools")),
        };

        save_config(&config, &path).unwrap();
        assert_eq!(load_config_from(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid configuration"));
    }
}
