use crate::config;
use crate::latest::LatestStrategy;
use crate::utils::to_tag;
use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;

pub fn execute(
    default_version: Option<String>,
    latest_strategy: Option<LatestStrategy>,
    tool_cache_dir: Option<PathBuf>,
) -> Result<()> {
    let config_path = config::config_path()?;
    let mut config = config::load_config_from(&config_path)?;

    let changed = default_version.is_some() || latest_strategy.is_some() || tool_cache_dir.is_some();

    if let Some(version) = default_version {
        config.default_version = to_tag(&version);
    }
    if let Some(strategy) = latest_strategy {
        config.latest_strategy = strategy;
    }
    if let Some(dir) = tool_cache_dir {
        config.tool_cache_dir = Some(dir);
    }

    if changed {
        config::save_config(&config, &config_path)?;
        println!("Saved {}", config_path.display().to_string().green());
    }

    println!("{}", serde_json::to_string_pretty(&config)?);

    Ok(())
}
