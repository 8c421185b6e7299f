use crate::acquire::BinaryAcquirer;
use crate::cache::FsToolCache;
use crate::config::{self, GITHUB_REPOSITORY, TOOL_NAME};
use crate::options::TargetArgs;
use crate::utils::download::HttpClient;
use crate::utils::runner::Runner;
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;

pub fn execute(target: &TargetArgs) -> Result<PathBuf> {
    let config = config::load_config()?;

    let client = HttpClient::new()?;
    let (platform, version) = super::resolve_target(target, &client, &config)?;

    let dirs = config::get_dirs(&config)?;
    let cache = FsToolCache::new(dirs.tool_cache_dir, dirs.temp_dir, &platform, client);
    let acquirer = BinaryAcquirer::new(cache, GITHUB_REPOSITORY, TOOL_NAME);
    let binary_path = acquirer.acquire(&version, &platform)?;

    let runner = Runner::from_env();
    let tool_dir = binary_path
        .parent()
        .context("Cached binary has no parent directory")?;
    runner.add_path(tool_dir)?;
    runner.set_output("path", &binary_path.to_string_lossy())?;

    println!(
        "{} version: '{}' has been cached at {}",
        TOOL_NAME,
        version.green(),
        binary_path.display()
    );

    Ok(binary_path)
}
