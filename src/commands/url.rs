use crate::config::{self, GITHUB_REPOSITORY, TOOL_NAME};
use crate::options::TargetArgs;
use crate::utils::download::HttpClient;
use crate::utils::release;
use anyhow::Result;
use colored::Colorize;

pub fn execute(target: &TargetArgs) -> Result<()> {
    let config = config::load_config()?;
    let client = HttpClient::new()?;
    let (platform, version) = super::resolve_target(target, &client, &config)?;

    let asset = release::asset(GITHUB_REPOSITORY, TOOL_NAME, &version, &platform);
    println!("{} {} ({})", TOOL_NAME, version.green(), platform);
    println!("  asset: {}", asset.filename);
    println!("  url:   {}", asset.url);

    Ok(())
}
