use crate::config;
use crate::options::TargetArgs;
use crate::utils::download::HttpClient;
use anyhow::Result;

pub fn execute(target: &TargetArgs) -> Result<()> {
    let config = config::load_config()?;
    let client = HttpClient::new()?;

    let version = super::resolve_version(
        "latest",
        &client,
        super::strategy(target, &config),
        &config,
    );
    println!("{}", version);

    Ok(())
}
