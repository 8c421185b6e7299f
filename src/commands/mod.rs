pub mod config;
pub mod latest;
pub mod setup;
pub mod url;

use crate::config::{Config, GITHUB_REPOSITORY, TOOL_NAME};
use crate::latest::{resolve_latest, LatestResolution, LatestStrategy, ReleaseFeed};
use crate::options::TargetArgs;
use crate::utils::platform::Platform;
use crate::utils::{is_latest, runner, to_tag};
use anyhow::{anyhow, Result};
use tracing::debug;

pub fn required_version(target: &TargetArgs) -> Result<String> {
    target
        .version
        .as_deref()
        .map(str::trim)
        .filter(|version| !version.is_empty())
        .map(str::to_string)
        .ok_or_else(|| anyhow!("Input required and not supplied: version"))
}

/// Turns the version input into the tag used for URLs and cache keys,
/// consulting the release feed only for `latest`.
pub fn resolve_version(
    input: &str,
    feed: &dyn ReleaseFeed,
    strategy: LatestStrategy,
    config: &Config,
) -> String {
    if !is_latest(input) {
        return to_tag(input);
    }

    let resolution = resolve_latest(
        feed,
        strategy,
        GITHUB_REPOSITORY,
        TOOL_NAME,
        &config.default_version,
    );
    if let LatestResolution::FallenBack { reason, version } = &resolution {
        runner::warning(&format!("{}. Using default version {}.", reason, version));
    }

    let version = to_tag(resolution.version());
    debug!(%input, %version, "Resolved version input");
    version
}

/// Platform and version tag for a run. The platform is resolved first so an
/// unsupported runner fails without touching the feed.
pub fn resolve_target(
    target: &TargetArgs,
    feed: &dyn ReleaseFeed,
    config: &Config,
) -> Result<(Platform, String)> {
    let input = required_version(target)?;

    let platform = Platform::detect(target.os.as_deref(), target.arch.as_deref())?;
    debug!(%platform, "Detected platform");

    let version = resolve_version(&input, feed, strategy(target, config), config);
    Ok((platform, version))
}

pub fn strategy(target: &TargetArgs, config: &Config) -> LatestStrategy {
    target.strategy.unwrap_or(config.latest_strategy)
}
