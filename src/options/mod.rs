pub mod verbose;
pub mod version;

use crate::latest::LatestStrategy;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(disable_version_flag = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub target: TargetArgs,

    /// Print this tool's own version
    #[arg(short = 'V', long = "self-version", action = ArgAction::SetTrue)]
    pub self_version: bool,

    #[arg(short, long, global = true, action = ArgAction::SetTrue)]
    pub verbose: bool,
}

/// What to install and for which runner platform.
#[derive(Args, Debug, Clone, Default)]
pub struct TargetArgs {
    /// `latest`, `3.10.2` or `v3.10.2`
    #[arg(long, global = true, env = "INPUT_VERSION")]
    pub version: Option<String>,

    /// Runner OS name, defaults to RUNNER_OS or the host
    #[arg(long, global = true)]
    pub os: Option<String>,

    /// Runner architecture name, defaults to RUNNER_ARCH or the host
    #[arg(long, global = true)]
    pub arch: Option<String>,

    /// How `latest` is looked up
    #[arg(long, global = true, value_enum)]
    pub strategy: Option<LatestStrategy>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download (or reuse) the binary and expose it to the workflow
    Setup,

    /// Print the tag `latest` currently resolves to
    Latest,

    /// Print the release asset name and URL for a version
    Url,

    /// Persist defaults to the user configuration file
    Config {
        #[arg(long)]
        default_version: Option<String>,

        #[arg(long, value_enum)]
        latest_strategy: Option<LatestStrategy>,

        #[arg(long)]
        tool_cache_dir: Option<PathBuf>,
    },
}
