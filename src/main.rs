mod acquire;
mod cache;
mod commands;
mod config;
mod error;
mod latest;
mod options;
mod utils;

use clap::Parser;
use utils::runner;

fn main() -> anyhow::Result<()> {
    let cli = options::Cli::parse();

    options::verbose::init(cli.verbose);

    if cli.self_version {
        options::version::show();
        return Ok(());
    }

    match cli.command {
        None | Some(options::Commands::Setup) => {
            // Failures are reported to the runner, never as a panic or raw error.
            if let Err(e) = commands::setup::execute(&cli.target) {
                runner::set_failed(&format!("{:#}", e));
                std::process::exit(1);
            }
        }
        Some(options::Commands::Latest) => {
            commands::latest::execute(&cli.target)?;
        }
        Some(options::Commands::Url) => {
            commands::url::execute(&cli.target)?;
        }
        Some(options::Commands::Config {
            default_version,
            latest_strategy,
            tool_cache_dir,
        }) => {
            commands::config::execute(default_version, latest_strategy, tool_cache_dir)?;
        }
    }

    Ok(())
}
