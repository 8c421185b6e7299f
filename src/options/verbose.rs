use std::env;
use tracing_subscriber::EnvFilter;

/// `RUNNER_DEBUG=1` is how workflow runs request step debug logging.
pub fn runner_debug() -> bool {
    env::var("RUNNER_DEBUG").is_ok_and(|value| value == "1")
}

/// Installs the stderr log subscriber. `RUST_LOG` wins over `--verbose`.
pub fn init(verbose: bool) {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) if verbose || runner_debug() => EnvFilter::new("setup_sops=debug"),
        Err(_) => EnvFilter::new("warn"),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
