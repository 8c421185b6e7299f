use crate::config::{DEFAULT_VERSION, GITHUB_REPOSITORY, TOOL_NAME};
use colored::Colorize;

pub fn show() {
    let version = env!("CARGO_PKG_VERSION");
    let name = env!("CARGO_PKG_NAME");

    println!("{} v{}", name.bright_green(), version.bright_white());
    println!(
        "Installs {} from {} (fallback {})",
        TOOL_NAME.bright_blue(),
        GITHUB_REPOSITORY,
        DEFAULT_VERSION
    );
}
