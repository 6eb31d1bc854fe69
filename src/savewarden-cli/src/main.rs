//! Savewarden CLI - Main entry point.
//!
//! Watches a TUNIC save directory and deletes every generation of a save slot
//! except the one it protects. Run without a subcommand to start watching.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use savewarden_cli::cli::{Cli, ColorMode, dispatch_command};

/// Environment variable selecting the log level.
const LOG_LEVEL_ENV: &str = "SAVEWARDEN_LOG_LEVEL";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // SAFETY: Environment variable mutations happen early before threads spawn
    match cli.color {
        ColorMode::Never => unsafe { std::env::set_var("NO_COLOR", "1") },
        ColorMode::Always => unsafe {
            std::env::remove_var("NO_COLOR");
            std::env::set_var("CLICOLOR_FORCE", "1");
        },
        ColorMode::Auto => {}
    }

    let env_level = std::env::var(LOG_LEVEL_ENV).ok();
    let log_level = cli.effective_log_level(env_level.as_deref());
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.directives()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(cli.color != ColorMode::Never)
        .init();

    dispatch_command(cli).await
}
