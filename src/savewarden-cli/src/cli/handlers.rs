//! Command dispatch.

use anyhow::Result;

use super::args::{Cli, Commands};
use crate::bootstrap::{load_or_create, resolve_config_path};
use crate::watch_cmd::WatchCli;

/// Dispatch a CLI command to its handler.
///
/// Every command except `config` needs a save directory and so goes
/// through first-run setup. `config` only warns about a global `--saves`.
pub async fn dispatch_command(cli: Cli) -> Result<()> {
    let Cli {
        config,
        saves,
        command,
        ..
    } = cli;
    let config_path = resolve_config_path(config.as_deref())?;
    let load = || {
        load_or_create(
            &config_path,
            saves.as_deref(),
            &mut std::io::stdin().lock(),
            &mut std::io::stderr(),
        )
    };

    match command.unwrap_or_else(|| Commands::Watch(WatchCli::default())) {
        Commands::Config(config_cli) => config_cli.run(&config_path, saves.as_deref()),
        Commands::Watch(watch_cli) => watch_cli.run(load()?).await,
        Commands::Once(once_cli) => once_cli.run(load()?).await,
        Commands::Status(status_cli) => status_cli.run(load()?).await,
    }
}
