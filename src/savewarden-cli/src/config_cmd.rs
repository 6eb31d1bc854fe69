//! Config command: inspect or change the persisted configuration.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use savewarden_core::WardenConfig;

use crate::styled_output::{MessageType, print_success, print_warning, println_styled};

/// Config CLI command.
#[derive(Debug, Parser)]
pub struct ConfigCli {
    #[command(subcommand)]
    pub action: Option<ConfigSubcommand>,
}

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Print the configuration (default)
    Show(ConfigShowArgs),

    /// Print the config file location
    Path,

    /// Persist a new save directory
    Set(ConfigSetArgs),
}

/// Arguments for config show command.
#[derive(Debug, Default, Parser)]
pub struct ConfigShowArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for config set command.
#[derive(Debug, Parser)]
pub struct ConfigSetArgs {
    /// Directory holding the TUNIC save files
    #[arg(value_name = "DIR")]
    pub saves: PathBuf,
}

/// Warning for a global `--saves` given to a `config` command.
pub fn ignored_saves_notice(saves: Option<&Path>) -> Option<String> {
    saves.map(|saves| {
        format!(
            "--saves {} is ignored here; use `savewarden config set <DIR>` to change the save directory",
            saves.display()
        )
    })
}

impl ConfigCli {
    pub fn run(self, config_path: &Path, saves_override: Option<&Path>) -> Result<()> {
        if let Some(notice) = ignored_saves_notice(saves_override) {
            print_warning(&notice);
        }
        match self.action {
            None => show(config_path, &ConfigShowArgs::default()),
            Some(ConfigSubcommand::Show(args)) => show(config_path, &args),
            Some(ConfigSubcommand::Path) => {
                println!("{}", config_path.display());
                Ok(())
            }
            Some(ConfigSubcommand::Set(args)) => {
                let config = set_saves(config_path, args.saves)?;
                print_success(&format!("Set saves = {}", config.saves.display()));
                Ok(())
            }
        }
    }
}

fn show(config_path: &Path, args: &ConfigShowArgs) -> Result<()> {
    let config = WardenConfig::load_if_exists(config_path)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    println!("Configuration file: {}", config_path.display());
    match config {
        Some(config) => {
            println!("  saves             {}", config.saves.display());
            println!("  poll_interval_ms  {}", config.poll_interval_ms);
        }
        None => println_styled(MessageType::Dim, "No configuration file found"),
    }
    Ok(())
}

/// Store `saves` in the config at `config_path`, keeping other settings.
pub fn set_saves(config_path: &Path, saves: PathBuf) -> Result<WardenConfig> {
    let config = match WardenConfig::load_if_exists(config_path)? {
        Some(existing) => WardenConfig { saves, ..existing },
        None => WardenConfig::new(saves),
    };
    config
        .save(config_path)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;
    Ok(config)
}
