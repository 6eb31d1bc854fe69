//! Locating, loading and creating the config file.

use anyhow::{Context, Result, bail};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use savewarden_core::{CONFIG_FILE, WardenConfig, default_config_path};

use crate::styled_output::print_success;

/// `--config` if given, else the default location.
///
/// When the default file does not exist yet but `config.json` does in the
/// working directory, that file is used instead, which is where earlier
/// releases kept it.
pub fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    let default = default_config_path().context("Could not determine the config location")?;
    Ok(pick_config_path(default, Path::new(CONFIG_FILE)))
}

fn pick_config_path(default: PathBuf, legacy: &Path) -> PathBuf {
    if !default.exists() && legacy.is_file() {
        debug!(path = %legacy.display(), "using config from the working directory");
        return legacy.to_path_buf();
    }
    default
}

/// Load the config at `path`, creating it on first run.
///
/// `saves_override` replaces the save directory for this run when a config
/// already exists, and becomes the persisted directory when none does.
/// Without it, a first run asks for the directory on `input`.
pub fn load_or_create(
    path: &Path,
    saves_override: Option<&Path>,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Result<WardenConfig> {
    if let Some(mut config) = WardenConfig::load_if_exists(path)? {
        if let Some(saves) = saves_override {
            debug!(saves = %saves.display(), "overriding save directory for this run");
            config.saves = saves.to_path_buf();
        }
        return Ok(config);
    }

    let saves = match saves_override {
        Some(saves) => saves.to_path_buf(),
        None => prompt_save_dir(input, output)?,
    };
    let config = WardenConfig::new(saves);
    config
        .save(path)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    print_success(&format!("Saved config to {}", path.display()));
    Ok(config)
}

/// Ask for the save directory on first run.
fn prompt_save_dir(input: &mut impl BufRead, output: &mut impl Write) -> Result<PathBuf> {
    write!(output, "TUNIC save directory: ")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        bail!("No save directory given. Pass --saves <DIR> or run `savewarden config set <DIR>`.");
    }
    let answer = line.trim();
    if answer.is_empty() {
        bail!("No save directory given. Pass --saves <DIR> or run `savewarden config set <DIR>`.");
    }
    Ok(PathBuf::from(answer))
}
