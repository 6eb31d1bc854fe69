//! CLI argument structures and parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::styles::{AFTER_HELP, get_styles};
use crate::config_cmd::ConfigCli;
use crate::once_cmd::OnceCli;
use crate::status_cmd::StatusCli;
use crate::watch_cmd::WatchCli;

/// Log verbosity level for CLI output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevel {
    /// Only show errors
    Error,
    /// Show warnings and errors (default; events are already printed)
    #[default]
    Warn,
    /// Show informational messages, warnings, and errors
    Info,
    /// Show debug messages and above
    Debug,
    /// Show all messages including trace-level details
    Trace,
}

impl LogLevel {
    /// Convert to tracing filter string.
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    /// Parse from string (case-insensitive).
    pub fn from_str_loose(s: &str) -> Option<LogLevel> {
        match s.to_lowercase().as_str() {
            "error" => Some(LogLevel::Error),
            "warn" | "warning" => Some(LogLevel::Warn),
            "info" => Some(LogLevel::Info),
            "debug" => Some(LogLevel::Debug),
            "trace" => Some(LogLevel::Trace),
            _ => None,
        }
    }

    /// Filter directives scoping this level to savewarden crates.
    pub fn directives(&self) -> String {
        let level = self.as_filter_str();
        format!("warn,savewarden={level},savewarden_cli={level},savewarden_core={level}")
    }
}

/// Color output mode for CLI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ColorMode {
    /// Automatically detect if output is a terminal
    #[default]
    Auto,
    /// Always output with colors
    Always,
    /// Never output with colors
    Never,
}

/// Savewarden - keeps TUNIC save slots from being overwritten.
///
/// If no subcommand is specified, watches the save directory.
#[derive(Debug, Parser)]
#[command(name = "savewarden")]
#[command(author, version)]
#[command(about = "Savewarden - one generation per TUNIC save slot", long_about = None)]
#[command(styles = get_styles(), after_help = AFTER_HELP)]
pub struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Save directory for this run (persisted on first run)
    #[arg(long, global = true, value_name = "DIR")]
    pub saves: Option<PathBuf>,

    /// Enable verbose output (same as --log-level debug)
    #[arg(long = "verbose", short = 'v', global = true)]
    pub verbose: bool,

    /// Enable trace-level logging for debugging
    #[arg(long = "trace", global = true)]
    pub trace: bool,

    /// Log verbosity
    #[arg(long = "log-level", global = true, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Control color output: auto (default), always, or never
    #[arg(long = "color", global = true, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Effective log level: `--trace`, then `--verbose`, then
    /// `SAVEWARDEN_LOG_LEVEL`, then `--log-level`.
    pub fn effective_log_level(&self, env_level: Option<&str>) -> LogLevel {
        if self.trace {
            LogLevel::Trace
        } else if self.verbose {
            LogLevel::Debug
        } else {
            env_level
                .and_then(LogLevel::from_str_loose)
                .unwrap_or(self.log_level)
        }
    }
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Watch the save directory and enforce protections (default)
    #[command(display_order = 1)]
    Watch(WatchCli),

    /// Run a single pass from a fresh tracker and print what happened
    #[command(display_order = 2)]
    Once(OnceCli),

    /// Show the save slots currently on disk
    #[command(visible_alias = "ls", display_order = 3)]
    Status(StatusCli),

    /// Show or change the configuration
    #[command(display_order = 4)]
    Config(ConfigCli),
}
