//! Single-pass command.
//!
//! Runs one cycle from an empty tracker, which is exactly what the first
//! tick after a restart does.

use anyhow::{Result, bail};
use clap::Parser;

use savewarden_core::{CycleOptions, ProtectionTracker, SaveDirectory, WardenConfig, run_cycle};

use crate::report::print_report;
use crate::styled_output::{MessageType, println_styled};

/// Once command arguments.
#[derive(Debug, Default, Parser)]
pub struct OnceCli {
    /// Report what would be deleted without deleting anything
    #[arg(long)]
    pub dry_run: bool,

    /// Output the cycle report as JSON
    #[arg(long)]
    pub json: bool,
}

impl OnceCli {
    pub async fn run(self, config: WardenConfig) -> Result<()> {
        let store = SaveDirectory::new(&config.saves);
        let options = CycleOptions::default().dry_run(self.dry_run);
        let report = run_cycle(&store, &ProtectionTracker::new(), options).await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print_report(&report);
            if report.snapshot_len == 0 {
                println_styled(MessageType::Dim, "No save files found");
            }
        }

        if report.has_failures() {
            bail!("{} deletion(s) failed", report.failures.len());
        }
        Ok(())
    }
}
