//! Status command: what is on disk right now.

use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

use savewarden_core::{DecodeError, SaveDirectory, SnapshotRead, WardenConfig};

use crate::styled_output::{MessageType, println_styled, styled_label};

/// Status command arguments.
#[derive(Debug, Default, Parser)]
pub struct StatusCli {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Snapshot grouped by slot.
#[derive(Debug, Serialize)]
struct StatusReport<'a> {
    saves: &'a Path,
    slots: BTreeMap<&'a str, Vec<u64>>,
    rejected: &'a [DecodeError],
}

impl<'a> StatusReport<'a> {
    fn new(saves: &'a Path, read: &'a SnapshotRead) -> Self {
        Self {
            saves,
            slots: read.snapshot.by_slot(),
            rejected: &read.rejected,
        }
    }

    /// One line per slot, e.g. `hero  0, 3`.
    fn slot_lines(&self) -> Vec<String> {
        let width = self.slots.keys().map(|s| s.len()).max().unwrap_or(0);
        self.slots
            .iter()
            .map(|(slot_name, generations)| {
                let generations: Vec<String> = generations.iter().map(u64::to_string).collect();
                format!("{slot_name:<width$}  {}", generations.join(", "))
            })
            .collect()
    }
}

impl StatusCli {
    pub async fn run(self, config: WardenConfig) -> Result<()> {
        let read = SaveDirectory::new(&config.saves).snapshot().await?;
        let status = StatusReport::new(&config.saves, &read);

        if self.json {
            println!("{}", serde_json::to_string_pretty(&status)?);
            return Ok(());
        }

        println!(
            "{} {}",
            styled_label(MessageType::Info, "Save directory:"),
            config.saves.display()
        );
        if status.slots.is_empty() {
            println_styled(MessageType::Dim, "No save files found");
        }
        for line in status.slot_lines() {
            println!("  {line}");
        }
        for err in status.rejected {
            println_styled(MessageType::Warning, &format!("Skipping {err}"));
        }
        Ok(())
    }
}
