//! The polling loop.
//!
//! One cycle per tick; a slow cycle delays the next tick instead of
//! bursting to catch up. Ctrl+C is only observed between cycles, so a
//! cycle always finishes its deletions.

use anyhow::{Context, Result};
use clap::Parser;
use std::collections::BTreeSet;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use savewarden_core::{
    CycleOptions, CycleReport, ProtectionTracker, SaveDirectory, SaveStore, WardenConfig,
    run_cycle,
};

use crate::report::print_report;
use crate::styled_output::{print_error, print_info, print_success};

/// Watch command arguments.
#[derive(Debug, Default, Parser)]
pub struct WatchCli {
    /// Milliseconds between polls (overrides the config file)
    #[arg(long, value_name = "MS", value_parser = clap::value_parser!(u64).range(1..))]
    pub interval_ms: Option<u64>,

    /// Report what would be deleted without deleting anything
    #[arg(long)]
    pub dry_run: bool,
}

impl WatchCli {
    pub async fn run(self, config: WardenConfig) -> Result<()> {
        let interval = self
            .interval_ms
            .map(Duration::from_millis)
            .unwrap_or_else(|| config.poll_interval());
        let options = CycleOptions::default().dry_run(self.dry_run);
        let mut watcher = Watcher::new(SaveDirectory::new(&config.saves), options);

        print_info(&format!(
            "Watching {} every {}ms{}. Press Ctrl+C to stop.",
            config.saves.display(),
            interval.as_millis(),
            if self.dry_run { " (dry run)" } else { "" }
        ));

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                result = &mut ctrl_c => {
                    result.context("Failed to listen for Ctrl+C")?;
                    break;
                }
                _ = ticker.tick() => {
                    watcher.tick().await;
                }
            }
        }

        print_success(&format!(
            "Stopped after {} cycles, {} slots protected",
            watcher.cycles,
            watcher.tracker().len()
        ));
        Ok(())
    }
}

/// State carried from one cycle to the next.
pub struct Watcher<S> {
    store: S,
    options: CycleOptions,
    tracker: ProtectionTracker,
    /// Last listing error, so a missing directory is reported once.
    last_error: Option<String>,
    /// Rejected filenames already printed while they stay on disk.
    reported_rejections: BTreeSet<String>,
    cycles: u64,
}

impl<S: SaveStore> Watcher<S> {
    pub fn new(store: S, options: CycleOptions) -> Self {
        Self {
            store,
            options,
            tracker: ProtectionTracker::new(),
            last_error: None,
            reported_rejections: BTreeSet::new(),
            cycles: 0,
        }
    }

    pub fn tracker(&self) -> &ProtectionTracker {
        &self.tracker
    }

    /// Run one cycle and print what it did.
    ///
    /// On a listing failure the tracker is kept as it was and the error is
    /// printed unless it repeats the previous one. The returned report only
    /// lists rejections not already reported by an earlier tick.
    pub async fn tick(&mut self) -> Option<CycleReport> {
        self.cycles += 1;
        match run_cycle(&self.store, &self.tracker, self.options).await {
            Ok(mut report) => {
                self.drop_reported_rejections(&mut report);
                if self.last_error.take().is_some() {
                    print_success("Save directory is readable again");
                }
                print_report(&report);
                self.tracker = report.tracker.clone();
                debug!(cycle = self.cycles, tracked = self.tracker.len(), "cycle complete");
                Some(report)
            }
            Err(e) => {
                let message = e.to_string();
                if self.last_error.as_deref() != Some(message.as_str()) {
                    warn!(error = %message, "cycle failed, keeping previous protections");
                    print_error(&message);
                    self.last_error = Some(message);
                }
                None
            }
        }
    }

    /// Keep only first sightings in `report.rejected`. Names that left the
    /// directory are forgotten so they are reported again if they return.
    fn drop_reported_rejections(&mut self, report: &mut CycleReport) {
        let current: BTreeSet<String> = report
            .rejected
            .iter()
            .map(|err| err.filename().to_string())
            .collect();
        report
            .rejected
            .retain(|err| !self.reported_rejections.contains(err.filename()));
        for err in &report.rejected {
            warn!(error = %err, "excluding undecodable save file");
        }
        self.reported_rejections = current;
    }
}
