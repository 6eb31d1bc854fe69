//! One polling cycle: read the directory, reconcile, apply deletions.

use serde::{Serialize, Serializer};
use tracing::{debug, info, warn};

use crate::codec::Save;
use crate::error::{DecodeError, DeletionError, Result};
use crate::reconcile::{DeletionRequest, Notification, Reconciliation, reconcile};
use crate::snapshot::SnapshotRead;
use crate::store::{DeletionOutcome, SaveStore};
use crate::tracker::ProtectionTracker;

/// Options for [`run_cycle`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleOptions {
    /// Plan deletions without touching any file.
    pub dry_run: bool,
}

impl CycleOptions {
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// A deletion that failed; the rest of the cycle went on without it.
#[derive(Debug, Serialize)]
pub struct DeletionFailure {
    pub save: Save,
    #[serde(serialize_with = "serialize_display")]
    pub error: DeletionError,
}

/// Everything that happened during one cycle.
#[derive(Debug, Default, Serialize)]
pub struct CycleReport {
    /// Tracker to keep for the next cycle.
    pub tracker: ProtectionTracker,
    /// Number of decodable saves in the directory.
    pub snapshot_len: usize,
    pub notifications: Vec<Notification>,
    pub deleted: Vec<Save>,
    /// Requested deletions whose file had already disappeared.
    pub already_gone: Vec<Save>,
    /// Deletions that would have run (dry run only).
    pub planned: Vec<DeletionRequest>,
    pub failures: Vec<DeletionFailure>,
    /// Save-named files excluded from this cycle.
    pub rejected: Vec<DecodeError>,
    pub dry_run: bool,
}

impl CycleReport {
    /// Nothing happened that a human needs to hear about.
    pub fn is_quiet(&self) -> bool {
        self.notifications.is_empty()
            && self.deleted.is_empty()
            && self.already_gone.is_empty()
            && self.planned.is_empty()
            && self.failures.is_empty()
            && self.rejected.is_empty()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// One plain-text line per event, in the order they were produced.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        lines.extend(self.rejected.iter().map(|err| format!("Skipping {err}")));
        lines.extend(self.planned.iter().map(|r| format!("Would delete {}", r.save)));
        lines.extend(self.deleted.iter().map(|save| format!("Deleted {save}")));
        lines.extend(
            self.already_gone
                .iter()
                .map(|save| format!("Already gone: {save}")),
        );
        lines.extend(
            self.failures
                .iter()
                .map(|f| format!("Failed to delete {}: {}", f.save, f.error)),
        );
        lines.extend(self.notifications.iter().map(ToString::to_string));
        lines
    }
}

/// Run one reconciliation cycle against `store`.
///
/// Fails only when the directory cannot be listed; the caller should then
/// keep its previous tracker. A failed deletion is recorded in the report
/// and does not stop the remaining deletions.
pub async fn run_cycle<S: SaveStore + ?Sized>(
    store: &S,
    tracker: &ProtectionTracker,
    options: CycleOptions,
) -> Result<CycleReport> {
    let SnapshotRead { snapshot, rejected } = store.snapshot().await?;
    for err in &rejected {
        debug!(error = %err, "excluding undecodable save file");
    }

    let Reconciliation {
        tracker,
        deletions,
        notifications,
    } = reconcile(tracker, &snapshot);

    for notification in &notifications {
        info!(slot = notification.slot_name(), "{notification}");
    }

    let mut report = CycleReport {
        tracker,
        snapshot_len: snapshot.len(),
        notifications,
        rejected,
        dry_run: options.dry_run,
        ..Default::default()
    };

    if options.dry_run {
        report.planned = deletions;
        return Ok(report);
    }

    for DeletionRequest { save, reason } in deletions {
        match store.remove(&save).await {
            Ok(DeletionOutcome::Removed) => {
                info!(file = %save, ?reason, "deleted save file");
                report.deleted.push(save);
            }
            Ok(DeletionOutcome::AlreadyGone) => report.already_gone.push(save),
            Err(error) => {
                warn!(file = %save, %error, "failed to delete save file");
                report.failures.push(DeletionFailure { save, error });
            }
        }
    }

    Ok(report)
}

fn serialize_display<T: std::fmt::Display, S: Serializer>(
    value: &T,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}
