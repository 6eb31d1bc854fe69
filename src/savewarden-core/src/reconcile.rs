//! Reconciliation: decide which generation of each slot survives.
//!
//! [`reconcile`] is pure. It reads the previous [`ProtectionTracker`] and one
//! [`DirectorySnapshot`], and returns the next tracker together with the
//! deletions to perform and the notifications to show. Applying the
//! deletions is the caller's job (see [`crate::run_cycle`]).
//!
//! # Passes
//!
//! 1. Release protections whose file is missing while siblings remain.
//! 2. Enforce existing protections: every other generation of a tracked
//!    slot is deleted.
//! 3. Choose survivors for untracked slots: the highest generation seen in
//!    this snapshot.
//! 4. Delete the superseded newcomers, in a second pass over the snapshot.
//! 5. Commit the new protections.
//! 6. Forget slots that have no file left in the snapshot.
//!
//! Every decision is taken against the snapshot, never against the
//! filesystem after deletions, since deletions are only requests here.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

use crate::codec::Save;
use crate::snapshot::DirectorySnapshot;
use crate::tracker::ProtectionTracker;

/// Why a file is scheduled for deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeletionReason {
    /// The slot is already tracked and this is not the protected generation.
    Unprotected { protected: u64 },
    /// The slot was adopted this cycle and a higher generation won.
    Superseded { survivor: u64 },
}

/// A file the reconciliation wants removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletionRequest {
    pub save: Save,
    pub reason: DeletionReason,
}

impl DeletionRequest {
    fn unprotected(save: &Save, protected: u64) -> Self {
        Self {
            save: save.clone(),
            reason: DeletionReason::Unprotected { protected },
        }
    }

    fn superseded(save: &Save, survivor: u64) -> Self {
        Self {
            save: save.clone(),
            reason: DeletionReason::Superseded { survivor },
        }
    }
}

/// Human-facing protection events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    /// A slot seen for the first time is now protected.
    ProtectionStarted { slot_name: String, generation: u64 },
    /// A tracked slot lost its protected file but other generations remain;
    /// the highest of those is protected instead.
    ProtectionSuperseded {
        slot_name: String,
        previous: u64,
        generation: u64,
    },
    /// No file of the slot remains.
    ProtectionStopped { slot_name: String },
}

impl Notification {
    pub fn slot_name(&self) -> &str {
        match self {
            Notification::ProtectionStarted { slot_name, .. }
            | Notification::ProtectionSuperseded { slot_name, .. }
            | Notification::ProtectionStopped { slot_name } => slot_name,
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notification::ProtectionStarted {
                slot_name,
                generation,
            } => write!(f, "Protecting {slot_name} at generation {generation}"),
            Notification::ProtectionSuperseded {
                slot_name,
                previous,
                generation,
            } => write!(
                f,
                "Protecting {slot_name} at generation {generation} (generation {previous} disappeared)"
            ),
            Notification::ProtectionStopped { slot_name } => {
                write!(f, "No longer protecting {slot_name}")
            }
        }
    }
}

/// Output of one [`reconcile`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// Tracker to hand to the next call.
    pub tracker: ProtectionTracker,
    /// Enforcement deletions first, then superseded newcomers.
    pub deletions: Vec<DeletionRequest>,
    /// Ordered by slot name.
    pub notifications: Vec<Notification>,
}

impl Reconciliation {
    /// Nothing to delete and nothing to report.
    pub fn is_quiet(&self) -> bool {
        self.deletions.is_empty() && self.notifications.is_empty()
    }
}

/// Run one reconciliation cycle against `snapshot`.
pub fn reconcile(tracker: &ProtectionTracker, snapshot: &DirectorySnapshot) -> Reconciliation {
    let mut tracker = tracker.clone();
    let released = release_orphaned(&mut tracker, snapshot);

    let mut deletions = enforce_protection(&tracker, snapshot);
    let survivors = choose_survivors(&tracker, snapshot);
    deletions.extend(delete_superseded(&survivors, snapshot));

    let mut events: BTreeMap<String, Notification> = BTreeMap::new();
    for (slot_name, generation) in &survivors {
        tracker.protect(slot_name.clone(), *generation);
        let event = match released.get(slot_name) {
            Some(&previous) => Notification::ProtectionSuperseded {
                slot_name: slot_name.clone(),
                previous,
                generation: *generation,
            },
            None => Notification::ProtectionStarted {
                slot_name: slot_name.clone(),
                generation: *generation,
            },
        };
        events.insert(slot_name.clone(), event);
    }

    for slot_name in forget_vanished(&mut tracker, snapshot) {
        events.insert(slot_name.clone(), Notification::ProtectionStopped { slot_name });
    }

    debug!(
        tracked = tracker.len(),
        deletions = deletions.len(),
        notifications = events.len(),
        "reconciled snapshot"
    );

    Reconciliation {
        tracker,
        deletions,
        notifications: events.into_values().collect(),
    }
}

/// Drop every protection whose file is gone while other generations of the
/// same slot remain, so the slot is adopted again from what is on disk.
///
/// Slots with no file at all are left for [`forget_vanished`]. Returns the
/// released slots with the generation they protected.
fn release_orphaned(
    tracker: &mut ProtectionTracker,
    snapshot: &DirectorySnapshot,
) -> BTreeMap<String, u64> {
    let orphaned: Vec<(String, u64)> = tracker
        .iter()
        .filter(|(slot_name, generation)| {
            !snapshot.contains(slot_name, *generation) && snapshot.has_slot(slot_name)
        })
        .map(|(slot_name, generation)| (slot_name.to_string(), generation))
        .collect();

    for (slot_name, _) in &orphaned {
        tracker.release(slot_name);
    }
    orphaned.into_iter().collect()
}

/// Delete every generation of a tracked slot other than the protected one.
fn enforce_protection(
    tracker: &ProtectionTracker,
    snapshot: &DirectorySnapshot,
) -> Vec<DeletionRequest> {
    snapshot
        .iter()
        .filter_map(|save| {
            let protected = tracker.get(&save.slot_name)?;
            (save.generation != protected).then(|| DeletionRequest::unprotected(save, protected))
        })
        .collect()
}

/// Highest generation per untracked slot.
fn choose_survivors(
    tracker: &ProtectionTracker,
    snapshot: &DirectorySnapshot,
) -> BTreeMap<String, u64> {
    let mut survivors: BTreeMap<String, u64> = BTreeMap::new();
    for save in snapshot
        .iter()
        .filter(|save| !tracker.contains(&save.slot_name))
    {
        survivors
            .entry(save.slot_name.clone())
            .and_modify(|best| *best = (*best).max(save.generation))
            .or_insert(save.generation);
    }
    survivors
}

/// Delete every newcomer that lost to its slot's survivor.
fn delete_superseded(
    survivors: &BTreeMap<String, u64>,
    snapshot: &DirectorySnapshot,
) -> Vec<DeletionRequest> {
    snapshot
        .iter()
        .filter_map(|save| {
            let survivor = *survivors.get(&save.slot_name)?;
            (save.generation != survivor).then(|| DeletionRequest::superseded(save, survivor))
        })
        .collect()
}

/// Remove tracked slots with no file in the snapshot.
fn forget_vanished(tracker: &mut ProtectionTracker, snapshot: &DirectorySnapshot) -> Vec<String> {
    let vanished: Vec<String> = tracker
        .slot_names()
        .filter(|slot_name| !snapshot.has_slot(slot_name))
        .map(str::to_string)
        .collect();

    for slot_name in &vanished {
        tracker.release(slot_name);
    }
    vanished
}
