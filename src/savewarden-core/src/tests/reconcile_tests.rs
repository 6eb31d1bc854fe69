//! Behavioural tests for the reconciliation algorithm.

use pretty_assertions::assert_eq;

use crate::codec::{Save, decode};
use crate::reconcile::*;
use crate::snapshot::DirectorySnapshot;
use crate::tracker::ProtectionTracker;

fn snapshot(saves: &[(&str, u64)]) -> DirectorySnapshot {
    saves
        .iter()
        .map(|(slot, generation)| Save::new(*slot, *generation))
        .collect()
}

fn tracker(slots: &[(&str, u64)]) -> ProtectionTracker {
    slots.iter().copied().collect()
}

fn deleted(result: &Reconciliation) -> Vec<Save> {
    result.deletions.iter().map(|r| r.save.clone()).collect()
}

fn started(slot_name: &str, generation: u64) -> Notification {
    Notification::ProtectionStarted {
        slot_name: slot_name.to_string(),
        generation,
    }
}

fn stopped(slot_name: &str) -> Notification {
    Notification::ProtectionStopped {
        slot_name: slot_name.to_string(),
    }
}

/// Every tracked slot must match exactly one save in the snapshot.
fn assert_tracker_matches_snapshot(result: &Reconciliation, snapshot: &DirectorySnapshot) {
    for (slot_name, generation) in result.tracker.iter() {
        let matches = snapshot
            .iter()
            .filter(|s| s.slot_name == slot_name && s.generation == generation)
            .count();
        assert_eq!(matches, 1, "tracked {slot_name}@{generation} not in snapshot");
    }
}

/// At most one generation per slot is left once deletions are applied.
fn assert_one_survivor_per_slot(result: &Reconciliation, snapshot: &DirectorySnapshot) {
    let survivors = apply(result, snapshot);
    for (slot_name, generations) in survivors.by_slot() {
        assert_eq!(generations.len(), 1, "{slot_name} kept {generations:?}");
    }
}

// ============================================================================
// SCENARIOS
// ============================================================================

#[test]
fn test_single_new_file_is_protected() {
    let snap = snapshot(&[("hero", 0)]);
    let result = reconcile(&ProtectionTracker::new(), &snap);

    assert_eq!(result.tracker, tracker(&[("hero", 0)]));
    assert!(result.deletions.is_empty());
    assert_eq!(result.notifications, vec![started("hero", 0)]);
    assert_eq!(result.notifications[0].to_string(), "Protecting hero at generation 0");
}

#[test]
fn test_new_slot_with_many_generations_keeps_the_highest() {
    let snap = snapshot(&[("hero", 0), ("hero", 3), ("hero", 1)]);
    let result = reconcile(&ProtectionTracker::new(), &snap);

    assert_eq!(result.tracker, tracker(&[("hero", 3)]));
    assert_eq!(deleted(&result), vec![Save::new("hero", 0), Save::new("hero", 1)]);
    assert!(
        result
            .deletions
            .iter()
            .all(|r| r.reason == DeletionReason::Superseded { survivor: 3 })
    );
    assert_eq!(result.notifications, vec![started("hero", 3)]);
}

#[test]
fn test_tracked_slot_enforces_protection() {
    let before = tracker(&[("hero", 3)]);
    let snap = snapshot(&[("hero", 3), ("hero", 5)]);
    let result = reconcile(&before, &snap);

    assert_eq!(result.tracker, before);
    assert_eq!(deleted(&result), vec![Save::new("hero", 5)]);
    assert_eq!(
        result.deletions[0].reason,
        DeletionReason::Unprotected { protected: 3 }
    );
    assert!(result.notifications.is_empty());
}

#[test]
fn test_vanished_slot_is_forgotten() {
    let result = reconcile(&tracker(&[("hero", 3)]), &DirectorySnapshot::default());

    assert!(result.tracker.is_empty());
    assert!(result.deletions.is_empty());
    assert_eq!(result.notifications, vec![stopped("hero")]);
    assert_eq!(result.notifications[0].to_string(), "No longer protecting hero");
}

#[test]
fn test_malformed_names_never_reach_reconciliation() {
    let names = [
        "weird~~12.tunic",
        "hero.tunic",
        "hero~000000000002.tunic",
        "villain.tunic",
    ];
    let (ok, rejected): (Vec<_>, Vec<_>) = names.iter().map(|n| decode(n)).partition(|r| r.is_ok());
    assert_eq!(rejected.len(), 1);

    let snap: DirectorySnapshot = ok.into_iter().map(|r| r.unwrap()).collect();
    let result = reconcile(&ProtectionTracker::new(), &snap);

    assert_eq!(result.tracker, tracker(&[("hero", 2), ("villain", 0)]));
    assert_eq!(deleted(&result), vec![Save::new("hero", 0)]);
    assert!(result.deletions.iter().all(|r| !r.save.slot_name.starts_with("weird")));
}

// ============================================================================
// EDGE CASES
// ============================================================================

#[test]
fn test_empty_everything_is_a_no_op() {
    let result = reconcile(&ProtectionTracker::new(), &DirectorySnapshot::default());
    assert!(result.is_quiet());
    assert!(result.tracker.is_empty());
}

#[test]
fn test_tracked_slot_with_only_its_file_is_a_no_op() {
    let before = tracker(&[("hero", 7)]);
    let result = reconcile(&before, &snapshot(&[("hero", 7)]));
    assert!(result.is_quiet());
    assert_eq!(result.tracker, before);
}

#[test]
fn test_reappearing_slot_is_adopted_as_new() {
    let first = reconcile(&tracker(&[("hero", 3)]), &DirectorySnapshot::default());
    assert!(first.tracker.is_empty());

    // A lower generation than before is fine once the slot was forgotten.
    let second = reconcile(&first.tracker, &snapshot(&[("hero", 1)]));
    assert_eq!(second.tracker, tracker(&[("hero", 1)]));
    assert!(second.deletions.is_empty());
    assert_eq!(second.notifications, vec![started("hero", 1)]);
}

#[test]
fn test_missing_protected_file_with_siblings_is_superseded() {
    let result = reconcile(&tracker(&[("hero", 3)]), &snapshot(&[("hero", 4), ("hero", 6)]));

    assert_eq!(result.tracker, tracker(&[("hero", 6)]));
    assert_eq!(deleted(&result), vec![Save::new("hero", 4)]);
    assert_eq!(
        result.notifications,
        vec![Notification::ProtectionSuperseded {
            slot_name: "hero".to_string(),
            previous: 3,
            generation: 6,
        }]
    );
}

#[test]
fn test_slots_are_independent() {
    let before = tracker(&[("alpha", 1), ("gone", 4)]);
    let snap = snapshot(&[
        ("alpha", 1),
        ("alpha", 2),
        ("beta", 0),
        ("beta", 9),
        ("gamma", 5),
    ]);
    let result = reconcile(&before, &snap);

    assert_eq!(
        result.tracker,
        tracker(&[("alpha", 1), ("beta", 9), ("gamma", 5)])
    );
    // Enforcement deletions come before superseded newcomers.
    assert_eq!(deleted(&result), vec![Save::new("alpha", 2), Save::new("beta", 0)]);
    assert_eq!(
        result.notifications,
        vec![started("beta", 9), started("gamma", 5), stopped("gone")]
    );
    assert_tracker_matches_snapshot(&result, &snap);
    assert_one_survivor_per_slot(&result, &snap);
}

#[test]
fn test_input_tracker_is_not_mutated() {
    let before = tracker(&[("hero", 3)]);
    let _ = reconcile(&before, &DirectorySnapshot::default());
    assert_eq!(before.get("hero"), Some(3));
}

// ============================================================================
// PROPERTIES
// ============================================================================

/// Drop the requested deletions from a snapshot, as a completed cycle would.
fn apply(result: &Reconciliation, snap: &DirectorySnapshot) -> DirectorySnapshot {
    snap.iter()
        .filter(|s| !result.deletions.iter().any(|r| &r.save == *s))
        .cloned()
        .collect()
}

#[test]
fn test_second_pass_after_settling_is_quiet_for_any_start_tracker() {
    let snapshots = [
        snapshot(&[("hero", 0)]),
        snapshot(&[("hero", 0), ("hero", 3), ("hero", 1)]),
        snapshot(&[("a", 1), ("a", 2), ("b", 0), ("c", 12), ("c", 11)]),
    ];
    let trackers = [
        ProtectionTracker::new(),
        tracker(&[("hero", 1)]),
        tracker(&[("a", 1), ("z", 3)]),
    ];

    for snap in &snapshots {
        for start in &trackers {
            let first = reconcile(start, snap);
            let settled = apply(&first, snap);
            let second = reconcile(&first.tracker, &settled);
            assert!(
                second.is_quiet(),
                "second pass not quiet: {:?} / {:?}",
                second.deletions,
                second.notifications
            );
            assert_eq!(second.tracker, first.tracker);
        }
    }
}

#[test]
fn test_second_pass_after_deletions_applied_is_quiet() {
    let snap = snapshot(&[("a", 1), ("a", 2), ("b", 0), ("c", 12), ("c", 11)]);
    let first = reconcile(&tracker(&[("a", 1)]), &snap);

    let after = apply(&first, &snap);
    let second = reconcile(&first.tracker, &after);

    assert!(second.is_quiet());
    let third = reconcile(&second.tracker, &after);
    assert!(third.is_quiet());
}

#[test]
fn test_invariants_hold_across_a_sequence_of_polls() {
    let polls = [
        snapshot(&[("hero", 0)]),
        snapshot(&[("hero", 0), ("hero", 1), ("villain", 2), ("villain", 5)]),
        snapshot(&[("hero", 0), ("villain", 5), ("villain", 6)]),
        snapshot(&[("villain", 5)]),
        snapshot(&[("hero", 4), ("hero", 8), ("villain", 5)]),
        snapshot(&[]),
    ];

    let mut state = ProtectionTracker::new();
    for snap in &polls {
        let result = reconcile(&state, snap);
        assert_tracker_matches_snapshot(&result, snap);
        assert_one_survivor_per_slot(&result, snap);
        for slot_name in snap.by_slot().keys() {
            assert!(result.tracker.contains(slot_name));
        }
        state = result.tracker;
    }
    assert!(state.is_empty());
}

#[test]
fn test_restart_on_converged_directory_deletes_nothing() {
    let converged = snapshot(&[("hero", 8), ("villain", 0), ("zed", 12)]);
    let mut running = ProtectionTracker::new();
    for _ in 0..3 {
        running = reconcile(&running, &converged).tracker;
    }

    // A fresh process starts with an empty tracker.
    let restarted = reconcile(&ProtectionTracker::new(), &converged);
    assert!(restarted.deletions.is_empty());
    assert_eq!(restarted.tracker, running);
    assert_eq!(restarted.notifications.len(), 3);
}
