//! Decoded view of the save directory at one poll instant.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::codec::Save;
use crate::error::DecodeError;

/// The set of saves decoded from one directory listing.
///
/// Saves are kept sorted by `(slot_name, generation)`, so every pass over a
/// snapshot visits files in the same order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DirectorySnapshot {
    saves: Vec<Save>,
}

impl DirectorySnapshot {
    /// Build a snapshot from decoded saves.
    pub fn new(saves: impl IntoIterator<Item = Save>) -> Self {
        let mut saves: Vec<Save> = saves.into_iter().collect();
        saves.sort();
        saves.dedup();
        Self { saves }
    }

    pub fn saves(&self) -> &[Save] {
        &self.saves
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Save> {
        self.saves.iter()
    }

    pub fn len(&self) -> usize {
        self.saves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.saves.is_empty()
    }

    /// Whether the exact `(slot_name, generation)` file is present.
    pub fn contains(&self, slot_name: &str, generation: u64) -> bool {
        self.saves
            .iter()
            .any(|s| s.slot_name == slot_name && s.generation == generation)
    }

    /// Whether any generation of `slot_name` is present.
    pub fn has_slot(&self, slot_name: &str) -> bool {
        self.saves.iter().any(|s| s.slot_name == slot_name)
    }

    /// Generations present per slot, ascending.
    pub fn by_slot(&self) -> BTreeMap<&str, Vec<u64>> {
        let mut slots: BTreeMap<&str, Vec<u64>> = BTreeMap::new();
        for save in &self.saves {
            slots
                .entry(save.slot_name.as_str())
                .or_default()
                .push(save.generation);
        }
        slots
    }
}

impl FromIterator<Save> for DirectorySnapshot {
    fn from_iter<I: IntoIterator<Item = Save>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl<'a> IntoIterator for &'a DirectorySnapshot {
    type Item = &'a Save;
    type IntoIter = std::slice::Iter<'a, Save>;

    fn into_iter(self) -> Self::IntoIter {
        self.saves.iter()
    }
}

/// Result of reading the save directory.
#[derive(Debug, Clone, Default)]
pub struct SnapshotRead {
    /// Saves that decoded cleanly.
    pub snapshot: DirectorySnapshot,
    /// Candidate files excluded because their names did not decode.
    pub rejected: Vec<DecodeError>,
}
