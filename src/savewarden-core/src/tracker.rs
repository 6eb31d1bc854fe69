//! Protection tracker: which generation of each slot is being kept.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::btree_map;

/// Maps every known slot name to its protected generation.
///
/// Lives for the whole process and is threaded through each
/// [`crate::reconcile`] call by the driver. Slots iterate in name order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProtectionTracker {
    slots: BTreeMap<String, u64>,
}

impl ProtectionTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Protected generation for `slot_name`, if tracked.
    pub fn get(&self, slot_name: &str) -> Option<u64> {
        self.slots.get(slot_name).copied()
    }

    /// Whether `slot_name` is tracked.
    pub fn contains(&self, slot_name: &str) -> bool {
        self.slots.contains_key(slot_name)
    }

    /// Protect `generation` for `slot_name`, returning the previously
    /// protected generation.
    pub fn protect(&mut self, slot_name: impl Into<String>, generation: u64) -> Option<u64> {
        self.slots.insert(slot_name.into(), generation)
    }

    /// Stop tracking `slot_name`, returning the generation it protected.
    pub fn release(&mut self, slot_name: &str) -> Option<u64> {
        self.slots.remove(slot_name)
    }

    /// Number of tracked slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterate `(slot_name, generation)` pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.slots.iter().map(|(name, generation)| (name.as_str(), *generation))
    }

    /// Tracked slot names in order.
    pub fn slot_names(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }
}

impl<'a> FromIterator<(&'a str, u64)> for ProtectionTracker {
    fn from_iter<I: IntoIterator<Item = (&'a str, u64)>>(iter: I) -> Self {
        Self {
            slots: iter
                .into_iter()
                .map(|(name, generation)| (name.to_string(), generation))
                .collect(),
        }
    }
}

impl IntoIterator for ProtectionTracker {
    type Item = (String, u64);
    type IntoIter = btree_map::IntoIter<String, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.into_iter()
    }
}
