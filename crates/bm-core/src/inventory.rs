//! Items and the inventory multiset.

use serde::{Deserialize, Serialize};
use strum::Display;

/// The collectible capability tokens.
///
/// Two sentinels ride along: `Ransomware` occupies a room the way an item
/// does but can never be collected, and `None` marks an empty slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum ItemType {
    #[strum(serialize = "Full memory read access")]
    FullMemoryReadAccess,
    #[strum(serialize = "Full memory write access")]
    FullMemoryWriteAccess,
    #[strum(serialize = "Pointer dereferencer")]
    PointerDereferencer,
    #[strum(serialize = "OS override capability")]
    OsOverrideCapability,
    #[strum(serialize = "RANSOMWARE code fragment")]
    RansomwareCodeFragment,
    #[strum(serialize = "Vulnerability")]
    Vulnerability,
    #[strum(serialize = "Sandboxer")]
    Sandboxer,
    /// The RANSOMWARE itself, stored on the map as an item since the room it
    /// occupies will not hold one anyways.
    #[strum(serialize = "The RANSOMWARE")]
    Ransomware,
    /// Empty slot.
    #[strum(serialize = "None")]
    None,
}

impl ItemType {
    /// True for tokens the player can pick up and carry.
    pub fn is_collectible(self) -> bool {
        !matches!(self, ItemType::Ransomware | ItemType::None)
    }
}

/// A multiset of items with per-type counts.
///
/// Iteration follows the order in which each type was first added. Absence is
/// always a normal, checked outcome; nothing here panics on missing keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    entries: Vec<(ItemType, u32)>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `count` units of an item. Adding the `None` sentinel or a zero
    /// count changes nothing.
    pub fn add_item(&mut self, item: ItemType, count: u32) {
        if item == ItemType::None || count == 0 {
            return;
        }
        match self.entries.iter_mut().find(|(kind, _)| *kind == item) {
            Some((_, existing)) => *existing += count,
            None => self.entries.push((item, count)),
        }
    }

    /// Attempts to remove `count` units of an item. If the item is absent or
    /// stored in insufficient quantity, nothing changes and this returns
    /// false.
    pub fn try_remove_item(&mut self, item: ItemType, count: u32) -> bool {
        let Some(position) = self.entries.iter().position(|(kind, _)| *kind == item) else {
            return false;
        };
        let stored = self.entries[position].1;
        if stored < count {
            return false;
        }
        if stored == count {
            self.entries.remove(position);
        } else {
            self.entries[position].1 = stored - count;
        }
        true
    }

    /// Checks whether an item is present, regardless of count.
    pub fn contains(&self, item: ItemType) -> bool {
        self.entries.iter().any(|(kind, _)| *kind == item)
    }

    /// Returns the stored count for an item, 0 if absent.
    pub fn count_item(&self, item: ItemType) -> u32 {
        self.entries
            .iter()
            .find(|(kind, _)| *kind == item)
            .map_or(0, |(_, count)| *count)
    }

    /// Returns the total number of units across all item types.
    pub fn count_items(&self) -> u32 {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(item, count)` pairs in first-addition order.
    pub fn iter(&self) -> impl Iterator<Item = (ItemType, u32)> + '_ {
        self.entries.iter().copied()
    }

    /// Flattens the multiset into one list with duplicates materialized.
    pub fn to_item_list(&self) -> Vec<ItemType> {
        let mut items = Vec::with_capacity(self.count_items() as usize);
        for (item, count) in self.iter() {
            for _ in 0..count {
                items.push(item);
            }
        }
        items
    }
}
