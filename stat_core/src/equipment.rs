//! Equipped gear, one item per slot
//!
//! `equip` and `unequip` are the only operations that touch the owner's stats on behalf of
//! gear. Boosts are applied on equip and reversed exactly on unequip.

use crate::stats::Stats;
use crate::ItemError;
use loot_core::{EquipmentSlot, Item};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    slots: BTreeMap<EquipmentSlot, Item>,
}

impl Equipment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: EquipmentSlot) -> Option<&Item> {
        self.slots.get(&slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EquipmentSlot, &Item)> {
        self.slots.iter().map(|(slot, item)| (*slot, item))
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Equip `item`, returning whatever it displaced
    ///
    /// The displaced item's boosts are removed before the new ones are added.
    pub fn equip(&mut self, item: Item, stats: &mut Stats) -> Result<Option<Item>, ItemError> {
        let slot = item.slot().ok_or_else(|| ItemError::NotGear(item.name.clone()))?;

        let previous = self.unequip(slot, stats);
        apply_boosts(&item, stats, 1);
        debug!(item = %item.name, ?slot, "Equipped");
        self.slots.insert(slot, item);

        Ok(previous)
    }

    /// Remove the item in `slot` and reverse its boosts
    pub fn unequip(&mut self, slot: EquipmentSlot, stats: &mut Stats) -> Option<Item> {
        let item = self.slots.remove(&slot)?;
        apply_boosts(&item, stats, -1);
        debug!(item = %item.name, ?slot, "Unequipped");
        Some(item)
    }

    /// Place an item without touching stats
    ///
    /// For loading saved characters whose stored stats already include their gear.
    pub fn restore(&mut self, item: Item) -> Result<Option<Item>, ItemError> {
        let slot = item.slot().ok_or_else(|| ItemError::NotGear(item.name.clone()))?;
        Ok(self.slots.insert(slot, item))
    }
}

fn apply_boosts(item: &Item, stats: &mut Stats, sign: i32) {
    if let Some(gear) = item.gear() {
        for (stat, boost) in &gear.stat_boost {
            stats.apply(*stat, sign * boost);
        }
    }
}
