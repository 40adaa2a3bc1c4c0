//! Character records - the flat shape a save layer round-trips
//!
//! Stored attack, defense and max stats already include equipped gear, so loading puts gear
//! back in its slots without applying the boosts a second time.

mod repository;

pub use repository::{CharacterRepository, JsonDirRepository, MemoryRepository, RepositoryError};

use crate::combatant::Combatant;
use crate::progression::Progression;
use crate::stats::Stats;
use crate::types::Variant;
use crate::ItemError;
use loot_core::inventory::PLAYER_CAPACITY;
use loot_core::{EquipmentSlot, Inventory, Item, ItemRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Error rebuilding a combatant from a record
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Unknown character class '{0}'")]
    UnknownClass(String),
    #[error("Unknown equipment slot '{0}'")]
    UnknownSlot(String),
    #[error("'{item}' does not belong in the {slot} slot")]
    WrongSlot { item: String, slot: String },
    #[error("{count} items do not fit in an inventory of {capacity}")]
    TooManyItems { count: usize, capacity: usize },
    #[error(transparent)]
    Item(#[from] loot_core::RecordError),
    #[error(transparent)]
    Equip(#[from] ItemError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterRecord {
    pub name: String,
    pub character_class: String,
    pub class_tier: u8,
    pub class_title: String,
    pub level: u32,
    pub xp: u32,
    pub xp_to_level: u32,
    pub hp: u32,
    pub max_hp: u32,
    pub mana: u32,
    pub max_mana: u32,
    pub attack: u32,
    pub defense: u32,
    pub gold: u32,
    pub luck: i32,
    #[serde(default)]
    pub inventory_items: Vec<ItemRecord>,
    /// Keyed by slot name
    #[serde(default)]
    pub equipment: BTreeMap<String, ItemRecord>,
    #[serde(default)]
    pub skills: Vec<String>,
}

impl Combatant {
    pub fn to_record(&self) -> CharacterRecord {
        CharacterRecord {
            name: self.name.clone(),
            character_class: self.variant.key().to_string(),
            class_tier: self.progression.class_tier,
            class_title: self.progression.class_title.clone(),
            level: self.progression.level,
            xp: self.progression.xp,
            xp_to_level: self.progression.xp_to_level,
            hp: self.stats.hp(),
            max_hp: self.stats.max_hp(),
            mana: self.stats.mana(),
            max_mana: self.stats.max_mana(),
            attack: self.stats.attack(),
            defense: self.stats.defense(),
            gold: self.inventory.gold,
            luck: self.luck,
            inventory_items: self.inventory.items().iter().map(ItemRecord::from).collect(),
            equipment: self
                .equipment()
                .iter()
                .map(|(slot, item)| (slot.key().to_string(), ItemRecord::from(item)))
                .collect(),
            skills: self.progression.skills.clone(),
        }
    }

    /// Rebuild a combatant; stored stats are taken as-is
    pub fn from_record(record: CharacterRecord) -> Result<Self, RecordError> {
        let variant: Variant = record
            .character_class
            .parse()
            .map_err(|_| RecordError::UnknownClass(record.character_class.clone()))?;

        let stats = Stats::from_parts(
            record.hp,
            record.max_hp,
            record.mana,
            record.max_mana,
            record.attack,
            record.defense,
        );
        let mut combatant = Combatant::new(record.name, variant, stats);

        combatant.progression = Progression {
            level: record.level.max(1),
            xp: record.xp,
            xp_to_level: record.xp_to_level.max(1),
            class_tier: record.class_tier,
            class_title: record.class_title,
            skills: record.skills,
        };
        combatant.luck = record.luck;

        let count = record.inventory_items.len();
        if count > PLAYER_CAPACITY {
            return Err(RecordError::TooManyItems {
                count,
                capacity: PLAYER_CAPACITY,
            });
        }
        let mut inventory = Inventory::new(PLAYER_CAPACITY);
        for item_record in record.inventory_items {
            inventory.add(Item::try_from(item_record)?).map_err(ItemError::from)?;
        }
        inventory.gold = record.gold;
        combatant.inventory = inventory;

        for (key, item_record) in record.equipment {
            let slot: EquipmentSlot = key
                .parse()
                .map_err(|_| RecordError::UnknownSlot(key.clone()))?;
            let item = Item::try_from(item_record)?;
            if item.slot() != Some(slot) {
                return Err(RecordError::WrongSlot {
                    item: item.name,
                    slot: key,
                });
            }
            combatant.restore_equipment(item)?;
        }

        Ok(combatant)
    }
}
