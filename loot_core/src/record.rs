//! Flat persistence shape for items
//!
//! Each record carries a `type` tag plus the numeric fields that type needs.

use crate::item::{ConsumableEffect, Item, ItemKind};
use crate::types::{EquipmentSlot, PotionSize, Stat};
use crate::RecordError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub name: String,
    pub description: String,
    pub value: u32,
    #[serde(flatten)]
    pub details: ItemDetails,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ItemDetails {
    Weapon { attack_boost: i32 },
    Armor { defense_boost: i32 },
    Accessory { stat_boosts: BTreeMap<String, i32> },
    HealthPotion { size: PotionSize },
    ManaPotion { size: PotionSize },
    StrengthElixir,
}

impl From<&Item> for ItemRecord {
    fn from(item: &Item) -> Self {
        let details = match &item.kind {
            ItemKind::Consumable(c) => match c.effect {
                ConsumableEffect::RestoreHealth(size) => ItemDetails::HealthPotion { size },
                ConsumableEffect::RestoreMana(size) => ItemDetails::ManaPotion { size },
                ConsumableEffect::AttackBoost { .. } => ItemDetails::StrengthElixir,
            },
            ItemKind::Gear(gear) => {
                let boost = |stat: Stat| gear.stat_boost.get(&stat).copied().unwrap_or(0);
                match gear.slot {
                    EquipmentSlot::Weapon => ItemDetails::Weapon {
                        attack_boost: boost(Stat::Attack),
                    },
                    EquipmentSlot::Armor => ItemDetails::Armor {
                        defense_boost: boost(Stat::Defense),
                    },
                    EquipmentSlot::Accessory => ItemDetails::Accessory {
                        stat_boosts: gear
                            .stat_boost
                            .iter()
                            .map(|(stat, v)| (stat.key().to_string(), *v))
                            .collect(),
                    },
                }
            }
        };

        ItemRecord {
            name: item.name.clone(),
            description: item.description.clone(),
            value: item.value,
            details,
        }
    }
}

impl TryFrom<ItemRecord> for Item {
    type Error = RecordError;

    fn try_from(record: ItemRecord) -> Result<Self, Self::Error> {
        let mut item = match record.details {
            ItemDetails::Weapon { attack_boost } => Item::weapon(record.name, record.value, attack_boost),
            ItemDetails::Armor { defense_boost } => Item::armor(record.name, record.value, defense_boost),
            ItemDetails::Accessory { stat_boosts } => {
                let stat_boost = stat_boosts
                    .into_iter()
                    .map(|(key, v)| {
                        key.parse::<Stat>()
                            .map(|stat| (stat, v))
                            .map_err(|_| RecordError::UnknownStat(key))
                    })
                    .collect::<Result<BTreeMap<_, _>, _>>()?;
                Item::accessory(record.name, record.value, stat_boost)
            }
            ItemDetails::HealthPotion { size } => Item::health_potion(size),
            ItemDetails::ManaPotion { size } => Item::mana_potion(size),
            ItemDetails::StrengthElixir => Item::strength_elixir(),
        };

        // Stored text wins over the regenerated default
        item.description = record.description;
        Ok(item)
    }
}
