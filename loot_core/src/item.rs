use crate::types::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Attack granted by a Strength Elixir
pub const ELIXIR_BOOST: u32 = 10;
/// Owner turns a Strength Elixir lasts
pub const ELIXIR_TURNS: u32 = 3;
const ELIXIR_VALUE: u32 = 50;

/// Whatever a consumable acts upon
///
/// Implemented by combatants so that items never need to know the combatant type.
pub trait ItemTarget {
    /// Restore up to `amount` HP without exceeding the maximum; returns HP actually gained
    fn restore_hp(&mut self, amount: u32) -> u32;
    /// Restore up to `amount` mana without exceeding the maximum; returns mana actually gained
    fn restore_mana(&mut self, amount: u32) -> u32;
    /// Replace any active attack boost with `amount` lasting `turns` owner turns
    fn grant_attack_boost(&mut self, amount: u32, turns: u32);
}

/// An item: identity plus either a consumable or a piece of gear
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub description: String,
    /// Base value in gold
    pub value: u32,
    pub kind: ItemKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemKind {
    Consumable(Consumable),
    Gear(Gear),
}

/// A usable item with a bounded number of uses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consumable {
    pub effect: ConsumableEffect,
    pub uses: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsumableEffect {
    RestoreHealth(PotionSize),
    RestoreMana(PotionSize),
    AttackBoost { amount: u32, turns: u32 },
}

/// Equippable item: one slot and additive stat deltas
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gear {
    pub slot: EquipmentSlot,
    pub stat_boost: BTreeMap<Stat, i32>,
}

/// What a successful use actually did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Applied {
    Healed(u32),
    ManaRestored(u32),
    AttackBoosted { amount: u32, turns: u32 },
}

impl Applied {
    /// Magnitude for reporting: points restored, or attack granted
    pub fn magnitude(&self) -> u32 {
        match self {
            Applied::Healed(n) | Applied::ManaRestored(n) => *n,
            Applied::AttackBoosted { amount, .. } => *amount,
        }
    }
}

impl Item {
    pub fn health_potion(size: PotionSize) -> Self {
        Item {
            name: format!("{} Health Potion", size),
            description: format!("Restores {} HP", size.health()),
            value: size.value(),
            kind: ItemKind::Consumable(Consumable {
                effect: ConsumableEffect::RestoreHealth(size),
                uses: 1,
            }),
        }
    }

    pub fn mana_potion(size: PotionSize) -> Self {
        Item {
            name: format!("{} Mana Potion", size),
            description: format!("Restores {} Mana", size.mana()),
            value: size.value(),
            kind: ItemKind::Consumable(Consumable {
                effect: ConsumableEffect::RestoreMana(size),
                uses: 1,
            }),
        }
    }

    pub fn strength_elixir() -> Self {
        Item {
            name: "Strength Elixir".to_string(),
            description: format!(
                "Increases attack by {} for {} turns",
                ELIXIR_BOOST, ELIXIR_TURNS
            ),
            value: ELIXIR_VALUE,
            kind: ItemKind::Consumable(Consumable {
                effect: ConsumableEffect::AttackBoost {
                    amount: ELIXIR_BOOST,
                    turns: ELIXIR_TURNS,
                },
                uses: 1,
            }),
        }
    }

    pub fn weapon(name: impl Into<String>, value: u32, attack_boost: i32) -> Self {
        Item {
            name: name.into(),
            description: format!("Increases attack by {}", attack_boost),
            value,
            kind: ItemKind::Gear(Gear {
                slot: EquipmentSlot::Weapon,
                stat_boost: BTreeMap::from([(Stat::Attack, attack_boost)]),
            }),
        }
    }

    pub fn armor(name: impl Into<String>, value: u32, defense_boost: i32) -> Self {
        Item {
            name: name.into(),
            description: format!("Increases defense by {}", defense_boost),
            value,
            kind: ItemKind::Gear(Gear {
                slot: EquipmentSlot::Armor,
                stat_boost: BTreeMap::from([(Stat::Defense, defense_boost)]),
            }),
        }
    }

    pub fn accessory(name: impl Into<String>, value: u32, stat_boost: BTreeMap<Stat, i32>) -> Self {
        let description = stat_boost
            .iter()
            .map(|(stat, boost)| format!("+{} {}", boost, stat))
            .collect::<Vec<_>>()
            .join(", ");

        Item {
            name: name.into(),
            description,
            value,
            kind: ItemKind::Gear(Gear {
                slot: EquipmentSlot::Accessory,
                stat_boost,
            }),
        }
    }

    /// Generator/persistence category of this item
    pub fn item_type(&self) -> ItemType {
        match &self.kind {
            ItemKind::Consumable(c) => match c.effect {
                ConsumableEffect::RestoreHealth(_) => ItemType::HealthPotion,
                ConsumableEffect::RestoreMana(_) => ItemType::ManaPotion,
                ConsumableEffect::AttackBoost { .. } => ItemType::StrengthElixir,
            },
            ItemKind::Gear(g) => match g.slot {
                EquipmentSlot::Weapon => ItemType::Weapon,
                EquipmentSlot::Armor => ItemType::Armor,
                EquipmentSlot::Accessory => ItemType::Accessory,
            },
        }
    }

    pub fn is_consumable(&self) -> bool {
        matches!(self.kind, ItemKind::Consumable(_))
    }

    pub fn gear(&self) -> Option<&Gear> {
        match &self.kind {
            ItemKind::Gear(g) => Some(g),
            ItemKind::Consumable(_) => None,
        }
    }

    pub fn slot(&self) -> Option<EquipmentSlot> {
        self.gear().map(|g| g.slot)
    }

    /// Remaining uses; gear has none
    pub fn uses(&self) -> u32 {
        match &self.kind {
            ItemKind::Consumable(c) => c.uses,
            ItemKind::Gear(_) => 0,
        }
    }

    /// A consumable with no uses left
    pub fn is_depleted(&self) -> bool {
        matches!(&self.kind, ItemKind::Consumable(c) if c.uses == 0)
    }

    /// Use this item on `target`
    ///
    /// Returns `None` without side effects for gear and depleted consumables.
    pub fn use_on<T: ItemTarget + ?Sized>(&mut self, target: &mut T) -> Option<Applied> {
        let ItemKind::Consumable(consumable) = &mut self.kind else {
            return None;
        };
        if consumable.uses == 0 {
            return None;
        }
        consumable.uses -= 1;

        let applied = match consumable.effect {
            ConsumableEffect::RestoreHealth(size) => Applied::Healed(target.restore_hp(size.health())),
            ConsumableEffect::RestoreMana(size) => {
                Applied::ManaRestored(target.restore_mana(size.mana()))
            }
            ConsumableEffect::AttackBoost { amount, turns } => {
                target.grant_attack_boost(amount, turns);
                Applied::AttackBoosted { amount, turns }
            }
        };
        Some(applied)
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Dummy {
        hp: u32,
        max_hp: u32,
        mana: u32,
        max_mana: u32,
        boost: Option<(u32, u32)>,
    }

    impl ItemTarget for Dummy {
        fn restore_hp(&mut self, amount: u32) -> u32 {
            let before = self.hp;
            self.hp = (self.hp + amount).min(self.max_hp);
            self.hp - before
        }

        fn restore_mana(&mut self, amount: u32) -> u32 {
            let before = self.mana;
            self.mana = (self.mana + amount).min(self.max_mana);
            self.mana - before
        }

        fn grant_attack_boost(&mut self, amount: u32, turns: u32) {
            self.boost = Some((amount, turns));
        }
    }

    #[test]
    fn test_health_potion_caps_at_max() {
        let mut target = Dummy {
            hp: 90,
            max_hp: 100,
            ..Default::default()
        };
        let mut potion = Item::health_potion(PotionSize::Medium);

        assert_eq!(potion.use_on(&mut target), Some(Applied::Healed(10)));
        assert_eq!(target.hp, 100);
        assert!(potion.is_depleted());
    }

    #[test]
    fn test_depleted_consumable_has_no_effect() {
        let mut target = Dummy {
            mana: 0,
            max_mana: 50,
            ..Default::default()
        };
        let mut potion = Item::mana_potion(PotionSize::Small);

        assert!(potion.use_on(&mut target).is_some());
        target.mana = 0;
        assert_eq!(potion.use_on(&mut target), None);
        assert_eq!(target.mana, 0);
    }

    #[test]
    fn test_elixir_grants_boost() {
        let mut target = Dummy::default();
        let mut elixir = Item::strength_elixir();

        let applied = elixir.use_on(&mut target).unwrap();
        assert_eq!(applied.magnitude(), ELIXIR_BOOST);
        assert_eq!(target.boost, Some((ELIXIR_BOOST, ELIXIR_TURNS)));
    }

    #[test]
    fn test_gear_cannot_be_used() {
        let mut target = Dummy::default();
        let mut sword = Item::weapon("Axe", 20, 4);
        assert_eq!(sword.use_on(&mut target), None);
        assert_eq!(sword.item_type(), ItemType::Weapon);
        assert_eq!(sword.slot(), Some(EquipmentSlot::Weapon));
    }

    #[test]
    fn test_accessory_description_lists_boosts() {
        let ring = Item::accessory(
            "Ring",
            40,
            BTreeMap::from([(Stat::Attack, 3), (Stat::MaxHp, 12)]),
        );
        assert_eq!(ring.description, "+3 Attack, +12 Max HP");
        assert_eq!(ring.item_type(), ItemType::Accessory);
    }
}
