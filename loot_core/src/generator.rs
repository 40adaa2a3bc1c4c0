//! Procedural item generation
//!
//! Item type comes from a weighted table (`loot` for drops, `shop` for merchant stock);
//! quality and stats are rolled here.

use crate::item::Item;
use crate::types::*;
use crate::GeneratorError;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;
use tables_core::{TableRegistry, Weighted};
use tracing::debug;

const WEAPON_NAMES: &[&[&str]] = &[
    &["Axe", "War Hammer", "Greatsword", "Battle Axe"],
    &["Bow", "Crossbow", "Longbow", "Hunting Bow"],
    &["Staff", "Wand", "Orb", "Grimoire"],
];

const ARMOR_NAMES: &[&[&str]] = &[
    &["Hide Armor", "Fur Armor", "Plate Mail", "Chain Mail"],
    &["Leather Armor", "Scout Armor", "Rangers Cloak", "Hunters Garb"],
    &["Robe", "Enchanted Garb", "Mystic Vestments", "Arcane Cloak"],
];

const ACCESSORY_NAMES: &[&str] = &["Amulet", "Ring", "Bracers", "Belt", "Cloak"];

const LEGENDARY_PREFIXES: &[&str] = &[
    "From the depths of hell ",
    "The one with gods ",
    "Forged from Elixir ",
];

/// Numeric ranges for one quality grade of gear
struct GearRoll {
    prefixes: &'static [&'static str],
    boost: (i32, i32),
    value_per_level: u32,
    value_bonus: (u32, u32),
}

fn weapon_roll(quality: Quality) -> GearRoll {
    match quality {
        Quality::Common => GearRoll {
            prefixes: &[],
            boost: (1, 3),
            value_per_level: 10,
            value_bonus: (5, 15),
        },
        Quality::Uncommon => GearRoll {
            prefixes: &["Fine ", "Strong ", "Crafted "],
            boost: (3, 6),
            value_per_level: 20,
            value_bonus: (10, 30),
        },
        Quality::Rare => GearRoll {
            prefixes: &["Masterwork ", "Enchanted ", "Superior "],
            boost: (5, 10),
            value_per_level: 50,
            value_bonus: (25, 75),
        },
        Quality::Legendary => GearRoll {
            prefixes: LEGENDARY_PREFIXES,
            boost: (10, 20),
            value_per_level: 100,
            value_bonus: (50, 150),
        },
    }
}

fn armor_roll(quality: Quality) -> GearRoll {
    let boost = match quality {
        Quality::Common => (1, 2),
        Quality::Uncommon => (2, 4),
        Quality::Rare => (3, 7),
        Quality::Legendary => (5, 15),
    };
    let prefixes: &'static [&'static str] = match quality {
        Quality::Common => &[],
        Quality::Uncommon => &["Sturdy ", "Reinforced ", "Hardy "],
        Quality::Rare => &["Impenetrable ", "Enchanted ", "Superior "],
        Quality::Legendary => LEGENDARY_PREFIXES,
    };
    // Armor shares the weapon value curve
    GearRoll {
        prefixes,
        boost,
        ..weapon_roll(quality)
    }
}

fn accessory_roll(quality: Quality) -> (GearRoll, (usize, usize)) {
    match quality {
        Quality::Common => (
            GearRoll {
                prefixes: &[],
                boost: (1, 2),
                value_per_level: 15,
                value_bonus: (5, 25),
            },
            (1, 1),
        ),
        Quality::Uncommon => (
            GearRoll {
                prefixes: &["Enchanted ", "Mystic ", "Empowered "],
                boost: (2, 4),
                value_per_level: 30,
                value_bonus: (15, 45),
            },
            (1, 2),
        ),
        Quality::Rare => (
            GearRoll {
                prefixes: &["Nelson's ", "Odin's ", "King's "],
                boost: (3, 6),
                value_per_level: 70,
                value_bonus: (30, 90),
            },
            (2, 3),
        ),
        Quality::Legendary => (
            GearRoll {
                prefixes: &["Mythical ", "Ancient ", "Epic "],
                boost: (5, 10),
                value_per_level: 150,
                value_bonus: (50, 200),
            },
            (3, 4),
        ),
    }
}

impl GearRoll {
    fn prefix<R: Rng + ?Sized>(&self, rng: &mut R) -> &'static str {
        self.prefixes.choose(rng).copied().unwrap_or("")
    }

    fn value<R: Rng + ?Sized>(&self, level: u32, rng: &mut R) -> u32 {
        level * self.value_per_level + rng.gen_range(self.value_bonus.0..=self.value_bonus.1)
    }
}

/// Nested quality bands; the boss bonus shifts every threshold up by two steps
///
/// Each band is an independent draw, so "legendary" is whatever falls through all three.
pub fn roll_quality<R: Rng + ?Sized>(is_boss: bool, rng: &mut R) -> Quality {
    let k = if is_boss { 2.0 } else { 0.0 };

    if rng.gen::<f64>() < 0.2 + 0.05 * k {
        Quality::Rare
    } else if rng.gen::<f64>() < 0.3 + 0.1 * k {
        Quality::Uncommon
    } else if rng.gen::<f64>() < 0.5 + 0.15 * k {
        Quality::Common
    } else {
        Quality::Legendary
    }
}

/// Potion size for drops: better with level and quality
pub fn drop_potion_size(level: u32, quality: Quality) -> PotionSize {
    if level > 10 || quality == Quality::Rare {
        PotionSize::Large
    } else if level > 5 || quality == Quality::Uncommon {
        PotionSize::Medium
    } else {
        PotionSize::Small
    }
}

fn pick_name<'a, R: Rng + ?Sized>(lists: &[&[&'a str]], rng: &mut R) -> &'a str {
    lists
        .choose(rng)
        .and_then(|list| list.choose(rng))
        .copied()
        .unwrap_or("Trinket")
}

pub fn generate_weapon<R: Rng + ?Sized>(level: u32, quality: Quality, rng: &mut R) -> Item {
    let base = pick_name(WEAPON_NAMES, rng);
    let roll = weapon_roll(quality);
    let prefix = roll.prefix(rng);
    let boost = level as i32 + rng.gen_range(roll.boost.0..=roll.boost.1);
    let value = roll.value(level, rng);

    Item::weapon(format!("{}{}", prefix, base), value, boost)
}

pub fn generate_armor<R: Rng + ?Sized>(level: u32, quality: Quality, rng: &mut R) -> Item {
    let base = pick_name(ARMOR_NAMES, rng);
    let roll = armor_roll(quality);
    let prefix = roll.prefix(rng);
    let boost = level as i32 + rng.gen_range(roll.boost.0..=roll.boost.1);
    let value = roll.value(level, rng);

    Item::armor(format!("{}{}", prefix, base), value, boost)
}

pub fn generate_accessory<R: Rng + ?Sized>(level: u32, quality: Quality, rng: &mut R) -> Item {
    let base = ACCESSORY_NAMES.choose(rng).copied().unwrap_or("Ring");
    let (roll, (min_stats, max_stats)) = accessory_roll(quality);
    let prefix = roll.prefix(rng);
    let value = roll.value(level, rng);

    let count = rng.gen_range(min_stats..=max_stats);
    let (low, high) = roll.boost;
    let level = level as i32;

    let stat_boost: BTreeMap<Stat, i32> = Stat::all()
        .choose_multiple(rng, count)
        .map(|stat| {
            let boost = match stat {
                Stat::Attack | Stat::Defense => level / 2 + rng.gen_range(low..=high),
                Stat::MaxHp | Stat::MaxMana => level * 2 + rng.gen_range(low * 5..=high * 5),
            };
            (*stat, boost)
        })
        .collect();

    Item::accessory(format!("{}{}", prefix, base), value, stat_boost)
}

/// Random item builder backed by the `loot` and `shop` type tables
#[derive(Debug, Clone)]
pub struct LootGenerator {
    loot: Weighted<ItemType>,
    shop: Weighted<ItemType>,
}

impl LootGenerator {
    /// Build from the `loot` and `shop` tables of `registry`
    pub fn new(registry: &TableRegistry) -> Result<Self, GeneratorError> {
        Ok(LootGenerator {
            loot: registry.typed("loot", |id| id.parse().ok())?,
            shop: registry.typed("shop", |id| id.parse().ok())?,
        })
    }

    /// Generator using the built-in tables
    pub fn builtin() -> Result<Self, GeneratorError> {
        let registry = TableRegistry::builtin()?;
        Self::new(&registry)
    }

    pub fn roll_loot_type<R: Rng + ?Sized>(&self, level: u32, rng: &mut R) -> Result<ItemType, GeneratorError> {
        roll_type(&self.loot, level, rng)
    }

    pub fn roll_shop_type<R: Rng + ?Sized>(&self, level: u32, rng: &mut R) -> Result<ItemType, GeneratorError> {
        roll_type(&self.shop, level, rng)
    }

    /// Generate a drop for `level`; bosses roll better quality
    pub fn generate<R: Rng + ?Sized>(
        &self,
        level: u32,
        is_boss: bool,
        rng: &mut R,
    ) -> Result<Item, GeneratorError> {
        let item_type = self.roll_loot_type(level, rng)?;
        let quality = roll_quality(is_boss, rng);

        let item = match item_type {
            ItemType::HealthPotion => Item::health_potion(drop_potion_size(level, quality)),
            ItemType::ManaPotion => Item::mana_potion(drop_potion_size(level, quality)),
            other => self.build(other, level, quality, rng),
        };

        debug!(level, is_boss, ?quality, item = %item.name, "Generated loot");
        Ok(item)
    }

    /// Reproducible drop from a seed
    pub fn generate_from_seed(&self, level: u32, is_boss: bool, seed: u64) -> Result<Item, GeneratorError> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.generate(level, is_boss, &mut rng)
    }

    /// Build one item of a known type and quality
    ///
    /// Potions built here get a uniformly random size, as merchant stock does.
    pub fn build<R: Rng + ?Sized>(
        &self,
        item_type: ItemType,
        level: u32,
        quality: Quality,
        rng: &mut R,
    ) -> Item {
        match item_type {
            ItemType::Weapon => generate_weapon(level, quality, rng),
            ItemType::Armor => generate_armor(level, quality, rng),
            ItemType::Accessory => generate_accessory(level, quality, rng),
            ItemType::HealthPotion => Item::health_potion(random_size(rng)),
            ItemType::ManaPotion => Item::mana_potion(random_size(rng)),
            ItemType::StrengthElixir => Item::strength_elixir(),
        }
    }
}

fn roll_type<R: Rng + ?Sized>(
    table: &Weighted<ItemType>,
    level: u32,
    rng: &mut R,
) -> Result<ItemType, GeneratorError> {
    table
        .roll(level, rng)
        .copied()
        .ok_or_else(|| GeneratorError::NothingToRoll {
            table: table.id().to_string(),
            level,
        })
}

fn random_size<R: Rng + ?Sized>(rng: &mut R) -> PotionSize {
    PotionSize::all().choose(rng).copied().unwrap_or_default()
}
