use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stats that gear can modify on its owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    Attack,
    Defense,
    MaxHp,
    MaxMana,
}

impl Stat {
    /// Get all stat variants
    pub fn all() -> &'static [Stat] {
        &[Stat::Attack, Stat::Defense, Stat::MaxHp, Stat::MaxMana]
    }

    /// Key used in persisted stat maps
    pub fn key(&self) -> &'static str {
        match self {
            Stat::Attack => "attack",
            Stat::Defense => "defense",
            Stat::MaxHp => "max_hp",
            Stat::MaxMana => "max_mana",
        }
    }
}

impl FromStr for Stat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stat::all().iter().copied().find(|stat| stat.key() == s).ok_or(())
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stat::Attack => write!(f, "Attack"),
            Stat::Defense => write!(f, "Defense"),
            Stat::MaxHp => write!(f, "Max HP"),
            Stat::MaxMana => write!(f, "Max Mana"),
        }
    }
}

/// Equipment slot for gear; a combatant holds at most one item per slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentSlot {
    Weapon,
    Armor,
    Accessory,
}

impl EquipmentSlot {
    /// Get all equipment slots
    pub fn all() -> &'static [EquipmentSlot] {
        &[
            EquipmentSlot::Weapon,
            EquipmentSlot::Armor,
            EquipmentSlot::Accessory,
        ]
    }

    pub fn key(&self) -> &'static str {
        match self {
            EquipmentSlot::Weapon => "weapon",
            EquipmentSlot::Armor => "armor",
            EquipmentSlot::Accessory => "accessory",
        }
    }
}

impl FromStr for EquipmentSlot {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EquipmentSlot::all()
            .iter()
            .copied()
            .find(|slot| slot.key() == s)
            .ok_or(())
    }
}

/// Generation grade controlling stat magnitude and value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    Common,
    Uncommon,
    Rare,
    Legendary,
}

impl Quality {
    pub fn all() -> &'static [Quality] {
        &[
            Quality::Common,
            Quality::Uncommon,
            Quality::Rare,
            Quality::Legendary,
        ]
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quality::Common => write!(f, "Common"),
            Quality::Uncommon => write!(f, "Uncommon"),
            Quality::Rare => write!(f, "Rare"),
            Quality::Legendary => write!(f, "Legendary"),
        }
    }
}

/// Potion strength
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PotionSize {
    #[default]
    Small,
    Medium,
    Large,
}

impl PotionSize {
    pub fn all() -> &'static [PotionSize] {
        &[PotionSize::Small, PotionSize::Medium, PotionSize::Large]
    }

    /// HP restored by a health potion of this size
    pub fn health(&self) -> u32 {
        match self {
            PotionSize::Small => 25,
            PotionSize::Medium => 50,
            PotionSize::Large => 100,
        }
    }

    /// Mana restored by a mana potion of this size
    pub fn mana(&self) -> u32 {
        match self {
            PotionSize::Small => 15,
            PotionSize::Medium => 30,
            PotionSize::Large => 60,
        }
    }

    /// Gold value, shared by health and mana potions
    pub fn value(&self) -> u32 {
        match self {
            PotionSize::Small => 15,
            PotionSize::Medium => 30,
            PotionSize::Large => 60,
        }
    }
}

impl fmt::Display for PotionSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PotionSize::Small => write!(f, "Small"),
            PotionSize::Medium => write!(f, "Medium"),
            PotionSize::Large => write!(f, "Large"),
        }
    }
}

/// The six kinds of item the generator can produce
///
/// Ids match the entries of the `loot` and `shop` tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Weapon,
    Armor,
    Accessory,
    HealthPotion,
    ManaPotion,
    StrengthElixir,
}

impl ItemType {
    pub fn all() -> &'static [ItemType] {
        &[
            ItemType::Weapon,
            ItemType::Armor,
            ItemType::Accessory,
            ItemType::HealthPotion,
            ItemType::ManaPotion,
            ItemType::StrengthElixir,
        ]
    }

    pub fn key(&self) -> &'static str {
        match self {
            ItemType::Weapon => "weapon",
            ItemType::Armor => "armor",
            ItemType::Accessory => "accessory",
            ItemType::HealthPotion => "health_potion",
            ItemType::ManaPotion => "mana_potion",
            ItemType::StrengthElixir => "strength_elixir",
        }
    }
}

impl FromStr for ItemType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ItemType::all()
            .iter()
            .copied()
            .find(|kind| kind.key() == s)
            .ok_or(())
    }
}
