//! loot_core - Items, inventories and procedural loot
//!
//! This library provides:
//! - Item: consumables (potions, elixirs) and gear (weapon, armor, accessory)
//! - Inventory: capacity-bounded item list plus gold
//! - LootGenerator: level/quality-scaled random items driven by weighted tables
//! - Shop: luck-biased merchant stock with atomic buy/sell
//! - ItemRecord: flat persistence shape for items
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use loot_core::{Inventory, LootGenerator};
//! use rand::SeedableRng;
//!
//! let generator = LootGenerator::builtin()?;
//! let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(7);
//! let item = generator.generate(3, false, &mut rng)?;
//!
//! let mut inventory = Inventory::default();
//! inventory.add(item)?;
//! ```

pub mod generator;
pub mod inventory;
pub mod item;
pub mod record;
pub mod shop;
pub mod types;

pub use generator::LootGenerator;
pub use inventory::Inventory;
pub use item::{Applied, Consumable, ConsumableEffect, Gear, Item, ItemKind, ItemTarget};
pub use record::{ItemDetails, ItemRecord};
pub use shop::Shop;
pub use types::{EquipmentSlot, ItemType, PotionSize, Quality, Stat};

use thiserror::Error;

/// Error building or rolling the generator's tables
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("Table config error: {0}")]
    Config(#[from] tables_core::ConfigError),
    #[error("Table error: {0}")]
    Table(#[from] tables_core::RollError),
    #[error("Table '{table}' has nothing to roll at level {level}")]
    NothingToRoll { table: String, level: u32 },
}

/// Inventory operation failure; no state changes on error
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("Inventory is full, cannot add '{}'", .item.name)]
    Full { item: Box<Item> },
    #[error("No item at index {index} (inventory holds {len})")]
    InvalidIndex { index: usize, len: usize },
    #[error("Not enough gold: need {need}, have {have}")]
    InsufficientGold { need: u32, have: u32 },
}

/// Shop trade failure; gold, stock and inventory are unchanged on error
#[derive(Debug, Error)]
pub enum ShopError {
    #[error("No item at index {index} (there are {len})")]
    InvalidIndex { index: usize, len: usize },
    #[error("Not enough gold: need {need}, have {have}")]
    InsufficientGold { need: u32, have: u32 },
    #[error("Inventory is full")]
    InventoryFull,
    #[error(transparent)]
    Inventory(#[from] InventoryError),
    #[error(transparent)]
    Generator(#[from] GeneratorError),
}

/// Error converting a persisted item record back into an item
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Unknown stat '{0}' in item record")]
    UnknownStat(String),
}
