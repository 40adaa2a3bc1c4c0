//! stat_core - Combatants, progression and turn-based combat
//!
//! This library provides:
//! - Combatant: players, villains and monsters with stats, inventory and equipment
//! - Progression: XP, level-ups and class evolution
//! - Combat: a two-party turn state machine emitting structured events
//! - Opponent policy: the simple reactive AI villains and monsters use
//! - Spawning and rewards: level-matched opponents and post-combat spoils
//! - CharacterRecord: the persisted shape, plus a repository interface
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use stat_core::prelude::*;
//! use rand::SeedableRng;
//!
//! let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(42);
//! let mut hero = Combatant::player("Conan", Archetype::Barbarian).with_starter_kit();
//! let mut villain = spawn_villain(hero.level(), &mut rng);
//!
//! let mut combat = Combat::new(&mut hero, &mut villain);
//! while !combat.is_over() {
//!     for turn in combat.round(Action::Attack, &mut rng)? {
//!         println!("{} dealt {}", turn.action, turn.damage_dealt());
//!     }
//! }
//! ```

pub mod combat;
pub mod combatant;
pub mod config;
pub mod dice;
pub mod equipment;
pub mod prelude;
pub mod progression;
pub mod record;
pub mod rewards;
pub mod spawn;
pub mod stats;
pub mod types;

// Core API - what most users need
pub use combat::{Combat, CombatError, CombatEvent, Outcome, Phase, Side, TurnResult};
pub use combatant::Combatant;
pub use equipment::Equipment;
pub use progression::{Evolution, LevelUp, Progression};
pub use stats::Stats;
pub use types::{Action, Archetype, MonsterKind, Variant, VillainKind};

// Configuration
pub use config::{ConfigError, GameConstants};

// Persistence
pub use record::{CharacterRecord, CharacterRepository, RecordError, RepositoryError};

// Re-export commonly needed loot_core types
pub use loot_core::{EquipmentSlot, Inventory, Item, Stat};

use thiserror::Error;

/// Item use, equip or unequip failure; nothing changes on error
#[derive(Debug, Error)]
pub enum ItemError {
    #[error("No item at index {index} (inventory holds {len})")]
    InvalidIndex { index: usize, len: usize },
    #[error("'{0}' cannot be used")]
    NotUsable(String),
    #[error("'{0}' cannot be equipped")]
    NotGear(String),
    #[error("Nothing equipped in the {0:?} slot")]
    EmptySlot(EquipmentSlot),
    #[error("Inventory is full")]
    InventoryFull,
    #[error(transparent)]
    Inventory(#[from] loot_core::InventoryError),
}

/// Error building a monster spawner or rolling an encounter
#[derive(Debug, Error)]
pub enum SpawnError {
    #[error("Table config error: {0}")]
    Config(#[from] tables_core::ConfigError),
    #[error("Table error: {0}")]
    Table(#[from] tables_core::RollError),
    #[error("No monster can spawn at level {level}")]
    NothingToSpawn { level: u32 },
    #[error("Unknown hunting area: {0}")]
    UnknownArea(String),
    #[error("{area} opens at level {unlock_level}, player is level {player_level}")]
    AreaLocked {
        area: String,
        unlock_level: u32,
        player_level: u32,
    },
}
