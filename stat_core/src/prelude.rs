//! Prelude module for convenient imports
//!
//! ```rust
//! use stat_core::prelude::*;
//! ```

// Core types
pub use crate::combatant::Combatant;
pub use crate::equipment::Equipment;
pub use crate::stats::Stats;
pub use crate::types::{Action, Archetype, MonsterKind, Variant, VillainKind};

// Combat
pub use crate::combat::{Combat, CombatError, CombatEvent, Outcome, Phase, Side, TurnResult};
pub use crate::dice::{FixedRolls, Roller};

// Progression and encounters
pub use crate::progression::{Evolution, LevelUp};
pub use crate::rewards::{Claimed, Reward};
pub use crate::spawn::{spawn_villain, try_flee, MonsterSpawner};

// Config
pub use crate::config::GameConstants;

// Persistence
pub use crate::record::{CharacterRecord, CharacterRepository, JsonDirRepository, MemoryRepository};

// Re-exports from loot_core
pub use loot_core::{EquipmentSlot, Inventory, Item, LootGenerator, Shop, Stat};
