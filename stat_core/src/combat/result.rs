//! Turn results and the structured events they carry

use crate::types::Action;
use loot_core::Applied;
use serde::{Deserialize, Serialize};

/// Which side of the fight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Player,
    Opponent,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::Player => Side::Opponent,
            Side::Opponent => Side::Player,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    PlayerWon,
    PlayerLost,
}

/// Something that happened while resolving an action
///
/// Rendering these is up to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CombatEvent {
    /// Attacked while blocking: the guard drops and nothing else happens
    LoweredGuard { actor: Side },
    StartedBlocking { actor: Side },
    StartedDodging { actor: Side },
    /// A special could not be paid for
    InsufficientMana { actor: Side, needed: u32, available: u32 },
    /// Unaffordable special or heal replaced by a basic attack
    FellBack { actor: Side, from: Action },
    ManaSpent { actor: Side, amount: u32 },
    /// Defense ignored entirely
    Pierced { actor: Side },
    Dodged { defender: Side },
    DodgeFailed { defender: Side },
    Hit {
        attacker: Side,
        defender: Side,
        damage: u32,
        blocked: bool,
    },
    Poisoned { defender: Side, damage: u32 },
    Drained { actor: Side, amount: u32 },
    Healed { actor: Side, amount: u32 },
    UsedItem { actor: Side, item: String, applied: Applied },
    BoostExpired { actor: Side },
    Defeated { side: Side },
}

/// Everything one turn did
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnResult {
    pub actor: Side,
    /// Action as requested
    pub action: Action,
    /// Damage dealt, hp healed or item effect size
    pub magnitude: u32,
    pub events: Vec<CombatEvent>,
    pub ended: bool,
    pub outcome: Option<Outcome>,
}

impl TurnResult {
    /// Total damage landed on the other side this turn
    pub fn damage_dealt(&self) -> u32 {
        self.events
            .iter()
            .map(|e| match e {
                CombatEvent::Hit { damage, .. } | CombatEvent::Poisoned { damage, .. } => *damage,
                _ => 0,
            })
            .sum()
    }
}
