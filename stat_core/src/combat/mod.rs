//! Combat - a turn-based duel between a player and one opponent
//!
//! [`Combat`] borrows both combatants for the length of the fight. Each call to
//! [`Combat::play_turn`] or [`Combat::opponent_turn`] resolves exactly one action and reports
//! whether the fight is over; the caller drives the loop.

mod policy;
mod resolution;
mod result;
mod strike;

pub use policy::{choose_action, special_threshold};
pub use resolution::take_hit;
pub use result::{CombatEvent, Outcome, Side, TurnResult};
pub use strike::{
    basic_strike, heal_profile, special_strike, GuardRule, HealProfile, SpecialProfile,
    StrikeProfile,
};

use crate::combatant::Combatant;
use crate::config::{ConfigError, GameConstants};
use crate::dice::Roller;
use crate::types::{Action, Variant};
use crate::ItemError;
use thiserror::Error;
use tracing::{debug, info};

/// Rejected combat input; nothing was mutated
#[derive(Debug, Error)]
pub enum CombatError {
    #[error("Combat is over")]
    Ended,
    #[error("It is the {expected:?} side's turn")]
    NotYourTurn { expected: Side },
    #[error("{variant} cannot use {action}")]
    IllegalAction { action: Action, variant: Variant },
    #[error(transparent)]
    Item(#[from] ItemError),
}

/// Whose move it is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    PlayerTurn,
    OpponentTurn,
    Ended,
}

/// One fight in progress
#[derive(Debug)]
pub struct Combat<'a> {
    player: &'a mut Combatant,
    opponent: &'a mut Combatant,
    phase: Phase,
    turn: u32,
    constants: GameConstants,
}

impl<'a> Combat<'a> {
    /// Start a fight with the standard rules; the player moves first
    pub fn new(player: &'a mut Combatant, opponent: &'a mut Combatant) -> Self {
        Self::start(player, opponent, GameConstants::default())
    }

    /// Start a fight under custom rules, rejecting constants that fail validation
    pub fn with_constants(
        player: &'a mut Combatant,
        opponent: &'a mut Combatant,
        constants: GameConstants,
    ) -> Result<Self, ConfigError> {
        constants.validate()?;
        Ok(Self::start(player, opponent, constants))
    }

    fn start(
        player: &'a mut Combatant,
        opponent: &'a mut Combatant,
        constants: GameConstants,
    ) -> Self {
        let phase = if player.is_alive() && opponent.is_alive() {
            Phase::PlayerTurn
        } else {
            Phase::Ended
        };
        info!(player = %player.name, opponent = %opponent.name, "Combat started");

        Combat {
            player,
            opponent,
            phase,
            turn: 0,
            constants,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Turns resolved so far, counting both sides
    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::Ended
    }

    /// Winner, once the fight is over
    pub fn outcome(&self) -> Option<Outcome> {
        if self.phase != Phase::Ended {
            return None;
        }
        if self.player.is_alive() {
            Some(Outcome::PlayerWon)
        } else {
            Some(Outcome::PlayerLost)
        }
    }

    pub fn player(&self) -> &Combatant {
        self.player
    }

    pub fn opponent(&self) -> &Combatant {
        self.opponent
    }

    pub fn constants(&self) -> &GameConstants {
        &self.constants
    }

    /// Resolve the player's chosen action
    pub fn play_turn<R: Roller + ?Sized>(
        &mut self,
        action: Action,
        rng: &mut R,
    ) -> Result<TurnResult, CombatError> {
        self.expect_phase(Side::Player)?;
        self.take_turn(Side::Player, action, rng)
    }

    /// Let the opponent pick and resolve its action
    pub fn opponent_turn<R: Roller + ?Sized>(&mut self, rng: &mut R) -> Result<TurnResult, CombatError> {
        self.expect_phase(Side::Opponent)?;
        let action = choose_action(self.opponent, &self.constants.policy, rng);
        self.take_turn(Side::Opponent, action, rng)
    }

    /// Player action followed by the opponent's reply, unless the fight ended in between
    pub fn round<R: Roller + ?Sized>(
        &mut self,
        action: Action,
        rng: &mut R,
    ) -> Result<Vec<TurnResult>, CombatError> {
        let mut results = vec![self.play_turn(action, rng)?];
        if !self.is_over() {
            results.push(self.opponent_turn(rng)?);
        }
        Ok(results)
    }

    fn expect_phase(&self, side: Side) -> Result<(), CombatError> {
        match (self.phase, side) {
            (Phase::Ended, _) => Err(CombatError::Ended),
            (Phase::PlayerTurn, Side::Player) | (Phase::OpponentTurn, Side::Opponent) => Ok(()),
            (Phase::PlayerTurn, Side::Opponent) => Err(CombatError::NotYourTurn {
                expected: Side::Player,
            }),
            (Phase::OpponentTurn, Side::Player) => Err(CombatError::NotYourTurn {
                expected: Side::Opponent,
            }),
        }
    }

    fn take_turn<R: Roller + ?Sized>(
        &mut self,
        side: Side,
        action: Action,
        rng: &mut R,
    ) -> Result<TurnResult, CombatError> {
        let (actor, defender) = match side {
            Side::Player => (&mut *self.player, &mut *self.opponent),
            Side::Opponent => (&mut *self.opponent, &mut *self.player),
        };

        let resolution =
            resolution::resolve(actor, defender, side, action, &self.constants.combat, rng)?;
        let mut events = resolution.events;

        if action != Action::Block {
            actor.is_blocking = false;
        }
        if actor.attack_boost.tick() {
            events.push(CombatEvent::BoostExpired { actor: side });
        }

        debug!(
            turn = self.turn,
            actor = %actor.name,
            %action,
            magnitude = resolution.magnitude,
            "Turn resolved"
        );

        self.turn += 1;
        self.phase = if !self.player.is_alive() || !self.opponent.is_alive() {
            for (side, combatant) in [(Side::Player, &*self.player), (Side::Opponent, &*self.opponent)] {
                if !combatant.is_alive() {
                    events.push(CombatEvent::Defeated { side });
                }
            }
            Phase::Ended
        } else {
            match side {
                Side::Player => Phase::OpponentTurn,
                Side::Opponent => Phase::PlayerTurn,
            }
        };

        let outcome = self.outcome();
        if let Some(outcome) = outcome {
            info!(?outcome, turns = self.turn, "Combat ended");
        }

        Ok(TurnResult {
            actor: side,
            action,
            magnitude: resolution.magnitude,
            events,
            ended: self.is_over(),
            outcome,
        })
    }
}
