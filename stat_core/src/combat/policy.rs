//! Opponent decision policy
//!
//! A pure function of the opponent's current hp and mana. Villains may block when desperate and
//! the Dark Mage may heal when wounded; monsters only choose between a basic and a special
//! attack.

use super::strike::heal_profile;
use crate::combatant::Combatant;
use crate::config::PolicyConstants;
use crate::dice::Roller;
use crate::types::{Action, Variant, VillainKind};

/// Mana an opponent wants in reserve before it considers a special
pub fn special_threshold(variant: Variant, constants: &PolicyConstants) -> u32 {
    match variant {
        Variant::Villain(VillainKind::DarkMage) => constants.dark_mage_mana,
        Variant::Villain(VillainKind::DarkArcher) => constants.dark_archer_mana,
        _ => constants.default_mana,
    }
}

/// Pick the opponent's action for this turn
///
/// A roll is only drawn when its branch is reachable, so scripted rolls line up with the
/// decisions that actually happen.
pub fn choose_action<R: Roller + ?Sized>(
    opponent: &Combatant,
    constants: &PolicyConstants,
    rng: &mut R,
) -> Action {
    let hp = f64::from(opponent.stats.hp());
    let max_hp = f64::from(opponent.stats.max_hp());
    let mana = opponent.stats.mana();

    if matches!(opponent.variant, Variant::Villain(_)) {
        if hp < max_hp * constants.desperate_hp && rng.check(constants.block_chance) {
            return Action::Block;
        }

        if hp < max_hp * constants.wounded_hp
            && heal_profile(opponent.variant).is_some_and(|heal| mana >= heal.cost)
            && rng.check(constants.heal_chance)
        {
            return Action::Heal;
        }
    }

    let special_chance = if hp > max_hp * constants.healthy_hp {
        constants.special_chance_healthy
    } else {
        constants.special_chance_wounded
    };

    if mana >= special_threshold(opponent.variant, constants) && rng.check(special_chance) {
        Action::SpecialAttack
    } else {
        Action::Attack
    }
}
