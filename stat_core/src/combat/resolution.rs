//! Action resolution - apply one combatant's action to the other
//!
//! Draw order for a strike is fixed: pierce roll, one band roll per hit, the defender's dodge
//! roll (only if dodging), then the poison roll. Scripted rolls in tests rely on it. A pierce
//! is rolled first but only reported once the dodge check has passed.

use super::result::{CombatEvent, Side};
use super::strike::{basic_strike, heal_profile, special_strike, StrikeProfile};
use super::CombatError;
use crate::combatant::Combatant;
use crate::config::CombatConstants;
use crate::dice::Roller;
use crate::types::{Action, MonsterKind, Variant};
use tracing::debug;

/// What one action did
#[derive(Debug, Default)]
pub(crate) struct Resolution {
    pub magnitude: u32,
    pub events: Vec<CombatEvent>,
}

/// Apply incoming damage through the defender's damage intake
///
/// Returns the damage actually applied. Skeletons take a reduced share of every hit.
pub fn take_hit(defender: &mut Combatant, amount: u32, constants: &CombatConstants) -> u32 {
    let amount = match defender.variant {
        Variant::Monster(MonsterKind::Skeleton) => {
            (amount as f64 * constants.skeleton_damage_factor) as u32
        }
        _ => amount,
    };
    defender.stats.take_damage(amount);
    amount
}

/// Resolve `action` by `actor` against `defender`
///
/// Errors are raised before anything is mutated, so a rejected action leaves both sides
/// untouched.
pub(crate) fn resolve<R: Roller + ?Sized>(
    actor: &mut Combatant,
    defender: &mut Combatant,
    side: Side,
    action: Action,
    constants: &CombatConstants,
    rng: &mut R,
) -> Result<Resolution, CombatError> {
    let mut exchange = Exchange {
        actor,
        defender,
        side,
        constants,
        events: Vec::new(),
    };

    let magnitude = match action {
        Action::Attack => exchange.attack(rng),
        Action::SpecialAttack => exchange.special_attack(rng),
        Action::Block => {
            exchange.actor.is_blocking = true;
            exchange.events.push(CombatEvent::StartedBlocking { actor: side });
            0
        }
        Action::Dodge => {
            exchange.actor.is_dodging = true;
            exchange.events.push(CombatEvent::StartedDodging { actor: side });
            0
        }
        Action::UseItem { index } => exchange.use_item(index)?,
        Action::Heal => exchange.heal(rng)?,
    };

    Ok(Resolution {
        magnitude,
        events: exchange.events,
    })
}

struct Exchange<'a, 'c> {
    actor: &'a mut Combatant,
    defender: &'a mut Combatant,
    side: Side,
    constants: &'c CombatConstants,
    events: Vec<CombatEvent>,
}

impl Exchange<'_, '_> {
    fn attack<R: Roller + ?Sized>(&mut self, rng: &mut R) -> u32 {
        // Attacking out of a block only drops the guard
        if self.actor.is_blocking {
            self.actor.is_blocking = false;
            self.events.push(CombatEvent::LoweredGuard { actor: self.side });
            return 0;
        }
        self.basic(rng)
    }

    fn basic<R: Roller + ?Sized>(&mut self, rng: &mut R) -> u32 {
        let profile = basic_strike(self.actor.variant);
        self.strike(&profile, self.constants.basic_dodge_chance, rng)
    }

    fn special_attack<R: Roller + ?Sized>(&mut self, rng: &mut R) -> u32 {
        self.actor.is_blocking = false;

        let special = special_strike(self.actor.variant, self.actor.level());
        let available = self.actor.stats.mana();
        if !self.actor.stats.spend_mana(special.cost) {
            let falls_back = self.actor.variant.falls_back_to_attack();
            return self.unaffordable(Action::SpecialAttack, special.cost, available, falls_back, rng);
        }

        self.events.push(CombatEvent::ManaSpent {
            actor: self.side,
            amount: special.cost,
        });
        self.strike(&special.strike, self.constants.special_dodge_chance, rng)
    }

    fn heal<R: Roller + ?Sized>(&mut self, rng: &mut R) -> Result<u32, CombatError> {
        let heal = heal_profile(self.actor.variant).ok_or(CombatError::IllegalAction {
            action: Action::Heal,
            variant: self.actor.variant,
        })?;

        let available = self.actor.stats.mana();
        if !self.actor.stats.spend_mana(heal.cost) {
            return Ok(self.unaffordable(Action::Heal, heal.cost, available, heal.falls_back, rng));
        }
        self.events.push(CombatEvent::ManaSpent {
            actor: self.side,
            amount: heal.cost,
        });

        let amount = (heal.base as i32 + rng.roll_range(heal.band.0, heal.band.1)).max(0) as u32;
        let healed = self.actor.stats.heal(amount);
        self.events.push(CombatEvent::Healed {
            actor: self.side,
            amount: healed,
        });
        debug!(combatant = %self.actor.name, healed, "Heal");
        Ok(healed)
    }

    /// Mana ran short: swing normally, or waste the turn
    fn unaffordable<R: Roller + ?Sized>(
        &mut self,
        action: Action,
        needed: u32,
        available: u32,
        falls_back: bool,
        rng: &mut R,
    ) -> u32 {
        if falls_back {
            self.events.push(CombatEvent::FellBack {
                actor: self.side,
                from: action,
            });
            return self.basic(rng);
        }

        self.events.push(CombatEvent::InsufficientMana {
            actor: self.side,
            needed,
            available,
        });
        debug!(combatant = %self.actor.name, %action, needed, available, "Not enough mana");
        0
    }

    fn use_item(&mut self, index: usize) -> Result<u32, CombatError> {
        let name = self
            .actor
            .inventory
            .get(index)
            .map(|item| item.name.clone())
            .unwrap_or_default();
        let applied = self.actor.use_item(index)?;

        self.events.push(CombatEvent::UsedItem {
            actor: self.side,
            item: name,
            applied,
        });
        Ok(applied.magnitude())
    }

    fn strike<R: Roller + ?Sized>(
        &mut self,
        profile: &StrikeProfile,
        dodge_chance: f64,
        rng: &mut R,
    ) -> u32 {
        let target = self.side.other();

        let pierced = profile.pierces && rng.check(self.constants.pierce_chance);

        let attack = self.actor.effective_attack();
        let (low, high) = profile.band;
        let values: Vec<u32> = (0..profile.hits)
            .map(|_| profile.hit_value(attack, rng.roll_range(low, high)))
            .collect();

        // One dodge roll covers the whole action, and it is spent either way
        if self.defender.is_dodging {
            self.defender.is_dodging = false;
            if rng.check(dodge_chance) {
                self.events.push(CombatEvent::Dodged { defender: target });
                debug!(attacker = %self.actor.name, defender = %self.defender.name, "Dodged");
                return 0;
            }
            self.events.push(CombatEvent::DodgeFailed { defender: target });
        }

        // Reported only once the strike is known to land
        if pierced {
            self.events.push(CombatEvent::Pierced { actor: self.side });
        }

        let blocked = self.defender.is_blocking && !pierced;
        let defense = if pierced {
            0
        } else {
            profile
                .guard
                .effective_defense(self.defender.stats.defense(), self.defender.is_blocking)
        };

        let mut dealt = 0;
        for value in values {
            let damage = take_hit(self.defender, value.saturating_sub(defense), self.constants);
            self.events.push(CombatEvent::Hit {
                attacker: self.side,
                defender: target,
                damage,
                blocked,
            });
            dealt += damage;
        }

        if let Some((low, high)) = profile.poison {
            let poison = rng.roll_range(low, high).max(0) as u32;
            let damage = take_hit(self.defender, poison, self.constants);
            self.events.push(CombatEvent::Poisoned {
                defender: target,
                damage,
            });
            dealt += damage;
        }

        if profile.lifesteal > 0.0 {
            let drained = self.actor.stats.heal((dealt as f64 * profile.lifesteal) as u32);
            if drained > 0 {
                self.events.push(CombatEvent::Drained {
                    actor: self.side,
                    amount: drained,
                });
            }
        }

        debug!(
            attacker = %self.actor.name,
            defender = %self.defender.name,
            dealt,
            defense,
            hp_left = self.defender.stats.hp(),
            "Strike"
        );
        dealt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::FixedRolls;
    use crate::spawn::monster;
    use crate::types::{Archetype, VillainKind};
    use loot_core::{Item, PotionSize};

    fn run(
        actor: &mut Combatant,
        defender: &mut Combatant,
        action: Action,
        rng: &mut FixedRolls,
    ) -> Resolution {
        resolve(
            actor,
            defender,
            Side::Player,
            action,
            &CombatConstants::default(),
            rng,
        )
        .unwrap()
    }

    #[test]
    fn test_basic_attack_subtracts_defense() {
        let mut hero = Combatant::generic("Hero");
        let mut foe = Combatant::generic("Foe");

        let result = run(&mut hero, &mut foe, Action::Attack, &mut FixedRolls::new().range(3));
        assert_eq!(result.magnitude, 13);
        assert_eq!(foe.stats.hp(), 87);
    }

    #[test]
    fn test_block_doubles_defense() {
        let mut hero = Combatant::generic("Hero");
        let mut foe = Combatant::generic("Foe");
        foe.is_blocking = true;

        let result = run(&mut hero, &mut foe, Action::Attack, &mut FixedRolls::new());
        assert_eq!(result.magnitude, 0);
        assert!(foe.is_blocking);

        let result = run(&mut hero, &mut foe, Action::Attack, &mut FixedRolls::new().range(10));
        assert_eq!(result.magnitude, 10);
        assert!(matches!(
            result.events[0],
            CombatEvent::Hit { blocked: true, .. }
        ));
    }

    #[test]
    fn test_attacking_from_block_lowers_guard() {
        let mut hero = Combatant::generic("Hero");
        let mut foe = Combatant::generic("Foe");
        hero.is_blocking = true;

        let result = run(&mut hero, &mut foe, Action::Attack, &mut FixedRolls::new());
        assert_eq!(result.magnitude, 0);
        assert!(!hero.is_blocking);
        assert_eq!(foe.stats.hp(), 100);
        assert_eq!(result.events, vec![CombatEvent::LoweredGuard { actor: Side::Player }]);
    }

    #[test]
    fn test_dodge_is_one_shot() {
        let mut hero = Combatant::generic("Hero");
        let mut foe = Combatant::generic("Foe");
        foe.is_dodging = true;

        // 0.3 < 0.4: dodged
        let result = run(&mut hero, &mut foe, Action::Attack, &mut FixedRolls::new().chance(0.3));
        assert_eq!(result.magnitude, 0);
        assert!(!foe.is_dodging);

        // No dodge roll is drawn the second time
        let mut rolls = FixedRolls::new().chance(0.0);
        let result = run(&mut hero, &mut foe, Action::Attack, &mut rolls);
        assert_eq!(result.magnitude, 10);
        assert_eq!(rolls.remaining(), 1);
    }

    #[test]
    fn test_failed_dodge_still_clears() {
        let mut hero = Combatant::generic("Hero");
        let mut foe = Combatant::generic("Foe");
        foe.is_dodging = true;

        let result = run(&mut hero, &mut foe, Action::Attack, &mut FixedRolls::new().chance(0.4));
        assert_eq!(result.magnitude, 10);
        assert!(!foe.is_dodging);
        assert_eq!(result.events[0], CombatEvent::DodgeFailed { defender: Side::Opponent });
    }

    #[test]
    fn test_player_special_without_mana_does_nothing() {
        let mut mage = Combatant::player("Merlin", Archetype::Mage);
        mage.stats.spend_mana(100);
        let mut foe = Combatant::generic("Foe");

        let result = run(&mut mage, &mut foe, Action::SpecialAttack, &mut FixedRolls::new());
        assert_eq!(result.magnitude, 0);
        assert_eq!(mage.stats.mana(), 20);
        assert_eq!(foe.stats.hp(), 100);
        assert_eq!(
            result.events,
            vec![CombatEvent::InsufficientMana {
                actor: Side::Player,
                needed: 25,
                available: 20
            }]
        );
    }

    #[test]
    fn test_villain_special_without_mana_falls_back() {
        let mut knight = Combatant::villain("Grimshade", VillainKind::DarkKnight);
        knight.stats.spend_mana(30);
        let mut hero = Combatant::generic("Hero");

        let result = run(&mut knight, &mut hero, Action::SpecialAttack, &mut FixedRolls::new());
        assert_eq!(knight.stats.mana(), 10);
        assert_eq!(result.magnitude, 10);
        assert!(matches!(result.events[0], CombatEvent::FellBack { .. }));
    }

    #[test]
    fn test_dark_knight_drains() {
        let mut knight = Combatant::villain("Grimshade", VillainKind::DarkKnight);
        knight.stats.take_damage(50);
        let mut hero = Combatant::generic("Hero");

        // int(20 * 1.7) = 34, minus 10 defense
        let result = run(&mut knight, &mut hero, Action::SpecialAttack, &mut FixedRolls::new());
        assert_eq!(result.magnitude, 24);
        assert_eq!(knight.stats.hp(), 87);
        assert_eq!(knight.stats.mana(), 20);
    }

    #[test]
    fn test_dark_archer_poison_ignores_defense() {
        let mut archer = Combatant::villain("Nightblade", VillainKind::DarkArcher);
        let mut hero = Combatant::generic("Hero");
        hero.is_blocking = true;

        // int(25 * 1.2) = 30 minus 20 blocking defense, then 6 poison
        let mut rolls = FixedRolls::new().range(0).range(6);
        let result = run(&mut archer, &mut hero, Action::SpecialAttack, &mut rolls);
        assert_eq!(result.magnitude, 16);
        assert!(result
            .events
            .contains(&CombatEvent::Poisoned { defender: Side::Opponent, damage: 6 }));
    }

    #[test]
    fn test_dodged_special_voids_poison() {
        let mut archer = Combatant::villain("Nightblade", VillainKind::DarkArcher);
        let mut hero = Combatant::generic("Hero");
        hero.is_dodging = true;

        let mut rolls = FixedRolls::new().range(0).chance(0.1).range(8);
        let result = run(&mut archer, &mut hero, Action::SpecialAttack, &mut rolls);
        assert_eq!(result.magnitude, 0);
        assert_eq!(hero.stats.hp(), 100);
        // The poison roll is never drawn
        assert_eq!(rolls.remaining(), 1);
    }

    #[test]
    fn test_dodged_pierce_is_not_reported() {
        let mut archer = Combatant::player("Robin", Archetype::Archer);
        let mut foe = Combatant::generic("Foe");
        foe.is_dodging = true;

        let mut rolls = FixedRolls::new().chance(0.0).range(0).chance(0.1);
        let result = run(&mut archer, &mut foe, Action::SpecialAttack, &mut rolls);
        assert_eq!(result.magnitude, 0);
        assert!(result.events.contains(&CombatEvent::Dodged { defender: Side::Opponent }));
        assert!(!result
            .events
            .iter()
            .any(|e| matches!(e, CombatEvent::Pierced { .. })));
        assert_eq!(rolls.remaining(), 0);
    }

    #[test]
    fn test_pierce_reported_after_failed_dodge() {
        let mut archer = Combatant::player("Robin", Archetype::Archer);
        let mut foe = Combatant::generic("Foe");
        foe.is_dodging = true;

        // int(22 * 1.3) = 28, defense ignored
        let mut rolls = FixedRolls::new().chance(0.0).range(0).chance(0.5);
        let result = run(&mut archer, &mut foe, Action::SpecialAttack, &mut rolls);
        assert_eq!(result.magnitude, 28);
        let dodge = result
            .events
            .iter()
            .position(|e| matches!(e, CombatEvent::DodgeFailed { .. }));
        let pierce = result
            .events
            .iter()
            .position(|e| matches!(e, CombatEvent::Pierced { .. }));
        assert!(dodge.is_some() && pierce.is_some());
        assert!(dodge < pierce);
    }

    #[test]
    fn test_goblin_special_halves_open_defense() {
        let mut goblin = monster(MonsterKind::Goblin, 1, false, &mut FixedRolls::new());
        let mut hero = Combatant::generic("Hero");

        // attack 21: int(21 * 1.3) = 27, minus int(10 * 0.5) = 5
        let result = run(&mut goblin, &mut hero, Action::SpecialAttack, &mut FixedRolls::new());
        assert_eq!(result.magnitude, 22);
        assert_eq!(hero.stats.hp(), 78);
        assert_eq!(goblin.stats.mana(), 35 - 11);
    }

    #[test]
    fn test_goblin_special_meets_full_defense_when_blocked() {
        let mut goblin = monster(MonsterKind::Goblin, 1, false, &mut FixedRolls::new());
        let mut hero = Combatant::generic("Hero");
        hero.is_blocking = true;

        // Blocking restores full defense but does not double it: 27 - 10
        let result = run(&mut goblin, &mut hero, Action::SpecialAttack, &mut FixedRolls::new());
        assert_eq!(result.magnitude, 17);
        assert!(result.events.contains(&CombatEvent::Hit {
            attacker: Side::Player,
            defender: Side::Opponent,
            damage: 17,
            blocked: true,
        }));
    }

    #[test]
    fn test_slime_hits_three_times() {
        let mut slime = monster(MonsterKind::Slime, 2, false, &mut FixedRolls::new());
        let mut hero = Combatant::player("Conan", Archetype::Barbarian);

        // attack 17: int(17 * 0.6) = 10 per hit, plus 5, minus 8 defense
        let mut rolls = FixedRolls::new().range(5).range(5).range(5);
        let result = run(&mut slime, &mut hero, Action::SpecialAttack, &mut rolls);
        assert_eq!(result.magnitude, 21);
        assert_eq!(result.events.iter().filter(|e| matches!(e, CombatEvent::Hit { .. })).count(), 3);
    }

    #[test]
    fn test_heal_is_mage_only() {
        let mut hero = Combatant::player("Conan", Archetype::Barbarian);
        let mut foe = Combatant::generic("Foe");
        let err = resolve(
            &mut hero,
            &mut foe,
            Side::Player,
            Action::Heal,
            &CombatConstants::default(),
            &mut FixedRolls::new(),
        );
        assert!(matches!(err, Err(CombatError::IllegalAction { .. })));
    }

    #[test]
    fn test_mage_heal() {
        let mut mage = Combatant::player("Merlin", Archetype::Mage);
        mage.stats.take_damage(60);
        let mut foe = Combatant::generic("Foe");

        let result = run(&mut mage, &mut foe, Action::Heal, &mut FixedRolls::new().range(7));
        assert_eq!(result.magnitude, 32);
        assert_eq!(mage.stats.hp(), 52);
        assert_eq!(mage.stats.mana(), 90);

        mage.stats.spend_mana(70);
        let result = run(&mut mage, &mut foe, Action::Heal, &mut FixedRolls::new());
        assert_eq!(result.magnitude, 0);
        assert_eq!(mage.stats.mana(), 20);
    }

    #[test]
    fn test_use_item_reports_effect() {
        let mut hero = Combatant::generic("Hero");
        hero.stats.spend_mana(40);
        hero.inventory.add(Item::mana_potion(PotionSize::Medium)).unwrap();
        let mut foe = Combatant::generic("Foe");

        let result = run(&mut hero, &mut foe, Action::UseItem { index: 0 }, &mut FixedRolls::new());
        assert_eq!(result.magnitude, 30);
        assert!(hero.inventory.is_empty());

        let err = resolve(
            &mut hero,
            &mut foe,
            Side::Player,
            Action::UseItem { index: 0 },
            &CombatConstants::default(),
            &mut FixedRolls::new(),
        );
        assert!(matches!(err, Err(CombatError::Item(_))));
    }

    #[test]
    fn test_skeleton_takes_reduced_damage() {
        let mut skeleton = monster(MonsterKind::Skeleton, 1, false, &mut FixedRolls::new());
        assert_eq!(take_hit(&mut skeleton, 21, &CombatConstants::default()), 15);
    }
}
