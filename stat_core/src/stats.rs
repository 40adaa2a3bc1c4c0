use loot_core::Stat;
use serde::{Deserialize, Serialize};

/// Vitals and combat stats shared by every combatant
///
/// Fields are private so that `hp <= max_hp` and `mana <= max_mana` always hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    hp: u32,
    max_hp: u32,
    mana: u32,
    max_mana: u32,
    attack: u32,
    defense: u32,
}

impl Stats {
    /// Fully restored stats
    pub fn new(max_hp: u32, max_mana: u32, attack: u32, defense: u32) -> Self {
        Stats {
            hp: max_hp,
            max_hp,
            mana: max_mana,
            max_mana,
            attack,
            defense,
        }
    }

    /// Rebuild from stored values, clamping current vitals to their maximum
    pub fn from_parts(hp: u32, max_hp: u32, mana: u32, max_mana: u32, attack: u32, defense: u32) -> Self {
        Stats {
            hp: hp.min(max_hp),
            max_hp,
            mana: mana.min(max_mana),
            max_mana,
            attack,
            defense,
        }
    }

    pub fn hp(&self) -> u32 {
        self.hp
    }

    pub fn max_hp(&self) -> u32 {
        self.max_hp
    }

    pub fn mana(&self) -> u32 {
        self.mana
    }

    pub fn max_mana(&self) -> u32 {
        self.max_mana
    }

    /// Attack including equipment, excluding temporary boosts
    pub fn attack(&self) -> u32 {
        self.attack
    }

    pub fn defense(&self) -> u32 {
        self.defense
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Lose up to `amount` hp; returns hp actually lost
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.hp);
        self.hp -= lost;
        lost
    }

    /// Gain up to `amount` hp without passing max; returns hp actually gained
    pub fn heal(&mut self, amount: u32) -> u32 {
        let gained = amount.min(self.max_hp - self.hp);
        self.hp += gained;
        gained
    }

    pub fn restore_mana(&mut self, amount: u32) -> u32 {
        let gained = amount.min(self.max_mana - self.mana);
        self.mana += gained;
        gained
    }

    /// Spend mana if there is enough; otherwise nothing changes
    pub fn spend_mana(&mut self, amount: u32) -> bool {
        if self.mana < amount {
            return false;
        }
        self.mana -= amount;
        true
    }

    pub fn restore_all(&mut self) {
        self.hp = self.max_hp;
        self.mana = self.max_mana;
    }

    /// Add a signed delta to one stat, flooring at zero
    ///
    /// Lowering a maximum pulls the current value down with it. Raising it leaves the current
    /// value alone.
    pub fn apply(&mut self, stat: Stat, delta: i32) {
        match stat {
            Stat::Attack => self.attack = shift(self.attack, delta),
            Stat::Defense => self.defense = shift(self.defense, delta),
            Stat::MaxHp => {
                self.max_hp = shift(self.max_hp, delta);
                self.hp = self.hp.min(self.max_hp);
            }
            Stat::MaxMana => {
                self.max_mana = shift(self.max_mana, delta);
                self.mana = self.mana.min(self.max_mana);
            }
        }
    }
}

fn shift(value: u32, delta: i32) -> u32 {
    if delta >= 0 {
        value.saturating_add(delta as u32)
    } else {
        value.saturating_sub(delta.unsigned_abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_and_heal_are_clamped() {
        let mut stats = Stats::new(100, 50, 20, 10);
        assert_eq!(stats.take_damage(130), 100);
        assert!(!stats.is_alive());
        assert_eq!(stats.heal(40), 40);
        assert_eq!(stats.heal(100), 60);
        assert_eq!(stats.hp(), 100);
    }

    #[test]
    fn test_spend_mana_is_all_or_nothing() {
        let mut stats = Stats::new(100, 20, 20, 10);
        assert!(!stats.spend_mana(25));
        assert_eq!(stats.mana(), 20);
        assert!(stats.spend_mana(20));
        assert_eq!(stats.mana(), 0);
    }

    #[test]
    fn test_lowering_max_clamps_current() {
        let mut stats = Stats::new(100, 50, 20, 10);
        stats.apply(Stat::MaxHp, 25);
        assert_eq!((stats.hp(), stats.max_hp()), (100, 125));
        stats.apply(Stat::MaxHp, -40);
        assert_eq!((stats.hp(), stats.max_hp()), (85, 85));
        stats.apply(Stat::Defense, -50);
        assert_eq!(stats.defense(), 0);
    }

    #[test]
    fn test_from_parts_clamps() {
        let stats = Stats::from_parts(500, 120, 9, 40, 30, 12);
        assert_eq!(stats.hp(), 120);
        assert_eq!(stats.mana(), 9);
    }
}
