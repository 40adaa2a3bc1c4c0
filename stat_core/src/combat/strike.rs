//! Per-variant attack data
//!
//! Variants differ only in numbers and a few flags, so each one is a row of data rather than
//! its own code path.

use crate::types::{Archetype, MonsterKind, Variant, VillainKind};

/// How the defender's defense is reduced for one strike
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GuardRule {
    /// `defense × base`, then `× block` when the defender is blocking
    Scaled { base: f64, block: f64 },
    /// `defense × open`, or `defense × guarded` when blocking
    Fixed { open: f64, guarded: f64 },
}

impl GuardRule {
    pub const STANDARD: GuardRule = GuardRule::Scaled {
        base: 1.0,
        block: 2.0,
    };

    /// Effective defense, truncated after every multiplication
    pub fn effective_defense(&self, defense: u32, blocking: bool) -> u32 {
        let mul = |value: u32, factor: f64| (value as f64 * factor) as u32;
        match *self {
            GuardRule::Scaled { base, block } => {
                let value = mul(defense, base);
                if blocking {
                    mul(value, block)
                } else {
                    value
                }
            }
            GuardRule::Fixed { open, guarded } => mul(defense, if blocking { guarded } else { open }),
        }
    }
}

/// One attack: how hard it hits and what rides along with it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrikeProfile {
    /// Multiplier on effective attack, truncated before the band is added
    pub multiplier: f64,
    /// Inclusive random band added to each hit
    pub band: (i32, i32),
    pub hits: u32,
    pub guard: GuardRule,
    /// Chance to ignore defense entirely
    pub pierces: bool,
    /// Fraction of damage dealt returned to the attacker as hp
    pub lifesteal: f64,
    /// Extra damage after the main hit; never mitigated by defense
    pub poison: Option<(i32, i32)>,
}

impl StrikeProfile {
    const fn new(multiplier: f64, band: (i32, i32)) -> Self {
        StrikeProfile {
            multiplier,
            band,
            hits: 1,
            guard: GuardRule::STANDARD,
            pierces: false,
            lifesteal: 0.0,
            poison: None,
        }
    }

    /// Raw value of a single hit before defense
    pub fn hit_value(&self, attack: u32, delta: i32) -> u32 {
        let scaled = (attack as f64 * self.multiplier) as i64;
        (scaled + i64::from(delta)).max(0) as u32
    }
}

/// A special attack: its strike plus the mana it costs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpecialProfile {
    pub cost: u32,
    pub strike: StrikeProfile,
}

/// A heal: mana cost and `base + band` hp restored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealProfile {
    pub cost: u32,
    pub base: u32,
    pub band: (i32, i32),
    /// Swing normally when the heal is unaffordable
    pub falls_back: bool,
}

pub fn basic_strike(variant: Variant) -> StrikeProfile {
    match variant {
        Variant::Player(Archetype::Archer) => StrikeProfile::new(1.0, (-5, 5)),
        Variant::Monster(MonsterKind::Vampire) => StrikeProfile {
            lifesteal: 0.2,
            ..StrikeProfile::new(1.0, (-10, 10))
        },
        _ => StrikeProfile::new(1.0, (-10, 10)),
    }
}

/// Special attack for `variant`; monster costs grow with `level`
pub fn special_strike(variant: Variant, level: u32) -> SpecialProfile {
    let half_guard = GuardRule::Fixed {
        open: 0.5,
        guarded: 1.0,
    };

    let (cost, strike) = match variant {
        Variant::Generic => (15, StrikeProfile::new(1.5, (-5, 15))),
        Variant::Player(Archetype::Barbarian) => (20, StrikeProfile::new(2.0, (-10, 20))),
        Variant::Player(Archetype::Archer) => (
            15,
            StrikeProfile {
                pierces: true,
                ..StrikeProfile::new(1.3, (-5, 10))
            },
        ),
        Variant::Player(Archetype::Mage) => (
            25,
            StrikeProfile {
                guard: GuardRule::Scaled {
                    base: 1.0,
                    block: 1.5,
                },
                ..StrikeProfile::new(2.5, (-10, 30))
            },
        ),
        Variant::Villain(VillainKind::DarkKnight) => (
            20,
            StrikeProfile {
                lifesteal: 0.3,
                ..StrikeProfile::new(1.7, (-5, 15))
            },
        ),
        Variant::Villain(VillainKind::DarkArcher) => (
            25,
            StrikeProfile {
                poison: Some((5, 8)),
                ..StrikeProfile::new(1.2, (-5, 10))
            },
        ),
        Variant::Villain(VillainKind::DarkMage) => (
            30,
            StrikeProfile {
                guard: GuardRule::Scaled {
                    base: 0.7,
                    block: 1.5,
                },
                ..StrikeProfile::new(3.0, (-5, 25))
            },
        ),
        Variant::Monster(MonsterKind::Slime) => (
            8 + level,
            StrikeProfile {
                hits: 3,
                ..StrikeProfile::new(0.6, (-2, 5))
            },
        ),
        Variant::Monster(MonsterKind::Goblin) => (
            10 + level,
            StrikeProfile {
                guard: half_guard,
                ..StrikeProfile::new(1.3, (-3, 8))
            },
        ),
        Variant::Monster(MonsterKind::Skeleton) => (12 + level, StrikeProfile::new(1.5, (-2, 12))),
        Variant::Monster(MonsterKind::Dragon) => (
            20 + level,
            StrikeProfile {
                guard: half_guard,
                ..StrikeProfile::new(2.0, (0, 15))
            },
        ),
        Variant::Monster(MonsterKind::Vampire) => (
            15 + level,
            StrikeProfile {
                lifesteal: 0.4,
                ..StrikeProfile::new(1.6, (-3, 10))
            },
        ),
    };

    SpecialProfile { cost, strike }
}

/// Heal action, for the variants that have one
pub fn heal_profile(variant: Variant) -> Option<HealProfile> {
    match variant {
        Variant::Player(Archetype::Mage) => Some(HealProfile {
            cost: 30,
            base: 25,
            band: (0, 15),
            falls_back: false,
        }),
        Variant::Villain(VillainKind::DarkMage) => Some(HealProfile {
            cost: 30,
            base: 30,
            band: (0, 10),
            falls_back: true,
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_rules() {
        assert_eq!(GuardRule::STANDARD.effective_defense(6, false), 6);
        assert_eq!(GuardRule::STANDARD.effective_defense(6, true), 12);

        let mage = special_strike(Variant::Player(Archetype::Mage), 1).strike.guard;
        assert_eq!(mage.effective_defense(11, true), 16);

        let dark_mage = special_strike(Variant::Villain(VillainKind::DarkMage), 1).strike.guard;
        // int(11 * 0.7) = 7, then int(7 * 1.5) = 10
        assert_eq!(dark_mage.effective_defense(11, false), 7);
        assert_eq!(dark_mage.effective_defense(11, true), 10);

        let dragon = special_strike(Variant::Monster(MonsterKind::Dragon), 5).strike.guard;
        assert_eq!(dragon.effective_defense(9, false), 4);
        assert_eq!(dragon.effective_defense(9, true), 9);
    }

    #[test]
    fn test_hit_value_truncates_then_floors() {
        let fireball = special_strike(Variant::Player(Archetype::Mage), 1).strike;
        assert_eq!(fireball.hit_value(15, 0), 37);
        assert_eq!(fireball.hit_value(15, -10), 27);
        assert_eq!(basic_strike(Variant::Generic).hit_value(3, -10), 0);
    }

    #[test]
    fn test_monster_costs_scale_with_level() {
        assert_eq!(special_strike(Variant::Monster(MonsterKind::Slime), 4).cost, 12);
        assert_eq!(special_strike(Variant::Monster(MonsterKind::Dragon), 6).cost, 26);
        assert_eq!(special_strike(Variant::Villain(VillainKind::DarkMage), 9).cost, 30);
    }

    #[test]
    fn test_only_healers_have_heal() {
        assert!(heal_profile(Variant::Player(Archetype::Mage)).is_some());
        assert!(heal_profile(Variant::Player(Archetype::Barbarian)).is_none());
        assert!(heal_profile(Variant::Villain(VillainKind::DarkMage)).unwrap().falls_back);
    }
}
