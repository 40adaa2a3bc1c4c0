//! XP, levelling and class evolution

use crate::combatant::Combatant;
use crate::config::ProgressionConstants;
use crate::types::{Archetype, Variant};
use loot_core::Stat;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Highest class tier
pub const MAX_TIER: u8 = 6;

/// Level, XP and class evolution state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progression {
    pub level: u32,
    pub xp: u32,
    pub xp_to_level: u32,
    pub class_tier: u8,
    pub class_title: String,
    /// Unlocked skill names, append-only
    pub skills: Vec<String>,
}

impl Progression {
    /// Level 1 with the configured first threshold
    pub fn with_constants(constants: &ProgressionConstants) -> Self {
        Progression {
            level: 1,
            xp: 0,
            xp_to_level: constants.starting_xp_to_level.max(1),
            class_tier: 0,
            class_title: String::new(),
            skills: Vec::new(),
        }
    }
}

impl Default for Progression {
    fn default() -> Self {
        Self::with_constants(&ProgressionConstants::default())
    }
}

/// Outcome of one level-up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelUp {
    pub level: u32,
    pub hp_gain: u32,
    pub mana_gain: u32,
    pub attack_gain: u32,
    pub defense_gain: u32,
    pub evolution: Option<Evolution>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evolution {
    pub tier: u8,
    pub title: String,
    /// New skill, if this variant learns skills
    pub skill: Option<String>,
}

/// Per-level stat gains: (max hp, max mana, attack, defense)
pub fn level_gains(variant: Variant) -> (u32, u32, u32, u32) {
    match variant {
        Variant::Player(Archetype::Barbarian) => (15, 5, 3, 1),
        Variant::Player(Archetype::Archer) => (10, 8, 2, 2),
        Variant::Player(Archetype::Mage) => (8, 12, 2, 1),
        _ => (10, 5, 2, 1),
    }
}

/// Tier unlocked on reaching `level`, if any
pub fn evolution_tier(level: u32) -> Option<u8> {
    match level {
        5 => Some(1),
        10 => Some(2),
        15 => Some(3),
        20 => Some(4),
        25 => Some(5),
        30 => Some(6),
        _ => None,
    }
}

const BARBARIAN_TITLES: [&str; 7] = [
    "Barbarian",
    "Berserker",
    "Warlord",
    "Champion",
    "Warchief",
    "Legendary Warrior",
    "Celestial Conqueror",
];
const ARCHER_TITLES: [&str; 7] = [
    "Archer",
    "Scout",
    "Ranger",
    "Sharpshooter",
    "Marksman",
    "Legendary Hunter",
    "Celestial Deadeye",
];
const MAGE_TITLES: [&str; 7] = [
    "Mage",
    "Apprentice Mage",
    "Adept Mage",
    "Master Mage",
    "Grand Mage",
    "Elder Sage",
    "Celestial Magus",
];
const GENERIC_TITLES: [&str; 7] = [
    "Novice",
    "Initiate",
    "Adept",
    "Expert",
    "Master",
    "Grandmaster",
    "Celestial",
];

const BARBARIAN_SKILLS: [&str; 6] = [
    "Battle Cry",
    "Cleave",
    "Endurance",
    "Rallying Shout",
    "Unstoppable Force",
    "Divine Fury",
];
const ARCHER_SKILLS: [&str; 6] = [
    "Quick Shot",
    "Trap",
    "Aimed Shot",
    "Volley",
    "Shadow Step",
    "Rain of Arrows",
];
const MAGE_SKILLS: [&str; 6] = [
    "Frost Nova",
    "Arcane Missile",
    "Teleport",
    "Mirror Image",
    "Mana Shield",
    "Meteor Storm",
];

pub fn class_title(variant: Variant, tier: u8) -> &'static str {
    let titles = match variant.archetype() {
        Some(Archetype::Barbarian) => &BARBARIAN_TITLES,
        Some(Archetype::Archer) => &ARCHER_TITLES,
        Some(Archetype::Mage) => &MAGE_TITLES,
        None => &GENERIC_TITLES,
    };
    titles[usize::from(tier.min(MAX_TIER))]
}

/// Skill learned on reaching `tier`; only player archetypes learn skills
pub fn tier_skill(variant: Variant, tier: u8) -> Option<&'static str> {
    let skills = match variant.archetype()? {
        Archetype::Barbarian => &BARBARIAN_SKILLS,
        Archetype::Archer => &ARCHER_SKILLS,
        Archetype::Mage => &MAGE_SKILLS,
    };
    let index = usize::from(tier).checked_sub(1)?;
    skills.get(index).copied()
}

/// Next XP threshold, truncated to an integer
///
/// Strictly above `current` unless `current` is already `u32::MAX`.
pub fn next_threshold(current: u32, growth: f64) -> u32 {
    let next = (current as f64 * growth) as u32;
    next.max(current.saturating_add(1))
}

impl Combatant {
    /// Gain XP with the standard progression rules
    pub fn gain_xp(&mut self, amount: u32) -> Vec<LevelUp> {
        self.gain_xp_with(amount, &ProgressionConstants::default())
    }

    /// Gain XP and level up if the threshold is reached
    ///
    /// XP is cumulative and never spent. Only one level-up happens per call unless
    /// `carry_over_levels` is set.
    pub fn gain_xp_with(&mut self, amount: u32, constants: &ProgressionConstants) -> Vec<LevelUp> {
        self.progression.xp = self.progression.xp.saturating_add(amount);

        let mut level_ups = Vec::new();
        while self.progression.xp >= self.progression.xp_to_level {
            let threshold = self.progression.xp_to_level;
            level_ups.push(self.level_up_with(constants));
            // A threshold pinned at u32::MAX cannot rise any further
            if !constants.carry_over_levels || self.progression.xp_to_level <= threshold {
                break;
            }
        }
        level_ups
    }

    pub fn level_up(&mut self) -> LevelUp {
        self.level_up_with(&ProgressionConstants::default())
    }

    /// Advance one level: fixed gains, full restore, higher threshold, maybe evolve
    pub fn level_up_with(&mut self, constants: &ProgressionConstants) -> LevelUp {
        let (hp, mana, attack, defense) = level_gains(self.variant);
        self.progression.level += 1;
        self.stats.apply(Stat::MaxHp, hp as i32);
        self.stats.apply(Stat::MaxMana, mana as i32);
        self.stats.apply(Stat::Attack, attack as i32);
        self.stats.apply(Stat::Defense, defense as i32);
        self.stats.restore_all();

        self.progression.xp_to_level =
            next_threshold(self.progression.xp_to_level, constants.xp_growth);

        info!(
            combatant = %self.name,
            level = self.progression.level,
            xp_to_level = self.progression.xp_to_level,
            "Level up"
        );

        let evolution = evolution_tier(self.progression.level)
            .filter(|tier| *tier > self.progression.class_tier)
            .map(|tier| self.evolve(tier, constants));

        LevelUp {
            level: self.progression.level,
            hp_gain: hp,
            mana_gain: mana,
            attack_gain: attack,
            defense_gain: defense,
            evolution,
        }
    }

    /// Move to `tier`: percentage stat bonus, full restore, new title and skill
    fn evolve(&mut self, tier: u8, constants: &ProgressionConstants) -> Evolution {
        let bonus = |value: u32, fraction: f64| (value as f64 * fraction) as i32;

        let hp_bonus = bonus(self.stats.max_hp(), constants.evolution_vitals_bonus);
        let mana_bonus = bonus(self.stats.max_mana(), constants.evolution_vitals_bonus);
        let attack_bonus = bonus(self.stats.attack(), constants.evolution_combat_bonus);
        let defense_bonus = bonus(self.stats.defense(), constants.evolution_combat_bonus);

        self.stats.apply(Stat::MaxHp, hp_bonus);
        self.stats.apply(Stat::MaxMana, mana_bonus);
        self.stats.apply(Stat::Attack, attack_bonus);
        self.stats.apply(Stat::Defense, defense_bonus);
        self.stats.restore_all();

        let title = class_title(self.variant, tier).to_string();
        let skill = tier_skill(self.variant, tier).map(str::to_string);

        self.progression.class_tier = tier;
        self.progression.class_title = title.clone();
        if let Some(skill) = &skill {
            self.progression.skills.push(skill.clone());
        }

        info!(combatant = %self.name, tier, title = %title, ?skill, "Class evolution");

        Evolution { tier, title, skill }
    }
}
