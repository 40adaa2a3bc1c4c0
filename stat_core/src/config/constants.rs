//! Game constants configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::ConfigError;

/// Tunable game constants
///
/// Every section and field may be omitted from the TOML file; missing values take the
/// standard rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameConstants {
    #[serde(default)]
    pub combat: CombatConstants,
    #[serde(default)]
    pub progression: ProgressionConstants,
    #[serde(default)]
    pub policy: PolicyConstants,
    #[serde(default)]
    pub rewards: RewardConstants,
}

impl GameConstants {
    /// Load constants from a TOML file
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse and validate constants from TOML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let constants: GameConstants = toml::from_str(content)?;
        constants.validate()?;
        Ok(constants)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let chances = [
            ("combat.basic_dodge_chance", self.combat.basic_dodge_chance),
            ("combat.special_dodge_chance", self.combat.special_dodge_chance),
            ("combat.pierce_chance", self.combat.pierce_chance),
            ("combat.escape_chance", self.combat.escape_chance),
            ("policy.block_chance", self.policy.block_chance),
            ("policy.heal_chance", self.policy.heal_chance),
            ("policy.special_chance_healthy", self.policy.special_chance_healthy),
            ("policy.special_chance_wounded", self.policy.special_chance_wounded),
            ("rewards.loot_chance", self.rewards.loot_chance),
            ("rewards.villain_item_chance", self.rewards.villain_item_chance),
            ("rewards.villain_luck_chance", self.rewards.villain_luck_chance),
            ("rewards.defeat_gold_fraction", self.rewards.defeat_gold_fraction),
        ];
        for (name, value) in chances {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ValidationError(format!(
                    "{} must be between 0 and 1, got {}",
                    name, value
                )));
            }
        }

        let growth = self.progression.xp_growth;
        if growth.is_nan() || growth <= 1.0 {
            return Err(ConfigError::ValidationError(format!(
                "progression.xp_growth must be greater than 1, got {}",
                self.progression.xp_growth
            )));
        }
        if self.progression.starting_xp_to_level == 0 {
            return Err(ConfigError::ValidationError(
                "progression.starting_xp_to_level must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatConstants {
    /// Chance a dodging defender avoids a basic attack
    #[serde(default = "default_basic_dodge")]
    pub basic_dodge_chance: f64,
    /// Chance a dodging defender avoids a special attack
    #[serde(default = "default_special_dodge")]
    pub special_dodge_chance: f64,
    /// Chance the Archer's special ignores defense entirely
    #[serde(default = "default_pierce")]
    pub pierce_chance: f64,
    /// Fraction of incoming damage a Skeleton actually takes
    #[serde(default = "default_skeleton_factor")]
    pub skeleton_damage_factor: f64,
    /// Chance of running from an encounter before the fight starts
    #[serde(default = "default_escape")]
    pub escape_chance: f64,
}

impl Default for CombatConstants {
    fn default() -> Self {
        CombatConstants {
            basic_dodge_chance: default_basic_dodge(),
            special_dodge_chance: default_special_dodge(),
            pierce_chance: default_pierce(),
            skeleton_damage_factor: default_skeleton_factor(),
            escape_chance: default_escape(),
        }
    }
}

fn default_basic_dodge() -> f64 {
    0.4
}
fn default_special_dodge() -> f64 {
    0.3
}
fn default_pierce() -> f64 {
    0.3
}
fn default_skeleton_factor() -> f64 {
    0.75
}
fn default_escape() -> f64 {
    0.7
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionConstants {
    /// XP needed for the first level-up
    #[serde(default = "default_starting_xp")]
    pub starting_xp_to_level: u32,
    /// Threshold growth per level, truncated after each multiplication
    #[serde(default = "default_xp_growth")]
    pub xp_growth: f64,
    /// Keep levelling inside one `gain_xp` call while XP covers the next threshold
    #[serde(default)]
    pub carry_over_levels: bool,
    /// Fraction of max hp and max mana added on evolution
    #[serde(default = "default_evolution_vitals")]
    pub evolution_vitals_bonus: f64,
    /// Fraction of attack and defense added on evolution
    #[serde(default = "default_evolution_combat")]
    pub evolution_combat_bonus: f64,
}

impl Default for ProgressionConstants {
    fn default() -> Self {
        ProgressionConstants {
            starting_xp_to_level: default_starting_xp(),
            xp_growth: default_xp_growth(),
            carry_over_levels: false,
            evolution_vitals_bonus: default_evolution_vitals(),
            evolution_combat_bonus: default_evolution_combat(),
        }
    }
}

fn default_starting_xp() -> u32 {
    100
}
fn default_xp_growth() -> f64 {
    1.5
}
fn default_evolution_vitals() -> f64 {
    0.2
}
fn default_evolution_combat() -> f64 {
    0.15
}

/// Thresholds for the opponent decision policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyConstants {
    /// Below this hp fraction the opponent considers blocking
    #[serde(default = "default_desperate_hp")]
    pub desperate_hp: f64,
    #[serde(default = "default_block_chance")]
    pub block_chance: f64,
    /// Below this hp fraction a healer considers healing
    #[serde(default = "default_wounded_hp")]
    pub wounded_hp: f64,
    #[serde(default = "default_heal_chance")]
    pub heal_chance: f64,
    /// Above this hp fraction specials are used more often
    #[serde(default = "default_healthy_hp")]
    pub healthy_hp: f64,
    #[serde(default = "default_special_healthy")]
    pub special_chance_healthy: f64,
    #[serde(default = "default_special_wounded")]
    pub special_chance_wounded: f64,
    /// Mana a DarkMage keeps before casting its special
    #[serde(default = "default_dark_mage_mana")]
    pub dark_mage_mana: u32,
    #[serde(default = "default_dark_archer_mana")]
    pub dark_archer_mana: u32,
    #[serde(default = "default_mana_threshold")]
    pub default_mana: u32,
}

impl Default for PolicyConstants {
    fn default() -> Self {
        PolicyConstants {
            desperate_hp: default_desperate_hp(),
            block_chance: default_block_chance(),
            wounded_hp: default_wounded_hp(),
            heal_chance: default_heal_chance(),
            healthy_hp: default_healthy_hp(),
            special_chance_healthy: default_special_healthy(),
            special_chance_wounded: default_special_wounded(),
            dark_mage_mana: default_dark_mage_mana(),
            dark_archer_mana: default_dark_archer_mana(),
            default_mana: default_mana_threshold(),
        }
    }
}

fn default_desperate_hp() -> f64 {
    0.2
}
fn default_block_chance() -> f64 {
    0.7
}
fn default_wounded_hp() -> f64 {
    0.4
}
fn default_heal_chance() -> f64 {
    0.6
}
fn default_healthy_hp() -> f64 {
    0.7
}
fn default_special_healthy() -> f64 {
    0.6
}
fn default_special_wounded() -> f64 {
    0.4
}
fn default_dark_mage_mana() -> u32 {
    30
}
fn default_dark_archer_mana() -> u32 {
    25
}
fn default_mana_threshold() -> u32 {
    20
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardConstants {
    #[serde(default = "default_monster_xp")]
    pub monster_xp_per_level: u32,
    #[serde(default = "default_boss_xp_multiplier")]
    pub boss_xp_multiplier: u32,
    /// Drop chance after a non-boss monster
    #[serde(default = "default_loot_chance")]
    pub loot_chance: f64,
    #[serde(default = "default_villain_xp")]
    pub villain_xp_per_level: u32,
    #[serde(default = "default_villain_item_chance")]
    pub villain_item_chance: f64,
    #[serde(default = "default_villain_luck_chance")]
    pub villain_luck_chance: f64,
    /// Share of gold lost on defeat
    #[serde(default = "default_defeat_fraction")]
    pub defeat_gold_fraction: f64,
    #[serde(default = "default_defeat_cap")]
    pub defeat_gold_cap: u32,
}

impl Default for RewardConstants {
    fn default() -> Self {
        RewardConstants {
            monster_xp_per_level: default_monster_xp(),
            boss_xp_multiplier: default_boss_xp_multiplier(),
            loot_chance: default_loot_chance(),
            villain_xp_per_level: default_villain_xp(),
            villain_item_chance: default_villain_item_chance(),
            villain_luck_chance: default_villain_luck_chance(),
            defeat_gold_fraction: default_defeat_fraction(),
            defeat_gold_cap: default_defeat_cap(),
        }
    }
}

fn default_monster_xp() -> u32 {
    25
}
fn default_boss_xp_multiplier() -> u32 {
    2
}
fn default_loot_chance() -> f64 {
    0.6
}
fn default_villain_xp() -> u32 {
    50
}
fn default_villain_item_chance() -> f64 {
    0.7
}
fn default_villain_luck_chance() -> f64 {
    0.3
}
fn default_defeat_fraction() -> f64 {
    0.2
}
fn default_defeat_cap() -> u32 {
    50
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_file_gives_defaults() {
        let constants = GameConstants::parse("").unwrap();
        assert_eq!(constants, GameConstants::default());
        assert_eq!(constants.progression.starting_xp_to_level, 100);
        assert!(!constants.progression.carry_over_levels);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let constants = GameConstants::parse(
            r#"
[progression]
carry_over_levels = true

[policy]
block_chance = 0.9
"#,
        )
        .unwrap();

        assert!(constants.progression.carry_over_levels);
        assert_eq!(constants.progression.xp_growth, 1.5);
        assert_eq!(constants.policy.block_chance, 0.9);
        assert_eq!(constants.policy.heal_chance, 0.6);
        assert_eq!(constants.combat, CombatConstants::default());
    }

    #[test]
    fn test_out_of_range_chance_rejected() {
        let result = GameConstants::parse("[combat]\nbasic_dodge_chance = 1.5\n");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_escape_chance() {
        assert_eq!(GameConstants::default().combat.escape_chance, 0.7);
        let constants = GameConstants::parse("[combat]\nescape_chance = 0.25\n").unwrap();
        assert_eq!(constants.combat.escape_chance, 0.25);
        assert!(GameConstants::parse("[combat]\nescape_chance = -0.1\n").is_err());
    }

    #[test]
    fn test_flat_xp_growth_rejected() {
        for growth in ["1.0", "0.5", "nan"] {
            let result = GameConstants::parse(&format!(
                "[progression]\nxp_growth = {}\ncarry_over_levels = true\n",
                growth
            ));
            assert!(
                matches!(result, Err(ConfigError::ValidationError(_))),
                "growth {} accepted",
                growth
            );
        }
        assert!(GameConstants::parse("[progression]\nxp_growth = 1.1\n").is_ok());
    }

    #[test]
    fn test_starting_threshold_parsed() {
        let constants = GameConstants::parse("[progression]\nstarting_xp_to_level = 200\n").unwrap();
        assert_eq!(constants.progression.starting_xp_to_level, 200);
        assert!(GameConstants::parse("[progression]\nstarting_xp_to_level = 0\n").is_err());
    }

    #[test]
    fn test_load_from_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[rewards]\nmonster_xp_per_level = 40").unwrap();

        let constants = GameConstants::load_from_path(file.path()).unwrap();
        assert_eq!(constants.rewards.monster_xp_per_level, 40);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = GameConstants::load_from_path(Path::new("/definitely/not/here.toml"));
        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }
}
