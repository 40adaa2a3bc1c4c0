//! Core types specific to stat_core

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Playable character classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Archetype {
    Barbarian,
    Archer,
    Mage,
}

impl Archetype {
    pub fn all() -> &'static [Archetype] {
        &[Archetype::Barbarian, Archetype::Archer, Archetype::Mage]
    }
}

/// Scripted story opponents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VillainKind {
    DarkKnight,
    DarkArcher,
    DarkMage,
}

impl VillainKind {
    pub fn all() -> &'static [VillainKind] {
        &[
            VillainKind::DarkKnight,
            VillainKind::DarkArcher,
            VillainKind::DarkMage,
        ]
    }
}

/// Procedurally spawned monsters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonsterKind {
    Slime,
    Goblin,
    Skeleton,
    Dragon,
    Vampire,
}

impl MonsterKind {
    pub fn all() -> &'static [MonsterKind] {
        &[
            MonsterKind::Slime,
            MonsterKind::Goblin,
            MonsterKind::Skeleton,
            MonsterKind::Dragon,
            MonsterKind::Vampire,
        ]
    }

    /// Id used by the `monsters` table
    pub fn key(&self) -> &'static str {
        match self {
            MonsterKind::Slime => "slime",
            MonsterKind::Goblin => "goblin",
            MonsterKind::Skeleton => "skeleton",
            MonsterKind::Dragon => "dragon",
            MonsterKind::Vampire => "vampire",
        }
    }
}

impl FromStr for MonsterKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MonsterKind::all()
            .iter()
            .copied()
            .find(|kind| kind.key() == s)
            .ok_or(())
    }
}

/// Every concrete kind of combatant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Plain character with no class
    Generic,
    Player(Archetype),
    Villain(VillainKind),
    Monster(MonsterKind),
}

impl Variant {
    pub fn all() -> Vec<Variant> {
        std::iter::once(Variant::Generic)
            .chain(Archetype::all().iter().map(|a| Variant::Player(*a)))
            .chain(VillainKind::all().iter().map(|v| Variant::Villain(*v)))
            .chain(MonsterKind::all().iter().map(|m| Variant::Monster(*m)))
            .collect()
    }

    /// Only Mage and DarkMage know the Heal action
    pub fn can_heal(&self) -> bool {
        matches!(
            self,
            Variant::Player(Archetype::Mage) | Variant::Villain(VillainKind::DarkMage)
        )
    }

    /// Villains and monsters swing normally when a special is unaffordable
    pub fn falls_back_to_attack(&self) -> bool {
        matches!(self, Variant::Villain(_) | Variant::Monster(_))
    }

    pub fn archetype(&self) -> Option<Archetype> {
        match self {
            Variant::Player(a) => Some(*a),
            _ => None,
        }
    }

    /// Stable persisted tag
    pub fn key(&self) -> &'static str {
        match self {
            Variant::Generic => "generic",
            Variant::Player(Archetype::Barbarian) => "barbarian",
            Variant::Player(Archetype::Archer) => "archer",
            Variant::Player(Archetype::Mage) => "mage",
            Variant::Villain(VillainKind::DarkKnight) => "dark_knight",
            Variant::Villain(VillainKind::DarkArcher) => "dark_archer",
            Variant::Villain(VillainKind::DarkMage) => "dark_mage",
            Variant::Monster(kind) => kind.key(),
        }
    }
}

impl FromStr for Variant {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Variant::all().into_iter().find(|v| v.key() == s).ok_or(())
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Variant::Generic => "Adventurer",
            Variant::Player(Archetype::Barbarian) => "Barbarian",
            Variant::Player(Archetype::Archer) => "Archer",
            Variant::Player(Archetype::Mage) => "Mage",
            Variant::Villain(VillainKind::DarkKnight) => "Dark Knight",
            Variant::Villain(VillainKind::DarkArcher) => "Dark Archer",
            Variant::Villain(VillainKind::DarkMage) => "Dark Mage",
            Variant::Monster(MonsterKind::Slime) => "Slime",
            Variant::Monster(MonsterKind::Goblin) => "Goblin",
            Variant::Monster(MonsterKind::Skeleton) => "Skeleton",
            Variant::Monster(MonsterKind::Dragon) => "Dragon",
            Variant::Monster(MonsterKind::Vampire) => "Vampire",
        };
        write!(f, "{}", name)
    }
}

/// One action chosen for a single turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Attack,
    SpecialAttack,
    Block,
    Dodge,
    /// Use the consumable at this inventory index
    UseItem { index: usize },
    Heal,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Attack => write!(f, "Attack"),
            Action::SpecialAttack => write!(f, "Special Attack"),
            Action::Block => write!(f, "Block"),
            Action::Dodge => write!(f, "Dodge"),
            Action::UseItem { index } => write!(f, "Use Item #{}", index),
            Action::Heal => write!(f, "Heal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_keys_are_unique() {
        let all = Variant::all();
        assert_eq!(all.len(), 12);
        for v in &all {
            assert_eq!(v.key().parse::<Variant>(), Ok(*v));
        }
    }

    #[test]
    fn test_only_mage_kinds_heal() {
        let healers: Vec<_> = Variant::all().into_iter().filter(|v| v.can_heal()).collect();
        assert_eq!(
            healers,
            vec![
                Variant::Player(Archetype::Mage),
                Variant::Villain(VillainKind::DarkMage)
            ]
        );
    }

    #[test]
    fn test_fallback_variants() {
        assert!(!Variant::Generic.falls_back_to_attack());
        assert!(!Variant::Player(Archetype::Archer).falls_back_to_attack());
        assert!(Variant::Villain(VillainKind::DarkKnight).falls_back_to_attack());
        assert!(Variant::Monster(MonsterKind::Slime).falls_back_to_attack());
    }
}
