//! Post-combat rewards and penalties
//!
//! Rewards are computed first and claimed separately, so a caller can show them before they
//! land. Nothing here runs inside [`Combat`](crate::combat::Combat).

use crate::combatant::Combatant;
use crate::config::{ProgressionConstants, RewardConstants};
use crate::dice::Roller;
use crate::progression::LevelUp;
use crate::stats::Stats;
use loot_core::{GeneratorError, InventoryError, Item, LootGenerator};
use rand::Rng;
use tracing::info;

/// Extra gold per player level for beating a boss challenge
pub const BOSS_BONUS_GOLD: (i32, i32) = (50, 100);
/// Boss challenge loot is generated this many levels above the player
pub const BOSS_BONUS_LEVELS: u32 = 2;
pub const BOSS_BONUS_LUCK: (i32, i32) = (2, 5);
/// Villain gold per villain level
pub const VILLAIN_GOLD: (i32, i32) = (20, 40);
pub const VILLAIN_LUCK: (i32, i32) = (1, 2);
/// Share of max hp and mana a defeated player wakes up with
pub const REVIVE_FRACTION: f64 = 0.5;

/// Spoils of one victory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reward {
    pub xp: u32,
    pub gold: u32,
    pub luck: i32,
    pub items: Vec<Item>,
}

/// What claiming a reward changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Claimed {
    pub level_ups: Vec<LevelUp>,
    /// Items that did not fit in the inventory
    pub left_behind: Vec<Item>,
}

fn roll_u32<R: Rng + ?Sized>(band: (i32, i32), rng: &mut R) -> u32 {
    rng.roll_range(band.0, band.1).max(0) as u32
}

/// Reward for a defeated monster
///
/// XP is `level × 25`, doubled for bosses. Loot drops 60% of the time and always from bosses,
/// generated at the player's level.
pub fn monster_reward<R: Rng + ?Sized>(
    monster: &Combatant,
    player_level: u32,
    generator: &LootGenerator,
    constants: &RewardConstants,
    rng: &mut R,
) -> Result<Reward, GeneratorError> {
    let mut xp = monster.level() * constants.monster_xp_per_level;
    if monster.is_boss {
        xp *= constants.boss_xp_multiplier;
    }

    let mut items = Vec::new();
    if monster.is_boss || rng.check(constants.loot_chance) {
        items.push(generator.generate(player_level, monster.is_boss, rng)?);
    }

    Ok(Reward {
        xp,
        gold: monster.gold_reward,
        luck: 0,
        items,
    })
}

/// Bonus on top of [`monster_reward`] for winning a boss challenge
pub fn boss_bonus<R: Rng + ?Sized>(
    player_level: u32,
    generator: &LootGenerator,
    rng: &mut R,
) -> Result<Reward, GeneratorError> {
    let gold = roll_u32(BOSS_BONUS_GOLD, rng) * player_level;
    let item = generator.generate(player_level + BOSS_BONUS_LEVELS, true, rng)?;
    let luck = rng.roll_range(BOSS_BONUS_LUCK.0, BOSS_BONUS_LUCK.1);

    Ok(Reward {
        xp: 0,
        gold,
        luck,
        items: vec![item],
    })
}

/// Default reward for a defeated villain
pub fn villain_reward<R: Rng + ?Sized>(
    villain: &Combatant,
    player_level: u32,
    generator: &LootGenerator,
    constants: &RewardConstants,
    rng: &mut R,
) -> Result<Reward, GeneratorError> {
    let level = villain.level();
    let xp = constants.villain_xp_per_level * level;
    let gold = roll_u32(VILLAIN_GOLD, rng) * level;

    let mut items = Vec::new();
    if rng.check(constants.villain_item_chance) {
        items.push(generator.generate(player_level, false, rng)?);
    }

    let luck = if rng.check(constants.villain_luck_chance) {
        rng.roll_range(VILLAIN_LUCK.0, VILLAIN_LUCK.1)
    } else {
        0
    };

    Ok(Reward {
        xp,
        gold,
        luck,
        items,
    })
}

impl Reward {
    /// Fold two rewards into one
    pub fn merge(mut self, other: Reward) -> Reward {
        self.xp += other.xp;
        self.gold += other.gold;
        self.luck += other.luck;
        self.items.extend(other.items);
        self
    }

    /// Hand the reward to `player`: XP, gold, luck, then items in order
    pub fn claim(self, player: &mut Combatant, progression: &ProgressionConstants) -> Claimed {
        let level_ups = player.gain_xp_with(self.xp, progression);
        player.inventory.add_gold(self.gold);
        player.luck += self.luck;

        let mut left_behind = Vec::new();
        for item in self.items {
            if let Err(InventoryError::Full { item }) = player.inventory.add(item) {
                left_behind.push(*item);
            }
        }

        info!(
            player = %player.name,
            xp = self.xp,
            gold = self.gold,
            luck = self.luck,
            left_behind = left_behind.len(),
            "Reward claimed"
        );

        Claimed {
            level_ups,
            left_behind,
        }
    }
}

/// Gold a defeat costs: a share of the purse, capped
pub fn defeat_gold_loss(gold: u32, constants: &RewardConstants) -> u32 {
    ((gold as f64 * constants.defeat_gold_fraction) as u32).min(constants.defeat_gold_cap)
}

/// Apply a defeat: lose gold, then wake up at half hp and mana (at least 1 each)
///
/// Returns the gold lost.
pub fn defeat_penalty(player: &mut Combatant, constants: &RewardConstants) -> u32 {
    let lost = player
        .inventory
        .lose_gold(defeat_gold_loss(player.inventory.gold, constants));

    let revive = |max: u32| ((max as f64 * REVIVE_FRACTION) as u32).max(1);
    let stats = &player.stats;
    player.stats = Stats::from_parts(
        revive(stats.max_hp()),
        stats.max_hp(),
        revive(stats.max_mana()),
        stats.max_mana(),
        stats.attack(),
        stats.defense(),
    );
    player.reset_stances();

    info!(player = %player.name, lost, "Defeated");
    lost
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spawn::{monster, spawn_villain};
    use crate::types::{Archetype, MonsterKind};
    use loot_core::Inventory;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn generator() -> LootGenerator {
        LootGenerator::builtin().unwrap()
    }

    #[test]
    fn test_monster_xp_and_gold() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let goblin = monster(MonsterKind::Goblin, 3, false, &mut rng);
        let reward =
            monster_reward(&goblin, 3, &generator(), &RewardConstants::default(), &mut rng)
                .unwrap();
        assert_eq!(reward.xp, 75);
        assert_eq!(reward.gold, goblin.gold_reward);
        assert!(reward.items.len() <= 1);
    }

    #[test]
    fn test_bosses_always_drop_and_double_xp() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let gen = generator();
        for _ in 0..20 {
            let king = monster(MonsterKind::Slime, 2, true, &mut rng);
            let reward =
                monster_reward(&king, 2, &gen, &RewardConstants::default(), &mut rng).unwrap();
            assert_eq!(reward.xp, 100);
            assert_eq!(reward.items.len(), 1);
        }
    }

    #[test]
    fn test_loot_rate() {
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let gen = generator();
        let slime = monster(MonsterKind::Slime, 1, false, &mut rng);
        let drops = (0..2000)
            .filter(|_| {
                !monster_reward(&slime, 1, &gen, &RewardConstants::default(), &mut rng)
                    .unwrap()
                    .items
                    .is_empty()
            })
            .count();
        assert!((1100..1300).contains(&drops), "drops: {}", drops);
    }

    #[test]
    fn test_boss_bonus_ranges() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let bonus = boss_bonus(4, &generator(), &mut rng).unwrap();
        assert!((200..=400).contains(&bonus.gold));
        assert!((2..=5).contains(&bonus.luck));
        assert_eq!(bonus.items.len(), 1);
    }

    #[test]
    fn test_villain_reward() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let villain = spawn_villain(3, &mut rng);
        let reward =
            villain_reward(&villain, 3, &generator(), &RewardConstants::default(), &mut rng)
                .unwrap();
        assert_eq!(reward.xp, 150);
        assert!((60..=120).contains(&reward.gold));
        assert!((0..=2).contains(&reward.luck));
    }

    #[test]
    fn test_claim_keeps_overflow_aside() {
        let mut hero = Combatant::player("Robin", Archetype::Archer);
        hero.inventory = Inventory::new(1);
        let reward = Reward {
            xp: 100,
            gold: 30,
            luck: 2,
            items: vec![Item::strength_elixir(), Item::weapon("Bow", 10, 3)],
        };

        let claimed = reward.claim(&mut hero, &ProgressionConstants::default());
        assert_eq!(claimed.level_ups.len(), 1);
        assert_eq!(hero.level(), 2);
        assert_eq!(hero.inventory.gold, 30);
        assert_eq!(hero.luck, 2);
        assert_eq!(hero.inventory.len(), 1);
        assert_eq!(claimed.left_behind.len(), 1);
        assert_eq!(claimed.left_behind[0].name, "Bow");
    }

    #[test]
    fn test_merge() {
        let a = Reward {
            xp: 10,
            gold: 5,
            luck: 0,
            items: vec![Item::strength_elixir()],
        };
        let b = Reward {
            xp: 0,
            gold: 100,
            luck: 3,
            items: vec![Item::strength_elixir()],
        };
        let merged = a.merge(b);
        assert_eq!((merged.xp, merged.gold, merged.luck), (10, 105, 3));
        assert_eq!(merged.items.len(), 2);
    }

    #[test]
    fn test_defeat_penalty() {
        let constants = RewardConstants::default();
        assert_eq!(defeat_gold_loss(100, &constants), 20);
        assert_eq!(defeat_gold_loss(1000, &constants), 50);
        assert_eq!(defeat_gold_loss(4, &constants), 0);

        let mut hero = Combatant::player("Merlin", Archetype::Mage);
        hero.inventory.add_gold(120);
        hero.stats.take_damage(80);
        hero.stats.spend_mana(120);
        hero.is_blocking = true;

        assert_eq!(defeat_penalty(&mut hero, &constants), 24);
        assert_eq!(hero.inventory.gold, 96);
        assert_eq!((hero.stats.hp(), hero.stats.mana()), (40, 60));
        assert!(!hero.is_blocking);
    }
}
