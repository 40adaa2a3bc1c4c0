//! Monster and villain spawning

use crate::combatant::Combatant;
use crate::config::CombatConstants;
use crate::dice::Roller;
use crate::stats::Stats;
use crate::types::{MonsterKind, Variant, VillainKind};
use crate::SpawnError;
use loot_core::Stat;
use rand::Rng;
use tables_core::{Area, AreaTable, TableRegistry, Weighted};
use tracing::debug;

/// Chance that an unforced encounter is a boss
pub const BOSS_CHANCE: f64 = 0.1;
/// Dragons only turn up for bosses from this level on
pub const DRAGON_MIN_LEVEL: u32 = 5;
/// Chance a qualifying boss encounter is a dragon
pub const DRAGON_CHANCE: f64 = 0.3;

pub const VILLAIN_NAMES: [&str; 10] = [
    "Grimshade",
    "Doomfang",
    "Nightblade",
    "Shadowreaper",
    "Vileblood",
    "Bonecrush",
    "Deathwhisper",
    "Stormbane",
    "Dreadlord",
    "Netherclaw",
];

pub fn monster_name(kind: MonsterKind, is_boss: bool) -> &'static str {
    match (kind, is_boss) {
        (MonsterKind::Slime, false) => "Slime",
        (MonsterKind::Slime, true) => "King Slime",
        (MonsterKind::Goblin, false) => "Goblin",
        (MonsterKind::Goblin, true) => "Goblin Chieftain",
        (MonsterKind::Skeleton, false) => "Skeleton",
        (MonsterKind::Skeleton, true) => "Skeleton Lord",
        (MonsterKind::Vampire, false) => "Vampire",
        (MonsterKind::Vampire, true) => "Vampire Lord",
        (MonsterKind::Dragon, _) => "Dragon",
    }
}

fn scale(value: u32, factor: f64) -> u32 {
    (value as f64 * factor) as u32
}

/// Build a monster of `kind` at `level`
///
/// Dragons are always bosses. Only the gold reward is random.
pub fn monster<R: Roller + ?Sized>(
    kind: MonsterKind,
    level: u32,
    is_boss: bool,
    rng: &mut R,
) -> Combatant {
    let is_boss = is_boss || kind == MonsterKind::Dragon;

    let mut hp = 50 + level * 10;
    let mut mana = 30 + level * 5;
    let mut attack = 15 + level * 2;
    let mut defense = 8 + level;
    if is_boss {
        hp = scale(hp, 1.5);
        mana = scale(mana, 1.5);
        attack = scale(attack, 1.3);
        defense = scale(defense, 1.3);
    }

    match kind {
        MonsterKind::Slime => {
            hp += 10;
            attack = attack.saturating_sub(2);
        }
        MonsterKind::Goblin => {
            attack += 4;
            defense = defense.saturating_sub(2);
            hp = hp.saturating_sub(10);
        }
        MonsterKind::Skeleton => {
            hp = hp.saturating_sub(15);
            defense += 3;
        }
        MonsterKind::Dragon => {
            hp = scale(hp, 1.2);
            attack += 8;
            defense += 5;
        }
        MonsterKind::Vampire => {}
    }

    let mut gold = level * 10 + rng.roll_range(5, 20).max(0) as u32;
    if is_boss {
        gold = scale(gold, 2.5);
    }

    let mut monster = Combatant::new(
        monster_name(kind, is_boss),
        Variant::Monster(kind),
        Stats::new(hp, mana, attack, defense),
    );
    monster.progression.level = level;
    monster.is_boss = is_boss;
    monster.gold_reward = gold;
    monster
}

/// Whether the player gets away from an encounter
///
/// A failed escape means the monster attacks: the caller must start the fight.
pub fn try_flee<R: Roller + ?Sized>(constants: &CombatConstants, rng: &mut R) -> bool {
    let escaped = rng.check(constants.escape_chance);
    debug!(escaped, "Flee attempt");
    escaped
}

/// Picks monsters for hunting encounters
#[derive(Debug, Clone)]
pub struct MonsterSpawner {
    pool: Weighted<MonsterKind>,
    areas: AreaTable,
}

impl MonsterSpawner {
    /// Spawner using the registry's `monsters` table and the given hunting areas
    pub fn new(registry: &TableRegistry, areas: AreaTable) -> Result<Self, SpawnError> {
        Ok(MonsterSpawner {
            pool: registry.typed("monsters", |id| id.parse().ok())?,
            areas,
        })
    }

    pub fn builtin() -> Result<Self, SpawnError> {
        let registry = TableRegistry::builtin()?;
        Self::new(&registry, AreaTable::builtin()?)
    }

    pub fn areas(&self) -> &AreaTable {
        &self.areas
    }

    /// Hunting areas open at `player_level`
    pub fn available_areas(&self, player_level: u32) -> impl Iterator<Item = &Area> {
        self.areas.unlocked(player_level)
    }

    /// Monster for one encounter in the area `area_id`
    ///
    /// The area fixes the monster level and whether the encounter is a forced boss; the
    /// player's level only decides whether the area is open.
    pub fn spawn_in_area<R: Rng + ?Sized>(
        &self,
        area_id: &str,
        player_level: u32,
        rng: &mut R,
    ) -> Result<Combatant, SpawnError> {
        let area = self
            .areas
            .get(area_id)
            .ok_or_else(|| SpawnError::UnknownArea(area_id.to_string()))?;
        if !area.is_unlocked(player_level) {
            return Err(SpawnError::AreaLocked {
                area: area.name.clone(),
                unlock_level: area.unlock_level,
                player_level,
            });
        }

        debug!(area = %area.name, level = area.level, boss = area.boss, "Hunting");
        self.get_monster_by_level(area.level, area.boss, rng)
    }

    /// Kinds that can appear at `level` outside the dragon roll
    pub fn available(&self, level: u32) -> impl Iterator<Item = &MonsterKind> {
        self.pool.available(level)
    }

    /// Monster suited to `level`
    ///
    /// Unforced encounters are bosses 10% of the time. A boss at level 5 or above is a dragon
    /// 30% of the time; otherwise the kind comes from the level-gated pool.
    pub fn get_monster_by_level<R: Rng + ?Sized>(
        &self,
        level: u32,
        force_boss: bool,
        rng: &mut R,
    ) -> Result<Combatant, SpawnError> {
        let is_boss = force_boss || rng.check(BOSS_CHANCE);

        let kind = if level >= DRAGON_MIN_LEVEL && is_boss && rng.check(DRAGON_CHANCE) {
            MonsterKind::Dragon
        } else {
            *self
                .pool
                .roll(level, rng)
                .ok_or(SpawnError::NothingToSpawn { level })?
        };

        let monster = monster(kind, level, is_boss, rng);
        debug!(
            name = %monster.name,
            level,
            is_boss,
            hp = monster.stats.max_hp(),
            gold = monster.gold_reward,
            "Spawned monster"
        );
        Ok(monster)
    }
}

/// A random villain matched to `player_level`
///
/// Each level above the first adds a random amount to every stat; the villain starts at full
/// hp and mana.
pub fn spawn_villain<R: Roller + ?Sized>(player_level: u32, rng: &mut R) -> Combatant {
    let kinds = VillainKind::all();
    let kind = kinds[rng.roll_index(kinds.len())];
    let name = VILLAIN_NAMES[rng.roll_index(VILLAIN_NAMES.len())];

    let mut villain = Combatant::villain(name, kind);
    for _ in 1..player_level {
        villain.stats.apply(Stat::MaxHp, rng.roll_range(10, 15));
        villain.stats.apply(Stat::MaxMana, rng.roll_range(5, 10));
        villain.stats.apply(Stat::Attack, rng.roll_range(2, 3));
        villain.stats.apply(Stat::Defense, rng.roll_range(1, 2));
    }
    villain.stats.restore_all();
    villain.progression.level = player_level.max(1);

    debug!(name, kind = %villain.variant, level = villain.level(), "Spawned villain");
    villain
}
