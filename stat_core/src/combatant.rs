//! Combatant - a player character, villain or monster and everything it owns

use crate::config::ProgressionConstants;
use crate::equipment::Equipment;
use crate::progression::Progression;
use crate::stats::Stats;
use crate::types::{Archetype, MonsterKind, Variant, VillainKind};
use crate::ItemError;
use loot_core::inventory::PLAYER_CAPACITY;
use loot_core::{Applied, EquipmentSlot, Inventory, Item, ItemTarget, PotionSize};
use tracing::debug;

/// Gold in a fresh starter kit
pub const STARTER_GOLD: u32 = 50;

/// Temporary attack bonus from an elixir
///
/// Ticks once at the end of each owner turn, skipping the turn it was granted in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttackBoost {
    pub amount: u32,
    pub turns: u32,
    fresh: bool,
}

impl AttackBoost {
    pub fn is_active(&self) -> bool {
        self.turns > 0 && self.amount > 0
    }

    /// Bonus currently added to attack
    pub fn bonus(&self) -> u32 {
        if self.is_active() {
            self.amount
        } else {
            0
        }
    }

    fn grant(&mut self, amount: u32, turns: u32) {
        *self = AttackBoost {
            amount,
            turns,
            fresh: true,
        };
    }

    /// End-of-turn countdown; returns true when the boost just expired
    pub fn tick(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        if self.fresh {
            self.fresh = false;
            return false;
        }
        self.turns -= 1;
        if self.turns == 0 {
            self.amount = 0;
            return true;
        }
        false
    }
}

/// Anyone who takes part in combat
#[derive(Debug, Clone)]
pub struct Combatant {
    pub name: String,
    /// Display glyph, never read by game logic
    pub glyph: char,
    pub variant: Variant,
    pub stats: Stats,
    pub is_blocking: bool,
    pub is_dodging: bool,
    pub attack_boost: AttackBoost,
    pub progression: Progression,
    /// Hidden stat that biases shop quality
    pub luck: i32,
    /// Gold paid out when this combatant is defeated (monsters only)
    pub gold_reward: u32,
    pub is_boss: bool,
    pub inventory: Inventory,
    equipment: Equipment,
}

/// Starting hp, mana, attack and defense
fn base_stats(variant: Variant) -> Stats {
    let (hp, mana, attack, defense) = match variant {
        Variant::Generic => (100, 50, 20, 10),
        Variant::Player(Archetype::Barbarian) => (150, 30, 25, 8),
        Variant::Player(Archetype::Archer) => (90, 60, 22, 12),
        Variant::Player(Archetype::Mage) => (80, 120, 15, 5),
        Variant::Villain(VillainKind::DarkKnight) => (130, 40, 20, 20),
        Variant::Villain(VillainKind::DarkArcher) => (90, 70, 25, 8),
        Variant::Villain(VillainKind::DarkMage) => (85, 130, 15, 6),
        // Monsters get their stats from the spawner
        Variant::Monster(_) => (100, 50, 20, 10),
    };
    Stats::new(hp, mana, attack, defense)
}

fn glyph(variant: Variant) -> char {
    match variant {
        Variant::Generic | Variant::Player(_) => '@',
        Variant::Villain(_) => 'V',
        Variant::Monster(MonsterKind::Slime) => 's',
        Variant::Monster(MonsterKind::Goblin) => 'g',
        Variant::Monster(MonsterKind::Skeleton) => 'Z',
        Variant::Monster(MonsterKind::Dragon) => 'D',
        Variant::Monster(MonsterKind::Vampire) => 'v',
    }
}

/// Split borrow of a combatant's vitals, so an inventory item can act on its owner
struct Vitals<'a> {
    stats: &'a mut Stats,
    boost: &'a mut AttackBoost,
}

impl ItemTarget for Vitals<'_> {
    fn restore_hp(&mut self, amount: u32) -> u32 {
        self.stats.heal(amount)
    }

    fn restore_mana(&mut self, amount: u32) -> u32 {
        self.stats.restore_mana(amount)
    }

    fn grant_attack_boost(&mut self, amount: u32, turns: u32) {
        self.boost.grant(amount, turns);
    }
}

impl Combatant {
    /// Create a combatant with explicit stats
    pub fn new(name: impl Into<String>, variant: Variant, stats: Stats) -> Self {
        Combatant {
            name: name.into(),
            glyph: glyph(variant),
            variant,
            stats,
            is_blocking: false,
            is_dodging: false,
            attack_boost: AttackBoost::default(),
            progression: Progression::default(),
            luck: 0,
            gold_reward: 0,
            is_boss: false,
            inventory: Inventory::new(PLAYER_CAPACITY),
            equipment: Equipment::new(),
        }
    }

    pub fn player(name: impl Into<String>, archetype: Archetype) -> Self {
        Self::player_with(name, archetype, &ProgressionConstants::default())
    }

    /// A fresh player whose first XP threshold comes from `constants`
    pub fn player_with(
        name: impl Into<String>,
        archetype: Archetype,
        constants: &ProgressionConstants,
    ) -> Self {
        let variant = Variant::Player(archetype);
        let mut player = Self::new(name, variant, base_stats(variant));
        player.progression = Progression::with_constants(constants);
        player
    }

    pub fn generic(name: impl Into<String>) -> Self {
        Self::new(name, Variant::Generic, base_stats(Variant::Generic))
    }

    /// A level 1 villain; see `spawn::spawn_villain` for level scaling
    pub fn villain(name: impl Into<String>, kind: VillainKind) -> Self {
        let variant = Variant::Villain(kind);
        Self::new(name, variant, base_stats(variant))
    }

    /// Add the starter kit: one small health potion, one small mana potion and some gold
    pub fn with_starter_kit(mut self) -> Self {
        for item in [
            Item::health_potion(PotionSize::Small),
            Item::mana_potion(PotionSize::Small),
        ] {
            if let Err(e) = self.inventory.add(item) {
                debug!(error = %e, "Starter item did not fit");
            }
        }
        self.inventory.add_gold(STARTER_GOLD);
        self
    }

    pub fn level(&self) -> u32 {
        self.progression.level
    }

    pub fn is_alive(&self) -> bool {
        self.stats.is_alive()
    }

    /// Attack used in damage rolls: stat attack plus any active boost
    pub fn effective_attack(&self) -> u32 {
        self.stats.attack() + self.attack_boost.bonus()
    }

    pub fn equipment(&self) -> &Equipment {
        &self.equipment
    }

    /// Use the consumable at `index`; depleted items leave the inventory
    pub fn use_item(&mut self, index: usize) -> Result<Applied, ItemError> {
        let len = self.inventory.len();
        let item = self
            .inventory
            .get_mut(index)
            .ok_or(ItemError::InvalidIndex { index, len })?;

        let mut vitals = Vitals {
            stats: &mut self.stats,
            boost: &mut self.attack_boost,
        };
        let applied = item
            .use_on(&mut vitals)
            .ok_or_else(|| ItemError::NotUsable(item.name.clone()))?;

        let name = item.name.clone();
        if item.is_depleted() {
            self.inventory.remove(index)?;
        }

        debug!(combatant = %self.name, item = %name, ?applied, "Used item");
        Ok(applied)
    }

    /// Equip the gear at inventory `index`; a displaced item goes back to the inventory
    pub fn equip(&mut self, index: usize) -> Result<(), ItemError> {
        let item = self.inventory.get(index).ok_or(ItemError::InvalidIndex {
            index,
            len: self.inventory.len(),
        })?;
        if item.gear().is_none() {
            return Err(ItemError::NotGear(item.name.clone()));
        }

        let item = self.inventory.remove(index)?;
        if let Some(previous) = self.equipment.equip(item, &mut self.stats)? {
            // The slot freed by the removal guarantees room
            self.inventory.add(previous)?;
        }
        Ok(())
    }

    /// Move the item in `slot` back into the inventory
    pub fn unequip(&mut self, slot: EquipmentSlot) -> Result<(), ItemError> {
        if self.equipment.get(slot).is_none() {
            return Err(ItemError::EmptySlot(slot));
        }
        if self.inventory.is_full() {
            return Err(ItemError::InventoryFull);
        }

        if let Some(item) = self.equipment.unequip(slot, &mut self.stats) {
            self.inventory.add(item)?;
        }
        Ok(())
    }

    /// Place gear without applying its boosts (loading a saved character)
    pub(crate) fn restore_equipment(&mut self, item: Item) -> Result<(), ItemError> {
        self.equipment.restore(item)?;
        Ok(())
    }

    /// Restore hp and mana to their maximum
    pub fn rest(&mut self) {
        self.stats.restore_all();
    }

    /// Clear both combat stances, e.g. between encounters
    pub fn reset_stances(&mut self) {
        self.is_blocking = false;
        self.is_dodging = false;
    }
}

impl ItemTarget for Combatant {
    fn restore_hp(&mut self, amount: u32) -> u32 {
        self.stats.heal(amount)
    }

    fn restore_mana(&mut self, amount: u32) -> u32 {
        self.stats.restore_mana(amount)
    }

    fn grant_attack_boost(&mut self, amount: u32, turns: u32) {
        self.attack_boost.grant(amount, turns);
    }
}
