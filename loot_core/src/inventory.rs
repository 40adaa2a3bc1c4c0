use crate::item::Item;
use crate::InventoryError;
use serde::{Deserialize, Serialize};

/// Capacity of a player character's inventory
pub const PLAYER_CAPACITY: usize = 10;

/// Ordered, capacity-bounded item list plus the owner's gold
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    items: Vec<Item>,
    capacity: usize,
    pub gold: u32,
}

impl Default for Inventory {
    fn default() -> Self {
        Inventory::new(PLAYER_CAPACITY)
    }
}

impl Inventory {
    pub fn new(capacity: usize) -> Self {
        Inventory {
            items: Vec::new(),
            capacity,
            gold: 0,
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Item> {
        self.items.get_mut(index)
    }

    /// Append an item; a full inventory hands the item back inside the error
    pub fn add(&mut self, item: Item) -> Result<(), InventoryError> {
        if self.is_full() {
            return Err(InventoryError::Full {
                item: Box::new(item),
            });
        }
        self.items.push(item);
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<Item, InventoryError> {
        if index >= self.items.len() {
            return Err(InventoryError::InvalidIndex {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }

    /// Indices of usable consumables, in inventory order
    pub fn consumable_indices(&self) -> Vec<usize> {
        self.indices_where(|item| item.is_consumable() && !item.is_depleted())
    }

    /// Indices of equippable gear, in inventory order
    pub fn gear_indices(&self) -> Vec<usize> {
        self.indices_where(|item| item.gear().is_some())
    }

    fn indices_where(&self, pred: impl Fn(&Item) -> bool) -> Vec<usize> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| pred(item))
            .map(|(i, _)| i)
            .collect()
    }

    pub fn add_gold(&mut self, amount: u32) {
        self.gold = self.gold.saturating_add(amount);
    }

    /// Deduct gold; nothing changes when the balance is too low
    pub fn spend_gold(&mut self, amount: u32) -> Result<(), InventoryError> {
        if self.gold < amount {
            return Err(InventoryError::InsufficientGold {
                need: amount,
                have: self.gold,
            });
        }
        self.gold -= amount;
        Ok(())
    }

    /// Remove up to `amount` gold, returning what was actually lost
    pub fn lose_gold(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.gold);
        self.gold -= lost;
        lost
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PotionSize;

    #[test]
    fn test_add_rejects_when_full() {
        let mut inventory = Inventory::new(2);
        inventory.add(Item::health_potion(PotionSize::Small)).unwrap();
        inventory.add(Item::mana_potion(PotionSize::Small)).unwrap();
        assert!(inventory.is_full());

        match inventory.add(Item::strength_elixir()) {
            Err(InventoryError::Full { item }) => assert_eq!(item.name, "Strength Elixir"),
            other => panic!("Expected full inventory, got {:?}", other),
        }
        assert_eq!(inventory.len(), 2);
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut inventory = Inventory::default();
        assert!(matches!(
            inventory.remove(0),
            Err(InventoryError::InvalidIndex { index: 0, len: 0 })
        ));
    }

    #[test]
    fn test_spend_gold_is_all_or_nothing() {
        let mut inventory = Inventory::default();
        inventory.add_gold(30);

        assert!(inventory.spend_gold(31).is_err());
        assert_eq!(inventory.gold, 30);
        inventory.spend_gold(30).unwrap();
        assert_eq!(inventory.gold, 0);
    }

    #[test]
    fn test_index_helpers() {
        let mut inventory = Inventory::default();
        inventory.add(Item::weapon("Bow", 20, 3)).unwrap();
        inventory.add(Item::health_potion(PotionSize::Large)).unwrap();

        assert_eq!(inventory.gear_indices(), vec![0]);
        assert_eq!(inventory.consumable_indices(), vec![1]);
    }

    #[test]
    fn test_lose_gold_floors_at_zero() {
        let mut inventory = Inventory::default();
        inventory.add_gold(12);
        assert_eq!(inventory.lose_gold(50), 12);
        assert_eq!(inventory.gold, 0);
    }
}
