use crate::generator::LootGenerator;
use crate::inventory::Inventory;
use crate::item::Item;
use crate::types::Quality;
use crate::{GeneratorError, InventoryError, ShopError};
use rand::Rng;
use tables_core::Weighted;
use tracing::{debug, info};

/// Most items a shop ever stocks
pub const MAX_STOCK: usize = 10;
/// Luck beyond this no longer improves stock quality
pub const MAX_LUCK_BOOST: i32 = 20;
/// Gold charged for restocking on demand
pub const REFRESH_COST: u32 = 20;

/// Quality weights (common, uncommon, rare) for merchant stock
pub fn quality_weights(luck: i32) -> [u32; 3] {
    let boost = (luck.clamp(0, MAX_LUCK_BOOST) / 2) as u32;
    if luck > 10 {
        [50 - boost, 30, 20 + boost]
    } else {
        [70 - boost, 25, 5 + boost]
    }
}

/// Number of items stocked at `level`
pub fn stock_size(level: u32) -> usize {
    MAX_STOCK.min(3 + level as usize / 2)
}

/// Merchant with level- and luck-dependent stock
#[derive(Debug, Clone)]
pub struct Shop {
    level: u32,
    luck: i32,
    stock: Vec<Item>,
}

impl Shop {
    /// Open a shop and fill its stock
    pub fn new<R: Rng + ?Sized>(
        generator: &LootGenerator,
        level: u32,
        luck: i32,
        rng: &mut R,
    ) -> Result<Self, GeneratorError> {
        let mut shop = Shop {
            level,
            luck,
            stock: Vec::new(),
        };
        shop.refresh(generator, rng)?;
        Ok(shop)
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn luck(&self) -> i32 {
        self.luck
    }

    pub fn stock(&self) -> &[Item] {
        &self.stock
    }

    /// Replace the whole stock with freshly generated items
    pub fn refresh<R: Rng + ?Sized>(
        &mut self,
        generator: &LootGenerator,
        rng: &mut R,
    ) -> Result<(), GeneratorError> {
        self.stock = self.generate_stock(generator, rng)?;
        Ok(())
    }

    /// Restock at the player's request for [`REFRESH_COST`] gold, returning the price paid
    ///
    /// Gold is checked before anything is rolled. Gold and stock are left untouched on failure.
    pub fn refresh_paid<R: Rng + ?Sized>(
        &mut self,
        generator: &LootGenerator,
        inventory: &mut Inventory,
        rng: &mut R,
    ) -> Result<u32, ShopError> {
        if inventory.gold < REFRESH_COST {
            return Err(ShopError::InsufficientGold {
                need: REFRESH_COST,
                have: inventory.gold,
            });
        }

        let stock = self.generate_stock(generator, rng)?;
        inventory.spend_gold(REFRESH_COST)?;
        self.stock = stock;

        info!(price = REFRESH_COST, "Paid for a restock");
        Ok(REFRESH_COST)
    }

    fn generate_stock<R: Rng + ?Sized>(
        &self,
        generator: &LootGenerator,
        rng: &mut R,
    ) -> Result<Vec<Item>, GeneratorError> {
        let qualities = Weighted::from_pairs(
            "shop_quality",
            [Quality::Common, Quality::Uncommon, Quality::Rare]
                .into_iter()
                .zip(quality_weights(self.luck)),
        );

        let mut stock = Vec::with_capacity(stock_size(self.level));
        for _ in 0..stock_size(self.level) {
            let item_type = generator.roll_shop_type(self.level, rng)?;
            let quality = qualities.roll(self.level, rng).copied().unwrap_or(Quality::Common);
            stock.push(generator.build(item_type, self.level, quality, rng));
        }

        debug!(level = self.level, luck = self.luck, count = stock.len(), "Shop restocked");
        Ok(stock)
    }

    /// Buy the item at `index`, returning the price paid
    ///
    /// Gold, stock and inventory are all left untouched on failure.
    pub fn buy(&mut self, index: usize, inventory: &mut Inventory) -> Result<u32, ShopError> {
        let price = self
            .stock
            .get(index)
            .map(|item| item.value)
            .ok_or(ShopError::InvalidIndex {
                index,
                len: self.stock.len(),
            })?;

        if inventory.gold < price {
            return Err(ShopError::InsufficientGold {
                need: price,
                have: inventory.gold,
            });
        }
        if inventory.is_full() {
            return Err(ShopError::InventoryFull);
        }

        let item = self.stock.remove(index);
        let name = item.name.clone();
        inventory.add(item).map_err(|_| ShopError::InventoryFull)?;
        inventory.spend_gold(price)?;

        info!(item = %name, price, "Bought item");
        Ok(price)
    }

    /// Sell the inventory item at `index` for half its value (at least 1 gold)
    ///
    /// The sold item leaves the game.
    pub fn sell(&mut self, index: usize, inventory: &mut Inventory) -> Result<u32, ShopError> {
        let item = inventory.remove(index).map_err(|e| match e {
            InventoryError::InvalidIndex { index, len } => ShopError::InvalidIndex { index, len },
            other => ShopError::Inventory(other),
        })?;
        let price = sell_price(&item);
        inventory.add_gold(price);

        info!(item = %item.name, price, "Sold item");
        Ok(price)
    }
}

/// Gold paid for selling `item`
pub fn sell_price(item: &Item) -> u32 {
    (item.value / 2).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PotionSize;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn shop(level: u32, luck: i32, seed: u64) -> Shop {
        let generator = LootGenerator::builtin().unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Shop::new(&generator, level, luck, &mut rng).unwrap()
    }

    #[test]
    fn test_stock_size_by_level() {
        assert_eq!(stock_size(1), 3);
        assert_eq!(stock_size(4), 5);
        assert_eq!(stock_size(14), 10);
        assert_eq!(stock_size(40), 10);
        assert_eq!(shop(6, 0, 1).stock().len(), 6);
    }

    #[test]
    fn test_quality_weights_by_luck() {
        assert_eq!(quality_weights(0), [70, 25, 5]);
        assert_eq!(quality_weights(-5), [70, 25, 5]);
        assert_eq!(quality_weights(10), [65, 25, 10]);
        assert_eq!(quality_weights(11), [45, 30, 25]);
        assert_eq!(quality_weights(99), [40, 30, 30]);
    }

    #[test]
    fn test_buy_moves_item_and_gold() {
        let mut shop = shop(2, 0, 3);
        let mut inventory = Inventory::default();
        let price = shop.stock()[0].value;
        let name = shop.stock()[0].name.clone();
        inventory.add_gold(price + 5);

        assert_eq!(shop.buy(0, &mut inventory).unwrap(), price);
        assert_eq!(inventory.gold, 5);
        assert_eq!(inventory.items()[0].name, name);
        assert_eq!(shop.stock().len(), 3);
    }

    #[test]
    fn test_failed_buy_changes_nothing() {
        let mut shop = shop(2, 0, 4);
        let before = shop.stock().to_vec();

        let mut poor = Inventory::default();
        assert!(matches!(
            shop.buy(0, &mut poor),
            Err(ShopError::InsufficientGold { .. })
        ));

        let mut full = Inventory::new(1);
        full.add(Item::strength_elixir()).unwrap();
        full.add_gold(10_000);
        assert!(matches!(shop.buy(0, &mut full), Err(ShopError::InventoryFull)));
        assert_eq!(full.gold, 10_000);
        assert_eq!(full.len(), 1);

        assert!(matches!(
            shop.buy(99, &mut full),
            Err(ShopError::InvalidIndex { index: 99, .. })
        ));
        assert_eq!(shop.stock(), before.as_slice());
    }

    #[test]
    fn test_paid_refresh_restocks_for_twenty_gold() {
        let generator = LootGenerator::builtin().unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let mut shop = Shop::new(&generator, 4, 0, &mut rng).unwrap();
        let before = shop.stock().to_vec();
        let mut inventory = Inventory::default();
        inventory.add_gold(25);

        assert_eq!(shop.refresh_paid(&generator, &mut inventory, &mut rng).unwrap(), 20);
        assert_eq!(inventory.gold, 5);
        assert_eq!(shop.stock().len(), 5);
        assert_ne!(shop.stock(), before.as_slice());
    }

    #[test]
    fn test_paid_refresh_without_gold_changes_nothing() {
        let generator = LootGenerator::builtin().unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut shop = Shop::new(&generator, 2, 0, &mut rng).unwrap();
        let before = shop.stock().to_vec();
        let mut inventory = Inventory::default();
        inventory.add_gold(19);

        assert!(matches!(
            shop.refresh_paid(&generator, &mut inventory, &mut rng),
            Err(ShopError::InsufficientGold { need: 20, have: 19 })
        ));
        assert_eq!(inventory.gold, 19);
        assert_eq!(shop.stock(), before.as_slice());
    }

    #[test]
    fn test_failed_restock_keeps_gold() {
        let generator = LootGenerator::builtin().unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(10);
        let mut shop = Shop::new(&generator, 2, 0, &mut rng).unwrap();
        let before = shop.stock().to_vec();

        // Nothing in this shop table is available below level 50
        let mut registry = tables_core::TableRegistry::builtin().unwrap();
        registry
            .load_str(
                "[table]\nid = \"shop\"\n\n[[entries]]\nid = \"weapon\"\nmin_level = 50\n",
                std::path::Path::new("shop.toml"),
            )
            .unwrap();
        let late = LootGenerator::new(&registry).unwrap();
        let mut inventory = Inventory::default();
        inventory.add_gold(100);

        assert!(matches!(
            shop.refresh_paid(&late, &mut inventory, &mut rng),
            Err(ShopError::Generator(GeneratorError::NothingToRoll { .. }))
        ));
        assert_eq!(inventory.gold, 100);
        assert_eq!(shop.stock(), before.as_slice());
    }

    #[test]
    fn test_sell_pays_half_with_floor() {
        let mut shop = shop(1, 0, 5);
        let mut inventory = Inventory::default();
        inventory.add(Item::health_potion(PotionSize::Medium)).unwrap();
        inventory.add(Item::weapon("Twig", 1, 1)).unwrap();

        assert_eq!(shop.sell(0, &mut inventory).unwrap(), 15);
        assert_eq!(shop.sell(0, &mut inventory).unwrap(), 1);
        assert_eq!(inventory.gold, 16);
        assert!(inventory.is_empty());
        assert!(shop.sell(0, &mut inventory).is_err());
    }

    #[test]
    fn test_luck_raises_rare_share() {
        let generator = LootGenerator::builtin().unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(77);
        let lucky = Weighted::from_pairs(
            "q",
            [Quality::Common, Quality::Uncommon, Quality::Rare]
                .into_iter()
                .zip(quality_weights(20)),
        );
        let rare = (0..20_000)
            .filter(|_| lucky.roll(1, &mut rng) == Some(&Quality::Rare))
            .count() as f64
            / 20_000.0;
        assert!((rare - 0.30).abs() < 0.02, "rare share {}", rare);

        let mut shop = Shop::new(&generator, 3, 20, &mut rng).unwrap();
        shop.refresh(&generator, &mut rng).unwrap();
        assert_eq!(shop.stock().len(), 4);
    }
}
