//! Sell prices for resources.
//!
//! A price of 0 means the resource cannot be sold.

use std::collections::BTreeMap;

use tracing::warn;

use estate_types::ResourceKind;

/// Looks up what a resource sells for.
pub trait Pricing: Send + Sync {
    /// Price of one unit of `kind`. Zero means unsellable.
    fn price(&self, kind: ResourceKind) -> u64;

    /// Price of `count` units of `kind`.
    fn value(&self, kind: ResourceKind, count: u32) -> u64 {
        self.price(kind).saturating_mul(u64::from(count))
    }
}

/// The built-in price list, with optional per-resource overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceTable {
    prices: BTreeMap<ResourceKind, u64>,
}

impl PriceTable {
    /// The default price list.
    pub fn standard() -> Self {
        use ResourceKind as R;

        let prices = [
            (R::Wheat, 5),
            (R::Carrot, 8),
            (R::Potato, 8),
            (R::Beetroot, 10),
            (R::MelonSlice, 3),
            (R::Pumpkin, 15),
            (R::NetherWart, 25),
            (R::WheatSeeds, 2),
            (R::BeetrootSeeds, 3),
            (R::MelonSeeds, 4),
            (R::PumpkinSeeds, 4),
            (R::WhiteWool, 15),
            (R::Leather, 25),
            (R::Beef, 20),
            (R::Egg, 10),
            (R::Chicken, 12),
            (R::Feather, 5),
            (R::Mutton, 18),
            (R::SpiderString, 12),
            (R::SpiderEye, 20),
            (R::RottenFlesh, 5),
            (R::Bone, 15),
            (R::Arrow, 8),
            (R::IronIngot, 50),
            (R::Poppy, 5),
            (R::IronBlock, 450),
        ];
        Self {
            prices: prices.into_iter().collect(),
        }
    }

    /// The default list with `overrides` applied. Unknown resource ids are
    /// logged and skipped.
    pub fn with_overrides(overrides: &BTreeMap<String, u64>) -> Self {
        let mut table = Self::standard();
        for (id, price) in overrides {
            match ResourceKind::from_id(id) {
                Some(kind) => {
                    table.prices.insert(kind, *price);
                }
                None => warn!(resource = %id, "Ignoring price override for unknown resource"),
            }
        }
        table
    }
}

impl Default for PriceTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl Pricing for PriceTable {
    fn price(&self, kind: ResourceKind) -> u64 {
        self.prices.get(&kind).copied().unwrap_or(0)
    }
}
