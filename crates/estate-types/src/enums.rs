//! Enumeration types for the Pocket Estate simulation.
//!
//! Every resource and tool has a stable short identifier. Those
//! identifiers are what the save file and the configuration refer to, so
//! they must never change once released.

use serde::{Deserialize, Serialize};

/// Default maximum number of units in a single resource stack.
pub const DEFAULT_MAX_STACK: u32 = 64;

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

/// A resource produced, consumed, or sold by an estate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    // --- Crops and seeds ---
    /// Wheat, the output of wheat plots.
    Wheat,
    /// Seeds for wheat. Also chicken fodder.
    WheatSeeds,
    /// Carrots.
    Carrot,
    /// Potatoes.
    Potato,
    /// Beetroots.
    Beetroot,
    /// Seeds for beetroot.
    BeetrootSeeds,
    /// Melon slices, the output of melon plots.
    MelonSlice,
    /// Seeds for melons.
    MelonSeeds,
    /// Pumpkins.
    Pumpkin,
    /// Seeds for pumpkins.
    PumpkinSeeds,
    /// Nether wart.
    NetherWart,

    // --- Compost ---
    /// Bone meal, the stored growth boost produced by compost.
    BoneMeal,

    // --- Pasture drops ---
    /// White wool.
    WhiteWool,
    /// Raw mutton.
    Mutton,
    /// Leather.
    Leather,
    /// Raw beef.
    Beef,
    /// Feathers.
    Feather,
    /// Eggs.
    Egg,
    /// Raw chicken.
    Chicken,

    // --- Dungeon drops ---
    /// String dropped by spiders.
    #[serde(rename = "string")]
    SpiderString,
    /// Spider eyes.
    SpiderEye,
    /// Rotten flesh. Also dungeon fodder.
    RottenFlesh,
    /// Iron ingots.
    IronIngot,
    /// Bones. Also skeleton fodder.
    Bone,
    /// Arrows.
    Arrow,

    // --- Foundry ---
    /// Poppies dropped by iron golems.
    Poppy,
    /// Iron blocks, invested to construct a foundry.
    IronBlock,
}

impl ResourceKind {
    /// Every resource kind, in declaration order.
    pub const ALL: [Self; 27] = [
        Self::Wheat,
        Self::WheatSeeds,
        Self::Carrot,
        Self::Potato,
        Self::Beetroot,
        Self::BeetrootSeeds,
        Self::MelonSlice,
        Self::MelonSeeds,
        Self::Pumpkin,
        Self::PumpkinSeeds,
        Self::NetherWart,
        Self::BoneMeal,
        Self::WhiteWool,
        Self::Mutton,
        Self::Leather,
        Self::Beef,
        Self::Feather,
        Self::Egg,
        Self::Chicken,
        Self::SpiderString,
        Self::SpiderEye,
        Self::RottenFlesh,
        Self::IronIngot,
        Self::Bone,
        Self::Arrow,
        Self::Poppy,
        Self::IronBlock,
    ];

    /// Stable short identifier used in save files and configuration.
    pub const fn id(self) -> &'static str {
        match self {
            Self::Wheat => "wheat",
            Self::WheatSeeds => "wheat_seeds",
            Self::Carrot => "carrot",
            Self::Potato => "potato",
            Self::Beetroot => "beetroot",
            Self::BeetrootSeeds => "beetroot_seeds",
            Self::MelonSlice => "melon_slice",
            Self::MelonSeeds => "melon_seeds",
            Self::Pumpkin => "pumpkin",
            Self::PumpkinSeeds => "pumpkin_seeds",
            Self::NetherWart => "nether_wart",
            Self::BoneMeal => "bone_meal",
            Self::WhiteWool => "white_wool",
            Self::Mutton => "mutton",
            Self::Leather => "leather",
            Self::Beef => "beef",
            Self::Feather => "feather",
            Self::Egg => "egg",
            Self::Chicken => "chicken",
            Self::SpiderString => "string",
            Self::SpiderEye => "spider_eye",
            Self::RottenFlesh => "rotten_flesh",
            Self::IronIngot => "iron_ingot",
            Self::Bone => "bone",
            Self::Arrow => "arrow",
            Self::Poppy => "poppy",
            Self::IronBlock => "iron_block",
        }
    }

    /// Look up a resource by its short identifier.
    ///
    /// Returns `None` for identifiers this build does not know about.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }

    /// Maximum number of units that fit in a single buffer stack.
    pub const fn max_stack(self) -> u32 {
        match self {
            Self::Egg => 16,
            _ => DEFAULT_MAX_STACK,
        }
    }
}

impl core::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.id())
    }
}

// ---------------------------------------------------------------------------
// Tools
// ---------------------------------------------------------------------------

/// A tool that can be equipped in a production pen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    /// Shears, required to collect wool.
    Shears,
    /// Wooden sword.
    WoodenSword,
    /// Stone sword.
    StoneSword,
    /// Iron sword.
    IronSword,
    /// Golden sword.
    GoldenSword,
    /// Diamond sword.
    DiamondSword,
    /// Netherite sword.
    NetheriteSword,
}

impl ToolKind {
    /// Every tool kind, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Shears,
        Self::WoodenSword,
        Self::StoneSword,
        Self::IronSword,
        Self::GoldenSword,
        Self::DiamondSword,
        Self::NetheriteSword,
    ];

    /// Stable short identifier used in save files.
    pub const fn id(self) -> &'static str {
        match self {
            Self::Shears => "shears",
            Self::WoodenSword => "wooden_sword",
            Self::StoneSword => "stone_sword",
            Self::IronSword => "iron_sword",
            Self::GoldenSword => "golden_sword",
            Self::DiamondSword => "diamond_sword",
            Self::NetheriteSword => "netherite_sword",
        }
    }

    /// Look up a tool by its short identifier.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }

    /// Number of uses before the tool breaks.
    pub const fn max_durability(self) -> u32 {
        match self {
            Self::Shears => 238,
            Self::WoodenSword => 59,
            Self::StoneSword => 131,
            Self::IronSword => 250,
            Self::GoldenSword => 32,
            Self::DiamondSword => 1561,
            Self::NetheriteSword => 2031,
        }
    }

    /// Whether this tool belongs to the sword family.
    pub const fn is_sword(self) -> bool {
        !matches!(self, Self::Shears)
    }
}

impl core::fmt::Display for ToolKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.id())
    }
}

// ---------------------------------------------------------------------------
// Pen categories
// ---------------------------------------------------------------------------

/// Grouping of pen kinds, used for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PenCategory {
    /// Passive farm animals.
    Pasture,
    /// Hostile mob spawners.
    Dungeon,
    /// Constructed golems.
    Foundry,
}
