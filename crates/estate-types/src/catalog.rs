//! Static catalog of crop kinds and pen kinds.
//!
//! Both catalogs are closed enumerations. Each variant carries an
//! immutable constant record that the growth and production engines read;
//! nothing here is mutated at runtime.

use serde::{Deserialize, Serialize};

use crate::enums::{PenCategory, ResourceKind, ToolKind};

// ---------------------------------------------------------------------------
// Crops
// ---------------------------------------------------------------------------

/// Immutable parameters of a crop kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropSpec {
    /// Human-readable name.
    pub display_name: &'static str,
    /// Resource consumed (conceptually) to plant the crop.
    pub seed: ResourceKind,
    /// Resource produced on harvest.
    pub output: ResourceKind,
    /// Number of visual growth stages.
    pub stage_count: u32,
    /// Units of `output` yielded per harvest.
    pub base_yield: u32,
    /// Currency cost to unlock the crop for planting.
    pub unlock_cost: u64,
    /// Ticks of growth needed before the crop is ready.
    pub growth_time: u32,
}

/// A plantable crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CropKind {
    /// Wheat.
    Wheat,
    /// Carrot.
    Carrot,
    /// Potato.
    Potato,
    /// Beetroot.
    Beetroot,
    /// Melon.
    Melon,
    /// Pumpkin.
    Pumpkin,
    /// Nether wart.
    NetherWart,
}

impl CropKind {
    /// Every crop kind, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Wheat,
        Self::Carrot,
        Self::Potato,
        Self::Beetroot,
        Self::Melon,
        Self::Pumpkin,
        Self::NetherWart,
    ];

    /// The constant record for this crop.
    pub const fn spec(self) -> CropSpec {
        match self {
            Self::Wheat => CropSpec {
                display_name: "Wheat",
                seed: ResourceKind::WheatSeeds,
                output: ResourceKind::Wheat,
                stage_count: 8,
                base_yield: 5,
                unlock_cost: 100,
                growth_time: 600,
            },
            Self::Carrot => CropSpec {
                display_name: "Carrot",
                seed: ResourceKind::Carrot,
                output: ResourceKind::Carrot,
                stage_count: 8,
                base_yield: 3,
                unlock_cost: 150,
                growth_time: 800,
            },
            Self::Potato => CropSpec {
                display_name: "Potato",
                seed: ResourceKind::Potato,
                output: ResourceKind::Potato,
                stage_count: 8,
                base_yield: 4,
                unlock_cost: 150,
                growth_time: 800,
            },
            Self::Beetroot => CropSpec {
                display_name: "Beetroot",
                seed: ResourceKind::BeetrootSeeds,
                output: ResourceKind::Beetroot,
                stage_count: 4,
                base_yield: 2,
                unlock_cost: 200,
                growth_time: 1000,
            },
            Self::Melon => CropSpec {
                display_name: "Melon",
                seed: ResourceKind::MelonSeeds,
                output: ResourceKind::MelonSlice,
                stage_count: 8,
                base_yield: 4,
                unlock_cost: 300,
                growth_time: 1200,
            },
            Self::Pumpkin => CropSpec {
                display_name: "Pumpkin",
                seed: ResourceKind::PumpkinSeeds,
                output: ResourceKind::Pumpkin,
                stage_count: 1,
                base_yield: 1,
                unlock_cost: 300,
                growth_time: 1200,
            },
            Self::NetherWart => CropSpec {
                display_name: "Nether Wart",
                seed: ResourceKind::NetherWart,
                output: ResourceKind::NetherWart,
                stage_count: 4,
                base_yield: 3,
                unlock_cost: 500,
                growth_time: 1500,
            },
        }
    }

    /// Ticks of growth needed before the crop is ready.
    pub const fn growth_time(self) -> u32 {
        self.spec().growth_time
    }

    /// Persisted name of the crop (e.g. `"NETHER_WART"`).
    pub const fn name(self) -> &'static str {
        match self {
            Self::Wheat => "WHEAT",
            Self::Carrot => "CARROT",
            Self::Potato => "POTATO",
            Self::Beetroot => "BEETROOT",
            Self::Melon => "MELON",
            Self::Pumpkin => "PUMPKIN",
            Self::NetherWart => "NETHER_WART",
        }
    }

    /// Look up a crop by its persisted name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl core::fmt::Display for CropKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.spec().display_name)
    }
}

// ---------------------------------------------------------------------------
// Loot
// ---------------------------------------------------------------------------

/// What an equipped tool must be for a tool-gated loot entry to drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolRequirement {
    /// Exactly shears.
    Shears,
    /// Any tool of the sword family.
    AnySword,
    /// Exactly the given tool.
    Exact(ToolKind),
}

impl ToolRequirement {
    /// Whether `tool` satisfies this requirement.
    pub const fn is_satisfied_by(self, tool: ToolKind) -> bool {
        match self {
            Self::Shears => matches!(tool, ToolKind::Shears),
            Self::AnySword => tool.is_sword(),
            Self::Exact(required) => required as u8 == tool as u8,
        }
    }
}

/// One row of a pen's loot table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LootEntry {
    /// Resource dropped.
    pub resource: ResourceKind,
    /// Minimum units per cycle.
    pub min_count: u32,
    /// Maximum units per cycle (inclusive).
    pub max_count: u32,
    /// Tool needed for this entry to drop at all.
    pub required_tool: Option<ToolRequirement>,
    /// Whether a successful roll wears the equipped tool.
    pub consumes_tool: bool,
}

impl LootEntry {
    /// An entry that drops without any tool.
    const fn plain(resource: ResourceKind, min_count: u32, max_count: u32) -> Self {
        Self {
            resource,
            min_count,
            max_count,
            required_tool: None,
            consumes_tool: false,
        }
    }

    /// An entry that needs `tool` and wears it on every roll.
    const fn gated(
        resource: ResourceKind,
        min_count: u32,
        max_count: u32,
        tool: ToolRequirement,
    ) -> Self {
        Self {
            resource,
            min_count,
            max_count,
            required_tool: Some(tool),
            consumes_tool: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Pens
// ---------------------------------------------------------------------------

/// Immutable parameters of a pen kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PenSpec {
    /// Human-readable name.
    pub display_name: &'static str,
    /// Display grouping.
    pub category: PenCategory,
    /// Currency cost to unlock the pen.
    pub unlock_cost: u64,
    /// Resource eaten each production cycle, if any.
    pub fodder: Option<ResourceKind>,
    /// Fodder units eaten each production cycle.
    pub fodder_per_cycle: u32,
    /// Independent loot rolls made each production cycle.
    pub loot: &'static [LootEntry],
    /// Units that must be invested before the pen is constructed.
    pub construction_units: u32,
}

/// A production pen kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PenKind {
    /// Sheep pasture.
    Sheep,
    /// Cow pasture.
    Cow,
    /// Chicken coop.
    Chicken,
    /// Spider dungeon.
    Spider,
    /// Zombie dungeon.
    Zombie,
    /// Skeleton dungeon.
    Skeleton,
    /// Iron golem foundry.
    IronGolem,
}

const SHEEP_LOOT: &[LootEntry] = &[
    LootEntry::gated(ResourceKind::WhiteWool, 1, 3, ToolRequirement::Shears),
    LootEntry::plain(ResourceKind::Mutton, 1, 2),
];

const COW_LOOT: &[LootEntry] = &[
    LootEntry::plain(ResourceKind::Leather, 1, 2),
    LootEntry::plain(ResourceKind::Beef, 1, 3),
];

const CHICKEN_LOOT: &[LootEntry] = &[
    LootEntry::plain(ResourceKind::Feather, 0, 2),
    LootEntry::plain(ResourceKind::Chicken, 1, 1),
    LootEntry::plain(ResourceKind::Egg, 1, 1),
];

const SPIDER_LOOT: &[LootEntry] = &[
    LootEntry::plain(ResourceKind::SpiderString, 0, 2),
    LootEntry::gated(ResourceKind::SpiderEye, 0, 1, ToolRequirement::AnySword),
];

const ZOMBIE_LOOT: &[LootEntry] = &[
    LootEntry::plain(ResourceKind::RottenFlesh, 0, 2),
    LootEntry::gated(ResourceKind::IronIngot, 0, 1, ToolRequirement::AnySword),
];

const SKELETON_LOOT: &[LootEntry] = &[
    LootEntry::plain(ResourceKind::Bone, 0, 2),
    LootEntry::plain(ResourceKind::Arrow, 0, 2),
];

const IRON_GOLEM_LOOT: &[LootEntry] = &[
    LootEntry::plain(ResourceKind::IronIngot, 3, 5),
    LootEntry::plain(ResourceKind::Poppy, 0, 2),
];

impl PenKind {
    /// Every pen kind, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Sheep,
        Self::Cow,
        Self::Chicken,
        Self::Spider,
        Self::Zombie,
        Self::Skeleton,
        Self::IronGolem,
    ];

    /// The constant record for this pen.
    pub const fn spec(self) -> PenSpec {
        match self {
            Self::Sheep => PenSpec {
                display_name: "Sheep Pen",
                category: PenCategory::Pasture,
                unlock_cost: 5000,
                fodder: Some(ResourceKind::Wheat),
                fodder_per_cycle: 10,
                loot: SHEEP_LOOT,
                construction_units: 0,
            },
            Self::Cow => PenSpec {
                display_name: "Cow Pen",
                category: PenCategory::Pasture,
                unlock_cost: 7500,
                fodder: Some(ResourceKind::Wheat),
                fodder_per_cycle: 10,
                loot: COW_LOOT,
                construction_units: 0,
            },
            Self::Chicken => PenSpec {
                display_name: "Chicken Coop",
                category: PenCategory::Pasture,
                unlock_cost: 3000,
                fodder: Some(ResourceKind::WheatSeeds),
                fodder_per_cycle: 5,
                loot: CHICKEN_LOOT,
                construction_units: 0,
            },
            Self::Spider => PenSpec {
                display_name: "Spider Dungeon",
                category: PenCategory::Dungeon,
                unlock_cost: 10_000,
                fodder: Some(ResourceKind::RottenFlesh),
                fodder_per_cycle: 20,
                loot: SPIDER_LOOT,
                construction_units: 0,
            },
            Self::Zombie => PenSpec {
                display_name: "Zombie Dungeon",
                category: PenCategory::Dungeon,
                unlock_cost: 10_000,
                fodder: Some(ResourceKind::RottenFlesh),
                fodder_per_cycle: 20,
                loot: ZOMBIE_LOOT,
                construction_units: 0,
            },
            Self::Skeleton => PenSpec {
                display_name: "Skeleton Dungeon",
                category: PenCategory::Dungeon,
                unlock_cost: 12_000,
                fodder: Some(ResourceKind::Bone),
                fodder_per_cycle: 25,
                loot: SKELETON_LOOT,
                construction_units: 0,
            },
            Self::IronGolem => PenSpec {
                display_name: "Iron Foundry",
                category: PenCategory::Foundry,
                unlock_cost: 100_000,
                fodder: None,
                fodder_per_cycle: 0,
                loot: IRON_GOLEM_LOOT,
                construction_units: 4,
            },
        }
    }

    /// Whether the pen must be constructed before it produces.
    pub const fn requires_construction(self) -> bool {
        self.spec().construction_units > 0
    }

    /// Persisted name of the pen (e.g. `"IRON_GOLEM"`).
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sheep => "SHEEP",
            Self::Cow => "COW",
            Self::Chicken => "CHICKEN",
            Self::Spider => "SPIDER",
            Self::Zombie => "ZOMBIE",
            Self::Skeleton => "SKELETON",
            Self::IronGolem => "IRON_GOLEM",
        }
    }

    /// Look up a pen by its persisted name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl core::fmt::Display for PenKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.spec().display_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crop_names_round_trip() {
        for crop in CropKind::ALL {
            assert_eq!(CropKind::from_name(crop.name()), Some(crop));
        }
        assert_eq!(CropKind::from_name("CACTUS"), None);
    }

    #[test]
    fn pen_names_round_trip() {
        for pen in PenKind::ALL {
            assert_eq!(PenKind::from_name(pen.name()), Some(pen));
        }
        assert_eq!(PenKind::from_name("WITHER"), None);
    }

    #[test]
    fn every_crop_grows_and_yields() {
        for crop in CropKind::ALL {
            let spec = crop.spec();
            assert!(spec.growth_time > 0, "{crop} has no growth time");
            assert!(spec.base_yield > 0, "{crop} yields nothing");
            assert!(spec.stage_count > 0, "{crop} has no stages");
        }
    }

    #[test]
    fn wheat_matches_catalog() {
        let spec = CropKind::Wheat.spec();
        assert_eq!(spec.growth_time, 600);
        assert_eq!(spec.base_yield, 5);
        assert_eq!(spec.output, ResourceKind::Wheat);
    }

    #[test]
    fn loot_ranges_are_ordered() {
        for pen in PenKind::ALL {
            for entry in pen.spec().loot {
                assert!(entry.min_count <= entry.max_count, "{pen}: {entry:?}");
            }
        }
    }

    #[test]
    fn only_foundry_needs_construction_and_no_fodder() {
        for pen in PenKind::ALL {
            let spec = pen.spec();
            if pen == PenKind::IronGolem {
                assert!(pen.requires_construction());
                assert!(spec.fodder.is_none());
            } else {
                assert!(!pen.requires_construction());
                assert!(spec.fodder.is_some());
                assert!(spec.fodder_per_cycle > 0);
            }
        }
    }

    #[test]
    fn any_sword_accepts_every_sword() {
        for tool in ToolKind::ALL {
            assert_eq!(ToolRequirement::AnySword.is_satisfied_by(tool), tool.is_sword());
        }
    }

    #[test]
    fn shears_requirement_is_exact() {
        assert!(ToolRequirement::Shears.is_satisfied_by(ToolKind::Shears));
        assert!(!ToolRequirement::Shears.is_satisfied_by(ToolKind::IronSword));
    }

    #[test]
    fn exact_requirement_rejects_other_swords() {
        let req = ToolRequirement::Exact(ToolKind::DiamondSword);
        assert!(req.is_satisfied_by(ToolKind::DiamondSword));
        assert!(!req.is_satisfied_by(ToolKind::IronSword));
    }

    #[test]
    fn sheep_wool_needs_shears() {
        let wool = PenKind::Sheep
            .spec()
            .loot
            .iter()
            .find(|e| e.resource == ResourceKind::WhiteWool)
            .copied();
        assert_eq!(
            wool.and_then(|e| e.required_tool),
            Some(ToolRequirement::Shears)
        );
    }
}
