//! The on-disk document model.
//!
//! Field names are camelCase and catalog kinds are written as their stable
//! short identifiers, so the layout stays readable and survives catalog
//! reordering. Every field is optional on read: anything missing takes
//! its default, which lets older saves load after new counters are added.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use estate_types::{
    ActorDefaults, ActorState, ActorStats, COMPOST_THRESHOLD, Compost, CropKind, MAX_PLOTS, Pen,
    PenKind, Plot, ResourceBuffer, ResourceKind, ResourceStack, ToolKind, ToolStack,
};

/// One actor as stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActorDocument {
    /// Internal balance. Missing means the starting balance.
    pub balance: Option<u64>,
    /// Unlocked plot count. Missing means the starting count.
    pub unlocked_crop_slots: Option<usize>,
    /// Compost progress toward the next boost.
    pub compost_progress: u32,
    /// Organic units in the compost bin.
    pub compost_resources: u32,
    /// Stored boosts.
    pub stored_bonemeal: u32,
    /// Auto-harvest flag.
    pub auto_harvest: bool,
    /// Auto-feed flag.
    pub auto_feed_pens: bool,
    /// Lifetime harvested plots.
    pub total_crops_harvested: u64,
    /// Lifetime reward points.
    pub total_xp_earned: u64,
    /// Lifetime currency earned.
    pub total_money_earned: u64,
    /// Every plot, in order.
    pub crop_plots: Vec<PlotDocument>,
    /// Owned pens keyed by pen kind name.
    pub mob_pens: BTreeMap<String, PenDocument>,
    /// Pen output buffer.
    pub output_buffer: Vec<StackDocument>,
    /// Harvested crop buffer.
    pub crop_output_buffer: Vec<StackDocument>,
}

/// One plot as stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlotDocument {
    /// Whether a crop is planted.
    pub planted: bool,
    /// Growth ticks accumulated.
    pub growth_progress: u32,
    /// Times harvested.
    pub harvest_count: u32,
    /// Crop kind name, when planted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop_type: Option<String>,
}

/// One pen as stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PenDocument {
    /// Pen kind name.
    pub pen_type: String,
    /// Fodder stocked.
    pub fodder: u32,
    /// Reserved cycle progress. Always written as 0.
    pub progress: u32,
    /// Lifetime units produced.
    pub total_produced: u64,
    /// Whether construction is finished.
    pub constructed: bool,
    /// Construction units invested.
    pub iron_blocks: u32,
    /// Equipped tool.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool: Option<ToolDocument>,
}

/// An equipped tool as stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolDocument {
    /// Tool identifier.
    pub id: String,
    /// Uses consumed.
    pub damage: u32,
}

/// A buffered resource stack as stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackDocument {
    /// Resource identifier.
    pub id: String,
    /// Units in the stack.
    pub count: u32,
}

// ---------------------------------------------------------------------------
// State -> document
// ---------------------------------------------------------------------------

impl From<&ActorState> for ActorDocument {
    fn from(state: &ActorState) -> Self {
        Self {
            balance: Some(state.balance),
            unlocked_crop_slots: Some(state.unlocked_plots),
            compost_progress: state.compost.progress,
            compost_resources: state.compost.resource_units,
            stored_bonemeal: state.compost.stored_boost,
            auto_harvest: state.auto_harvest,
            auto_feed_pens: state.auto_feed,
            total_crops_harvested: state.stats.total_harvested,
            total_xp_earned: state.stats.total_boost_earned,
            total_money_earned: state.stats.total_currency_earned,
            crop_plots: state.plots.iter().map(PlotDocument::from).collect(),
            mob_pens: state
                .pens
                .iter()
                .map(|(kind, pen)| (kind.name().to_owned(), PenDocument::from(pen)))
                .collect(),
            output_buffer: stacks_to_documents(&state.output_buffer),
            crop_output_buffer: stacks_to_documents(&state.crop_output_buffer),
        }
    }
}

impl From<&Plot> for PlotDocument {
    fn from(plot: &Plot) -> Self {
        Self {
            planted: plot.planted,
            growth_progress: plot.growth_progress,
            harvest_count: plot.harvest_count,
            crop_type: plot.crop.map(|crop| crop.name().to_owned()),
        }
    }
}

impl From<&Pen> for PenDocument {
    fn from(pen: &Pen) -> Self {
        Self {
            pen_type: pen.kind.name().to_owned(),
            fodder: pen.fodder,
            progress: 0,
            total_produced: pen.total_produced,
            constructed: pen.constructed,
            iron_blocks: pen.invested_units,
            tool: pen.tool.map(|tool| ToolDocument {
                id: tool.kind.id().to_owned(),
                damage: tool.durability_used,
            }),
        }
    }
}

fn stacks_to_documents(buffer: &ResourceBuffer) -> Vec<StackDocument> {
    buffer
        .stacks()
        .iter()
        .map(|stack| StackDocument {
            id: stack.kind.id().to_owned(),
            count: stack.count,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Document -> state
// ---------------------------------------------------------------------------

impl ActorDocument {
    /// Rebuild an actor. Unknown kinds are dropped; everything else loads.
    pub fn into_state(self, defaults: &ActorDefaults) -> ActorState {
        let mut state = ActorState::new(defaults);

        if let Some(balance) = self.balance {
            state.balance = balance;
        }
        if let Some(unlocked) = self.unlocked_crop_slots {
            state.unlocked_plots = unlocked.min(MAX_PLOTS);
        }
        state.compost = Compost {
            resource_units: self.compost_resources,
            progress: self.compost_progress.min(COMPOST_THRESHOLD),
            stored_boost: self.stored_bonemeal,
        };
        state.auto_harvest = self.auto_harvest;
        state.auto_feed = self.auto_feed_pens;
        state.stats = ActorStats {
            total_harvested: self.total_crops_harvested,
            total_boost_earned: self.total_xp_earned,
            total_currency_earned: self.total_money_earned,
        };

        for (slot, plot) in state.plots.iter_mut().zip(self.crop_plots) {
            *slot = plot.into_plot();
        }

        for (key, pen) in self.mob_pens {
            if let Some(pen) = pen.into_pen(&key, defaults.max_fodder) {
                state.pens.insert(pen.kind, pen);
            }
        }

        fill_buffer(&mut state.output_buffer, self.output_buffer);
        fill_buffer(&mut state.crop_output_buffer, self.crop_output_buffer);
        state
    }
}

impl PlotDocument {
    fn into_plot(self) -> Plot {
        let crop = match self.crop_type.as_deref() {
            Some(name) => {
                let crop = CropKind::from_name(name);
                if crop.is_none() {
                    debug!(crop = name, "Dropping plot with unknown crop kind");
                }
                crop
            }
            None => None,
        };
        match crop {
            Some(crop) if self.planted => Plot {
                crop: Some(crop),
                growth_progress: self.growth_progress.min(crop.growth_time()),
                harvest_count: self.harvest_count,
                planted: true,
            },
            _ => Plot {
                harvest_count: self.harvest_count,
                ..Plot::default()
            },
        }
    }
}

impl PenDocument {
    fn into_pen(self, key: &str, max_fodder: u32) -> Option<Pen> {
        let Some(kind) = PenKind::from_name(&self.pen_type).or_else(|| PenKind::from_name(key))
        else {
            debug!(pen = key, "Dropping pen with unknown kind");
            return None;
        };

        let mut pen = Pen::new(kind);
        if kind.spec().fodder.is_some() {
            pen.fodder = self.fodder.min(max_fodder);
        }
        pen.total_produced = self.total_produced;
        pen.invested_units = self.iron_blocks;
        pen.constructed = self.constructed || !kind.requires_construction();
        pen.tool = self.tool.and_then(|tool| match ToolKind::from_id(&tool.id) {
            Some(tool_kind) => Some(ToolStack {
                kind: tool_kind,
                durability_used: tool.damage,
            }),
            None => {
                debug!(pen = %kind, tool = %tool.id, "Dropping unknown tool");
                None
            }
        });
        Some(pen)
    }
}

fn fill_buffer(buffer: &mut ResourceBuffer, stacks: Vec<StackDocument>) {
    for stack in stacks {
        match ResourceKind::from_id(&stack.id) {
            Some(kind) => {
                buffer.add_stack(ResourceStack::new(kind, stack.count));
            }
            None => debug!(resource = %stack.id, "Dropping stack with unknown resource"),
        }
    }
}
