//! Per-actor state: plots, pens, compost, buffers, and statistics.
//!
//! These are plain data structures. The rules that move them forward in
//! time live in `estate-farm`; this module only guards the invariants
//! that belong to the data itself (buffer stacking, plot emptiness).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{CropKind, PenKind};
use crate::enums::{ResourceKind, ToolKind};

/// Hard upper bound on the number of crop plots per actor.
pub const MAX_PLOTS: usize = 180;

/// Maximum fodder a single pen can hold.
pub const MAX_FODDER: u32 = 640;

/// Compost progress at which one boost unit is produced.
pub const COMPOST_THRESHOLD: u32 = 100;

// ---------------------------------------------------------------------------
// Resource buffers
// ---------------------------------------------------------------------------

/// A counted quantity of one resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceStack {
    /// Resource held.
    pub kind: ResourceKind,
    /// Units held. Never zero inside a buffer.
    pub count: u32,
}

impl ResourceStack {
    /// Create a stack.
    pub const fn new(kind: ResourceKind, count: u32) -> Self {
        Self { kind, count }
    }
}

/// An ordered, bounded list of resource stacks.
///
/// Adding a resource first tops up existing stacks of the same kind to
/// their stack cap, then opens new stacks. Once `max_stacks` stacks exist,
/// anything that does not fit is dropped and reported to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceBuffer {
    stacks: Vec<ResourceStack>,
    max_stacks: usize,
}

impl ResourceBuffer {
    /// Create an empty buffer holding at most `max_stacks` stacks.
    pub const fn with_limit(max_stacks: usize) -> Self {
        Self {
            stacks: Vec::new(),
            max_stacks,
        }
    }

    /// Add `count` units of `kind`. Returns the number of units dropped
    /// because the buffer was full.
    pub fn add(&mut self, kind: ResourceKind, count: u32) -> u32 {
        let cap = kind.max_stack();
        let mut remaining = count;

        for stack in self.stacks.iter_mut().filter(|s| s.kind == kind) {
            if remaining == 0 {
                break;
            }
            let moved = cap.saturating_sub(stack.count).min(remaining);
            stack.count = stack.count.saturating_add(moved);
            remaining = remaining.saturating_sub(moved);
        }

        while remaining > 0 {
            if self.stacks.len() >= self.max_stacks {
                return remaining;
            }
            let moved = remaining.min(cap);
            self.stacks.push(ResourceStack::new(kind, moved));
            remaining = remaining.saturating_sub(moved);
        }
        0
    }

    /// Add a stack. See [`ResourceBuffer::add`].
    pub fn add_stack(&mut self, stack: ResourceStack) -> u32 {
        self.add(stack.kind, stack.count)
    }

    /// Remove up to `max` units of `kind`, draining stacks from the back.
    /// Returns the number of units removed.
    pub fn take(&mut self, kind: ResourceKind, max: u32) -> u32 {
        let mut taken: u32 = 0;
        for stack in self.stacks.iter_mut().rev().filter(|s| s.kind == kind) {
            let want = max.saturating_sub(taken);
            if want == 0 {
                break;
            }
            let moved = stack.count.min(want);
            stack.count = stack.count.saturating_sub(moved);
            taken = taken.saturating_add(moved);
        }
        self.stacks.retain(|s| s.count > 0);
        taken
    }

    /// Remove and return the stack at `index`.
    pub fn remove(&mut self, index: usize) -> Option<ResourceStack> {
        (index < self.stacks.len()).then(|| self.stacks.remove(index))
    }

    /// Remove and return every stack for which `take` returns `true`.
    pub fn drain_where(
        &mut self,
        mut take: impl FnMut(&ResourceStack) -> bool,
    ) -> Vec<ResourceStack> {
        let (taken, kept): (Vec<_>, Vec<_>) = self.stacks.drain(..).partition(|s| take(s));
        self.stacks = kept;
        taken
    }

    /// Remove and return every stack.
    pub fn take_all(&mut self) -> Vec<ResourceStack> {
        core::mem::take(&mut self.stacks)
    }

    /// Total units of `kind` held.
    pub fn count_of(&self, kind: ResourceKind) -> u64 {
        self.stacks
            .iter()
            .filter(|s| s.kind == kind)
            .map(|s| u64::from(s.count))
            .sum()
    }

    /// Total units held across all stacks.
    pub fn total_units(&self) -> u64 {
        self.stacks.iter().map(|s| u64::from(s.count)).sum()
    }

    /// The stacks, in insertion order.
    pub fn stacks(&self) -> &[ResourceStack] {
        &self.stacks
    }

    /// Number of stacks held.
    pub fn len(&self) -> usize {
        self.stacks.len()
    }

    /// Whether the buffer holds nothing.
    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }

    /// Maximum number of stacks.
    pub const fn max_stacks(&self) -> usize {
        self.max_stacks
    }
}

// ---------------------------------------------------------------------------
// Plots
// ---------------------------------------------------------------------------

/// A single crop plot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plot {
    /// Crop currently planted, if any.
    pub crop: Option<CropKind>,
    /// Ticks of growth accumulated since planting.
    pub growth_progress: u32,
    /// Number of times this plot has been harvested.
    pub harvest_count: u32,
    /// Whether the plot has been planted.
    pub planted: bool,
}

impl Plot {
    /// Whether nothing is growing here.
    pub const fn is_empty(&self) -> bool {
        !self.planted || self.crop.is_none()
    }

    /// Whether the crop has finished growing.
    pub const fn is_ready(&self) -> bool {
        match self.crop {
            Some(crop) if self.planted => self.growth_progress >= crop.growth_time(),
            _ => false,
        }
    }

    /// Whether a crop is planted and still growing.
    pub const fn is_growing(&self) -> bool {
        !self.is_empty() && !self.is_ready()
    }

    /// Growth time of the planted crop.
    pub const fn growth_time(&self) -> Option<u32> {
        match self.crop {
            Some(crop) if self.planted => Some(crop.growth_time()),
            _ => None,
        }
    }

    /// Plant `crop` with zero progress.
    pub const fn plant(&mut self, crop: CropKind) {
        self.crop = Some(crop);
        self.planted = true;
        self.growth_progress = 0;
    }

    /// Remove the crop. Progress is always reset with it.
    pub const fn clear(&mut self) {
        self.crop = None;
        self.planted = false;
        self.growth_progress = 0;
    }
}

// ---------------------------------------------------------------------------
// Pens
// ---------------------------------------------------------------------------

/// A tool equipped in a pen, with wear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolStack {
    /// Tool kind.
    pub kind: ToolKind,
    /// Uses consumed so far.
    pub durability_used: u32,
}

impl ToolStack {
    /// A fresh, unworn tool.
    pub const fn new(kind: ToolKind) -> Self {
        Self {
            kind,
            durability_used: 0,
        }
    }

    /// Whether the tool has worn out.
    pub const fn is_broken(self) -> bool {
        self.durability_used >= self.kind.max_durability()
    }
}

/// An owned production pen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pen {
    /// Pen kind.
    pub kind: PenKind,
    /// Fodder units stocked.
    pub fodder: u32,
    /// Equipped tool, if any.
    pub tool: Option<ToolStack>,
    /// Units produced over the pen's lifetime.
    pub total_produced: u64,
    /// Whether the pen can produce at all.
    pub constructed: bool,
    /// Construction units invested so far.
    pub invested_units: u32,
}

impl Pen {
    /// A freshly unlocked pen. Constructed unless its kind needs building.
    pub const fn new(kind: PenKind) -> Self {
        Self {
            kind,
            fodder: 0,
            tool: None,
            total_produced: 0,
            constructed: !kind.requires_construction(),
            invested_units: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Compost
// ---------------------------------------------------------------------------

/// The compost bin. Turns organic resource units into stored boosts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Compost {
    /// Organic units waiting to be composted.
    pub resource_units: u32,
    /// Progress toward the next boost, `0..=COMPOST_THRESHOLD`.
    pub progress: u32,
    /// Boost units ready for use.
    pub stored_boost: u32,
}

// ---------------------------------------------------------------------------
// Actor
// ---------------------------------------------------------------------------

/// Lifetime counters. Never decrease.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorStats {
    /// Crops harvested.
    pub total_harvested: u64,
    /// Experience-style reward points earned from harvesting.
    pub total_boost_earned: u64,
    /// Currency earned from harvest rewards and sales.
    pub total_currency_earned: u64,
}

/// Values a brand-new actor starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActorDefaults {
    /// Starting currency balance.
    pub starting_balance: u64,
    /// Plots unlocked at creation.
    pub starting_plots: usize,
    /// Stack limit of each output buffer.
    pub buffer_stack_limit: usize,
    /// Most fodder a pen may hold.
    pub max_fodder: u32,
}

impl Default for ActorDefaults {
    fn default() -> Self {
        Self {
            starting_balance: 1000,
            starting_plots: 3,
            buffer_stack_limit: 270,
            max_fodder: MAX_FODDER,
        }
    }
}

/// Complete simulation state of one actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorState {
    /// Internal currency balance. Ignored while an external ledger is active.
    pub balance: u64,
    /// All plots, locked ones included. Always `MAX_PLOTS` long.
    pub plots: Vec<Plot>,
    /// Number of leading plots that are usable.
    pub unlocked_plots: usize,
    /// Owned pens.
    pub pens: BTreeMap<PenKind, Pen>,
    /// Pen production waiting to be collected.
    pub output_buffer: ResourceBuffer,
    /// Harvested crops waiting to be collected.
    pub crop_output_buffer: ResourceBuffer,
    /// Compost bin.
    pub compost: Compost,
    /// Harvest ready plots automatically during growth passes.
    pub auto_harvest: bool,
    /// Refill pen fodder from the crop buffer before production.
    pub auto_feed: bool,
    /// Lifetime counters.
    pub stats: ActorStats,
}

impl ActorState {
    /// A fresh actor.
    pub fn new(defaults: &ActorDefaults) -> Self {
        Self {
            balance: defaults.starting_balance,
            plots: vec![Plot::default(); MAX_PLOTS],
            unlocked_plots: defaults.starting_plots.min(MAX_PLOTS),
            pens: BTreeMap::new(),
            output_buffer: ResourceBuffer::with_limit(defaults.buffer_stack_limit),
            crop_output_buffer: ResourceBuffer::with_limit(defaults.buffer_stack_limit),
            compost: Compost::default(),
            auto_harvest: false,
            auto_feed: false,
            stats: ActorStats::default(),
        }
    }

    /// The usable plots.
    pub fn unlocked(&self) -> &[Plot] {
        self.plots.get(..self.unlocked_plots).unwrap_or(self.plots.as_slice())
    }

    /// The usable plots, mutably.
    pub fn unlocked_mut(&mut self) -> &mut [Plot] {
        let end = self.unlocked_plots.min(self.plots.len());
        self.plots.get_mut(..end).unwrap_or_default()
    }

    /// Whether the actor owns a pen of `kind`.
    pub fn owns_pen(&self, kind: PenKind) -> bool {
        self.pens.contains_key(&kind)
    }
}

impl Default for ActorState {
    fn default() -> Self {
        Self::new(&ActorDefaults::default())
    }
}
