//! Crop growth: planting, growth passes, boosts, and harvesting.
//!
//! Growth is driven externally: the scheduler calls [`advance`] once per
//! growth interval with the number of growth units to apply. Progress is
//! stored per plot and never exceeds the crop's growth time, so a ready
//! plot stays ready until it is harvested or cleared.

use tracing::debug;

use estate_types::{ActorState, CropKind, Plot, ResourceKind};

use crate::error::{FarmError, Result};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Divisor applied to a plot's remaining growth time when boosting.
pub const BOOST_DIVISOR: u32 = 4;

// ---------------------------------------------------------------------------
// HarvestYield
// ---------------------------------------------------------------------------

/// What one successful harvest produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarvestYield {
    /// Plot index harvested.
    pub index: usize,
    /// Crop harvested.
    pub crop: CropKind,
    /// Resource produced.
    pub resource: ResourceKind,
    /// Units produced.
    pub count: u32,
}

// ---------------------------------------------------------------------------
// Growth passes
// ---------------------------------------------------------------------------

/// Add `delta` growth units to every growing unlocked plot.
///
/// Returns the number of plots that grew.
pub fn advance(state: &mut ActorState, delta: u32) -> usize {
    let mut grown: usize = 0;
    for plot in state.unlocked_mut() {
        if boost_growth(plot, delta) > 0 {
            grown = grown.saturating_add(1);
        }
    }
    grown
}

/// Add up to `amount` progress to one plot, clamped to the crop's growth
/// time. Empty and ready plots are left alone.
///
/// Returns the progress actually applied.
pub fn boost_growth(plot: &mut Plot, amount: u32) -> u32 {
    let Some(growth_time) = plot.growth_time() else {
        return 0;
    };
    if plot.is_ready() {
        return 0;
    }
    let next = plot.growth_progress.saturating_add(amount).min(growth_time);
    let applied = next.saturating_sub(plot.growth_progress);
    plot.growth_progress = next;
    applied
}

/// Consume one stored boost and apply it to every growing plot.
///
/// Each plot gains a quarter of its remaining growth time, at least one
/// tick. Returns the number of plots boosted.
pub fn apply_boost(state: &mut ActorState) -> Result<usize> {
    if state.compost.stored_boost == 0 {
        return Err(FarmError::NoBoostStored);
    }
    if !state.unlocked().iter().any(Plot::is_growing) {
        return Err(FarmError::NothingGrowing);
    }

    state.compost.stored_boost = state.compost.stored_boost.saturating_sub(1);

    let mut boosted: usize = 0;
    for plot in state.unlocked_mut().iter_mut().filter(|p| p.is_growing()) {
        let amount = (remaining_ticks(plot) / BOOST_DIVISOR).max(1);
        boost_growth(plot, amount);
        boosted = boosted.saturating_add(1);
    }
    debug!(boosted, "Boost applied");
    Ok(boosted)
}

// ---------------------------------------------------------------------------
// Planting and harvesting
// ---------------------------------------------------------------------------

fn unlocked_plot_mut(state: &mut ActorState, index: usize) -> Result<&mut Plot> {
    let unlocked = state.unlocked_plots;
    if index >= unlocked {
        return Err(FarmError::SlotLocked { index, unlocked });
    }
    state
        .plots
        .get_mut(index)
        .ok_or(FarmError::SlotLocked { index, unlocked })
}

/// Plant `crop` in plot `index`.
pub fn plant(state: &mut ActorState, index: usize, crop: CropKind) -> Result<()> {
    let plot = unlocked_plot_mut(state, index)?;
    if !plot.is_empty() {
        return Err(FarmError::SlotOccupied { index });
    }
    plot.plant(crop);
    Ok(())
}

/// Plant `crop` in every empty unlocked plot. Returns the number planted.
pub fn plant_all(state: &mut ActorState, crop: CropKind) -> usize {
    let mut planted: usize = 0;
    for plot in state.unlocked_mut().iter_mut().filter(|p| p.is_empty()) {
        plot.plant(crop);
        planted = planted.saturating_add(1);
    }
    planted
}

/// Harvest plot `index`.
///
/// With `replant`, the crop stays and only its progress resets. Fails
/// with [`FarmError::NotReady`] and changes nothing if the plot is empty
/// or still growing.
pub fn harvest(state: &mut ActorState, index: usize, replant: bool) -> Result<HarvestYield> {
    let plot = unlocked_plot_mut(state, index)?;
    let crop = match plot.crop {
        Some(crop) if plot.is_ready() => crop,
        _ => return Err(FarmError::NotReady { index }),
    };

    plot.harvest_count = plot.harvest_count.saturating_add(1);
    if replant {
        plot.growth_progress = 0;
    } else {
        plot.clear();
    }
    state.stats.total_harvested = state.stats.total_harvested.saturating_add(1);

    let spec = crop.spec();
    Ok(HarvestYield {
        index,
        crop,
        resource: spec.output,
        count: spec.base_yield,
    })
}

/// Harvest every ready unlocked plot.
pub fn harvest_all(state: &mut ActorState, replant: bool) -> Vec<HarvestYield> {
    let ready: Vec<usize> = state
        .unlocked()
        .iter()
        .enumerate()
        .filter(|(_, plot)| plot.is_ready())
        .map(|(index, _)| index)
        .collect();

    ready
        .into_iter()
        .filter_map(|index| harvest(state, index, replant).ok())
        .collect()
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Display growth stage, `0..stage_count`.
pub fn growth_stage(plot: &Plot) -> u32 {
    let Some(crop) = plot.crop.filter(|_| plot.planted) else {
        return 0;
    };
    let spec = crop.spec();
    let last = spec.stage_count.saturating_sub(1);
    let stage = u64::from(plot.growth_progress)
        .saturating_mul(u64::from(spec.stage_count))
        .checked_div(u64::from(spec.growth_time))
        .unwrap_or(0);
    u32::try_from(stage).unwrap_or(u32::MAX).min(last)
}

/// Fraction of growth completed, `0.0..=1.0`.
pub fn growth_percent(plot: &Plot) -> f64 {
    match plot.growth_time() {
        Some(time) if time > 0 => {
            (f64::from(plot.growth_progress) / f64::from(time)).min(1.0)
        }
        _ => 0.0,
    }
}

/// Growth units still needed before the plot is ready.
pub fn remaining_ticks(plot: &Plot) -> u32 {
    plot.growth_time()
        .map_or(0, |time| time.saturating_sub(plot.growth_progress))
}

/// Number of unlocked plots with something planted.
pub fn planted_count(state: &ActorState) -> usize {
    state.unlocked().iter().filter(|p| !p.is_empty()).count()
}

/// Number of unlocked plots ready to harvest.
pub fn ready_count(state: &ActorState) -> usize {
    state.unlocked().iter().filter(|p| p.is_ready()).count()
}
