//! Pen production: fodder, tools, construction, and loot rolls.
//!
//! Every production interval the scheduler calls [`advance`], which runs
//! one cycle for each pen that [`can_produce`]. A cycle eats one portion
//! of fodder and rolls every loot entry independently. Tool-gated entries
//! only roll when a suitable tool is equipped, and wear it when they do.

use rand::Rng;
use tracing::debug;

use estate_ledger::Ledger;
use estate_types::{ActorId, ActorState, Pen, PenKind, ResourceStack, ToolStack};

use crate::error::{FarmError, Result};

// ---------------------------------------------------------------------------
// ProductionSummary
// ---------------------------------------------------------------------------

/// Outcome of one production pass over an actor's pens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProductionSummary {
    /// Pens that ran a cycle.
    pub cycles: u32,
    /// Units added to the output buffer.
    pub units: u64,
    /// Units lost because the output buffer was full.
    pub dropped: u64,
}

// ---------------------------------------------------------------------------
// Cycles
// ---------------------------------------------------------------------------

/// Whether `pen` can run a cycle right now.
pub const fn can_produce(pen: &Pen) -> bool {
    if !pen.constructed {
        return false;
    }
    let spec = pen.kind.spec();
    spec.fodder.is_none() || pen.fodder >= spec.fodder_per_cycle
}

/// Run one production cycle and return what it produced.
///
/// A pen that cannot produce yields nothing and is left untouched.
pub fn produce<R: Rng + ?Sized>(pen: &mut Pen, rng: &mut R) -> Vec<ResourceStack> {
    if !can_produce(pen) {
        return Vec::new();
    }
    let spec = pen.kind.spec();
    pen.fodder = pen.fodder.saturating_sub(spec.fodder_per_cycle);

    let mut produced = Vec::new();
    for entry in spec.loot {
        if let Some(requirement) = entry.required_tool {
            let Some(tool) = pen
                .tool
                .as_mut()
                .filter(|t| requirement.is_satisfied_by(t.kind))
            else {
                continue;
            };
            if entry.consumes_tool {
                tool.durability_used = tool.durability_used.saturating_add(1);
                if tool.is_broken() {
                    debug!(pen = %pen.kind, tool = %tool.kind, "Tool broke");
                    pen.tool = None;
                }
            }
        }

        let count = if entry.max_count > entry.min_count {
            rng.random_range(entry.min_count..=entry.max_count)
        } else {
            entry.min_count
        };
        if count > 0 {
            produced.push(ResourceStack::new(entry.resource, count));
            pen.total_produced = pen.total_produced.saturating_add(u64::from(count));
        }
    }
    produced
}

/// Run a cycle for every owned pen that can produce, depositing the
/// output in the actor's output buffer.
pub fn advance<R: Rng + ?Sized>(state: &mut ActorState, rng: &mut R) -> ProductionSummary {
    let ActorState {
        pens,
        output_buffer,
        ..
    } = state;

    let mut summary = ProductionSummary::default();
    for pen in pens.values_mut().filter(|pen| can_produce(pen)) {
        summary.cycles = summary.cycles.saturating_add(1);
        for stack in produce(pen, rng) {
            let dropped = output_buffer.add_stack(stack);
            summary.units = summary
                .units
                .saturating_add(u64::from(stack.count.saturating_sub(dropped)));
            summary.dropped = summary.dropped.saturating_add(u64::from(dropped));
        }
    }
    summary
}

// ---------------------------------------------------------------------------
// Pen management
// ---------------------------------------------------------------------------

fn owned_pen_mut(state: &mut ActorState, kind: PenKind) -> Result<&mut Pen> {
    state
        .pens
        .get_mut(&kind)
        .ok_or(FarmError::NotOwned { kind })
}

/// Buy a pen of `kind`. Returns the price paid.
pub fn unlock_pen(
    ledger: &Ledger,
    actor: ActorId,
    state: &mut ActorState,
    kind: PenKind,
) -> Result<u64> {
    if state.owns_pen(kind) {
        return Err(FarmError::AlreadyOwned { kind });
    }
    let cost = kind.spec().unlock_cost;
    ledger.remove_balance(actor, state, cost)?;
    state.pens.insert(kind, Pen::new(kind));
    Ok(cost)
}

/// Stock up to `amount` fodder, never exceeding `cap`. Returns the amount
/// accepted; anything over the cap is not taken.
pub fn add_fodder(state: &mut ActorState, kind: PenKind, amount: u32, cap: u32) -> Result<u32> {
    let pen = owned_pen_mut(state, kind)?;
    if kind.spec().fodder.is_none() {
        return Err(FarmError::NoFodderNeeded { kind });
    }
    let accepted = cap.saturating_sub(pen.fodder).min(amount);
    pen.fodder = pen.fodder.saturating_add(accepted);
    Ok(accepted)
}

/// Equip `tool`, returning whatever was equipped before.
pub fn equip_tool(
    state: &mut ActorState,
    kind: PenKind,
    tool: ToolStack,
) -> Result<Option<ToolStack>> {
    let pen = owned_pen_mut(state, kind)?;
    Ok(pen.tool.replace(tool))
}

/// Remove and return the equipped tool.
pub fn unequip_tool(state: &mut ActorState, kind: PenKind) -> Result<Option<ToolStack>> {
    let pen = owned_pen_mut(state, kind)?;
    Ok(pen.tool.take())
}

/// Invest construction units. Returns whether the pen is now constructed.
pub fn invest_construction(state: &mut ActorState, kind: PenKind, units: u32) -> Result<bool> {
    let pen = owned_pen_mut(state, kind)?;
    let required = kind.spec().construction_units;
    if required == 0 {
        return Err(FarmError::NotConstructible { kind });
    }
    pen.invested_units = pen.invested_units.saturating_add(units);
    if pen.invested_units >= required && !pen.constructed {
        pen.constructed = true;
        debug!(pen = %kind, "Construction complete");
    }
    Ok(pen.constructed)
}

/// Refill every fodder-eating pen from the actor's buffers, crops first.
///
/// Returns the total units moved. A no-op when auto-feed is off.
pub fn auto_feed(state: &mut ActorState, cap: u32) -> u32 {
    if !state.auto_feed {
        return 0;
    }
    let ActorState {
        pens,
        crop_output_buffer,
        output_buffer,
        ..
    } = state;

    let mut moved: u32 = 0;
    for pen in pens.values_mut() {
        let Some(fodder) = pen.kind.spec().fodder else {
            continue;
        };
        let space = cap.saturating_sub(pen.fodder);
        let from_crops = crop_output_buffer.take(fodder, space);
        let from_output = output_buffer.take(fodder, space.saturating_sub(from_crops));
        let taken = from_crops.saturating_add(from_output);
        pen.fodder = pen.fodder.saturating_add(taken);
        moved = moved.saturating_add(taken);
    }
    moved
}
