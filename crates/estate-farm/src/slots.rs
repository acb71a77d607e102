//! Crop plot unlocking and its cost schedule.
//!
//! Unlocking plot `k` (0-indexed) costs exactly `costs[k]`. The table is
//! configuration; [`SlotCostTable::standard`] is the default schedule
//! covering all [`MAX_PLOTS`] plots.

use tracing::debug;

use estate_ledger::Ledger;
use estate_types::{ActorId, ActorState, MAX_PLOTS};

use crate::error::{FarmError, Result};

/// Hand-tuned costs for the first page of plots.
const FIRST_PAGE: [u64; 9] = [0, 500, 1000, 2500, 5000, 10_000, 25_000, 50_000, 100_000];

/// Cost added per plot once the first page is exhausted.
const LATER_PLOT_STEP: u64 = 25_000;

/// Per-plot unlock costs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotCostTable {
    costs: Vec<u64>,
}

impl SlotCostTable {
    /// Build a table from explicit costs. Entries beyond [`MAX_PLOTS`] are
    /// ignored.
    pub fn new(mut costs: Vec<u64>) -> Self {
        costs.truncate(MAX_PLOTS);
        Self { costs }
    }

    /// The default schedule: the first page as listed, then a linear climb
    /// from the last first-page cost.
    pub fn standard() -> Self {
        let mut costs = FIRST_PAGE.to_vec();
        let mut last = FIRST_PAGE.last().copied().unwrap_or_default();
        while costs.len() < MAX_PLOTS {
            last = last.saturating_add(LATER_PLOT_STEP);
            costs.push(last);
        }
        Self { costs }
    }

    /// Cost of unlocking plot `index`.
    pub fn cost(&self, index: usize) -> Option<u64> {
        self.costs.get(index).copied()
    }

    /// Number of plots with a listed cost.
    pub fn len(&self) -> usize {
        self.costs.len()
    }

    /// Whether no costs are listed.
    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }

    /// All costs in plot order.
    pub fn as_slice(&self) -> &[u64] {
        &self.costs
    }
}

impl Default for SlotCostTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Cost of the next plot, or `None` when no more can be unlocked.
pub fn next_slot_cost(state: &ActorState, table: &SlotCostTable) -> Option<u64> {
    if state.unlocked_plots >= MAX_PLOTS {
        return None;
    }
    table.cost(state.unlocked_plots)
}

/// Pay for and unlock the next plot. Returns the price paid.
///
/// Fails with [`FarmError::CapacityExceeded`] when nothing is left to
/// unlock, or with a ledger error when the actor cannot pay. Either way
/// nothing changes.
pub fn unlock_next_slot(
    ledger: &Ledger,
    actor: ActorId,
    state: &mut ActorState,
    table: &SlotCostTable,
) -> Result<u64> {
    let cost = next_slot_cost(state, table).ok_or(FarmError::CapacityExceeded)?;
    ledger.remove_balance(actor, state, cost)?;
    state.unlocked_plots = state.unlocked_plots.saturating_add(1);
    debug!(%actor, unlocked = state.unlocked_plots, cost, "Plot unlocked");
    Ok(cost)
}
