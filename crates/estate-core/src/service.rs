//! Interactive estate operations.
//!
//! [`EstateService`] is what a presentation layer calls: plant, harvest,
//! buy, feed, sell, collect. Every call locks exactly one actor for its
//! whole duration, so it can run concurrently with the scheduler and with
//! calls for other actors. Results are structured values for the caller
//! to render; nothing here formats text.

use std::sync::Arc;

use tracing::{debug, info};

use estate_farm::{FarmError, HarvestYield, SlotCostTable, compost, growth, production};
use estate_ledger::{Ledger, LedgerError};
use estate_types::{
    ActorId, ActorState, ActorStats, CropKind, PenKind, ResourceKind, ResourceStack, ToolKind,
    ToolStack,
};

use crate::config::EstateConfig;
use crate::pricing::{PriceTable, Pricing};
use crate::store::ActorStore;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors returned by interactive operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// A farm rule rejected the action.
    #[error("{source}")]
    Farm {
        /// The underlying farm error.
        #[from]
        source: FarmError,
    },

    /// The ledger rejected the action.
    #[error("{source}")]
    Ledger {
        /// The underlying ledger error.
        #[from]
        source: LedgerError,
    },

    /// No stack exists at the requested buffer position.
    #[error("no stack at position {index}")]
    InvalidStack {
        /// Requested position.
        index: usize,
    },

    /// The stack exists but has no sell price.
    #[error("{kind} cannot be sold")]
    Unsellable {
        /// Resource in the stack.
        kind: ResourceKind,
    },
}

/// Convenience alias for service results.
pub type ServiceResult<T> = Result<T, ServiceError>;

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// Economy rules the service and scheduler apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EstateRules {
    /// Plot unlock schedule.
    pub slot_costs: SlotCostTable,
    /// Currency credited per harvested plot.
    pub harvest_currency: u64,
    /// Reward points credited per harvested plot.
    pub harvest_experience: u64,
    /// Whether auto-harvest pays rewards.
    pub auto_harvest_rewards: bool,
    /// Fodder capacity per pen.
    pub max_fodder: u32,
}

impl EstateRules {
    /// Rules taken from configuration.
    pub fn from_config(config: &EstateConfig) -> Self {
        Self {
            slot_costs: config.slot_costs(),
            harvest_currency: config.economy.harvest_currency,
            harvest_experience: config.economy.harvest_experience,
            auto_harvest_rewards: config.economy.auto_harvest_rewards,
            max_fodder: config.economy.max_fodder,
        }
    }
}

impl Default for EstateRules {
    fn default() -> Self {
        Self::from_config(&EstateConfig::default())
    }
}

/// Which output buffer an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferKind {
    /// Pen production.
    Output,
    /// Harvested crops.
    Crops,
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Outcome of harvesting one or more plots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarvestReport {
    /// Each plot harvested.
    pub yields: Vec<HarvestYield>,
    /// Units lost because the crop buffer was full.
    pub dropped: u64,
    /// Currency credited.
    pub currency: u64,
    /// Reward points credited.
    pub experience: u64,
}

/// Outcome of a sale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaleReport {
    /// Units sold.
    pub units: u64,
    /// Currency credited.
    pub earned: u64,
}

/// Summary of one actor's estate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EstateOverview {
    /// Current balance from the active ledger.
    pub balance: u64,
    /// Unlocked plots.
    pub unlocked_plots: usize,
    /// Cost of the next plot, if any remain.
    pub next_plot_cost: Option<u64>,
    /// Plots with a crop.
    pub planted_plots: usize,
    /// Plots ready to harvest.
    pub ready_plots: usize,
    /// Owned pens.
    pub pens: Vec<PenKind>,
    /// Units waiting in the output buffer.
    pub pending_output: u64,
    /// Units waiting in the crop buffer.
    pub pending_crops: u64,
    /// Stored boosts.
    pub stored_boost: u32,
    /// Auto-harvest flag.
    pub auto_harvest: bool,
    /// Auto-feed flag.
    pub auto_feed: bool,
    /// Lifetime counters.
    pub stats: ActorStats,
}

// ---------------------------------------------------------------------------
// EstateService
// ---------------------------------------------------------------------------

/// Entry point for every interactive estate operation.
pub struct EstateService {
    store: Arc<ActorStore>,
    ledger: Ledger,
    pricing: Arc<dyn Pricing>,
    rules: EstateRules,
}

impl core::fmt::Debug for EstateService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EstateService")
            .field("actors", &self.store.len())
            .field("ledger", &self.ledger.provider_name())
            .field("rules", &self.rules)
            .finish_non_exhaustive()
    }
}

impl EstateService {
    /// Assemble a service.
    pub fn new(
        store: Arc<ActorStore>,
        ledger: Ledger,
        pricing: Arc<dyn Pricing>,
        rules: EstateRules,
    ) -> Self {
        Self {
            store,
            ledger,
            pricing,
            rules,
        }
    }

    /// A service over `store` with internal balances and default rules.
    pub fn with_defaults(store: Arc<ActorStore>) -> Self {
        Self::new(
            store,
            Ledger::internal(),
            Arc::new(PriceTable::standard()),
            EstateRules::default(),
        )
    }

    /// The actor store.
    pub const fn store(&self) -> &Arc<ActorStore> {
        &self.store
    }

    /// The active ledger.
    pub const fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// The rules in effect.
    pub const fn rules(&self) -> &EstateRules {
        &self.rules
    }

    // --- Balance ---

    /// Current balance of `actor`.
    pub fn balance(&self, actor: ActorId) -> u64 {
        self.store
            .with_actor(actor, |state| self.ledger.balance(actor, state))
    }

    // --- Plots ---

    /// Plant `crop` in plot `index`.
    pub fn plant(&self, actor: ActorId, index: usize, crop: CropKind) -> ServiceResult<()> {
        self.store
            .with_actor(actor, |state| growth::plant(state, index, crop))?;
        Ok(())
    }

    /// Plant `crop` in every empty unlocked plot. Returns the count planted.
    pub fn plant_all(&self, actor: ActorId, crop: CropKind) -> usize {
        self.store
            .with_actor(actor, |state| growth::plant_all(state, crop))
    }

    /// Harvest plot `index`, paying the harvest reward.
    pub fn harvest(
        &self,
        actor: ActorId,
        index: usize,
        replant: bool,
    ) -> ServiceResult<HarvestReport> {
        self.store.with_actor(actor, |state| -> ServiceResult<HarvestReport> {
            let harvested = growth::harvest(state, index, replant)?;
            Ok(self.settle_harvest(actor, state, vec![harvested], true))
        })
    }

    /// Harvest every ready plot, paying the harvest reward for each.
    pub fn harvest_all(&self, actor: ActorId, replant: bool) -> HarvestReport {
        self.store.with_actor(actor, |state| {
            let yields = growth::harvest_all(state, replant);
            self.settle_harvest(actor, state, yields, true)
        })
    }

    /// Auto-harvest pass for one actor, run by the scheduler after growth.
    /// Ready plots are harvested and replanted.
    pub fn auto_harvest(&self, actor: ActorId, state: &mut ActorState) -> HarvestReport {
        if !state.auto_harvest {
            return HarvestReport::default();
        }
        let yields = growth::harvest_all(state, true);
        self.settle_harvest(actor, state, yields, self.rules.auto_harvest_rewards)
    }

    /// Cost of the next plot for `actor`.
    pub fn next_slot_cost(&self, actor: ActorId) -> Option<u64> {
        self.store.with_actor(actor, |state| {
            estate_farm::slots::next_slot_cost(state, &self.rules.slot_costs)
        })
    }

    /// Buy the next plot. Returns the price paid.
    pub fn unlock_next_slot(&self, actor: ActorId) -> ServiceResult<u64> {
        let cost = self.store.with_actor(actor, |state| {
            estate_farm::slots::unlock_next_slot(&self.ledger, actor, state, &self.rules.slot_costs)
        })?;
        info!(%actor, cost, "Plot purchased");
        Ok(cost)
    }

    /// Spend one stored boost on every growing plot. Returns plots boosted.
    pub fn apply_boost(&self, actor: ActorId) -> ServiceResult<usize> {
        Ok(self.store.with_actor(actor, growth::apply_boost)?)
    }

    /// Move crops into the compost bin. Returns units moved.
    pub fn compost_crops(&self, actor: ActorId, kind: ResourceKind, max: u32) -> u32 {
        self.store
            .with_actor(actor, |state| compost::compost_crops(state, kind, max))
    }

    // --- Pens ---

    /// Buy a pen. Returns the price paid.
    pub fn unlock_pen(&self, actor: ActorId, kind: PenKind) -> ServiceResult<u64> {
        let cost = self.store.with_actor(actor, |state| {
            production::unlock_pen(&self.ledger, actor, state, kind)
        })?;
        info!(%actor, pen = %kind, cost, "Pen purchased");
        Ok(cost)
    }

    /// Stock fodder. Returns the amount accepted.
    pub fn add_fodder(&self, actor: ActorId, kind: PenKind, amount: u32) -> ServiceResult<u32> {
        Ok(self.store.with_actor(actor, |state| {
            production::add_fodder(state, kind, amount, self.rules.max_fodder)
        })?)
    }

    /// Equip a fresh tool. Returns the previously equipped tool.
    pub fn equip_tool(
        &self,
        actor: ActorId,
        kind: PenKind,
        tool: ToolKind,
    ) -> ServiceResult<Option<ToolStack>> {
        Ok(self.store.with_actor(actor, |state| {
            production::equip_tool(state, kind, ToolStack::new(tool))
        })?)
    }

    /// Remove the equipped tool.
    pub fn unequip_tool(&self, actor: ActorId, kind: PenKind) -> ServiceResult<Option<ToolStack>> {
        Ok(self
            .store
            .with_actor(actor, |state| production::unequip_tool(state, kind))?)
    }

    /// Invest construction units. Returns whether the pen is constructed.
    pub fn invest_construction(
        &self,
        actor: ActorId,
        kind: PenKind,
        units: u32,
    ) -> ServiceResult<bool> {
        Ok(self.store.with_actor(actor, |state| {
            production::invest_construction(state, kind, units)
        })?)
    }

    // --- Flags ---

    /// Turn auto-harvest on or off.
    pub fn set_auto_harvest(&self, actor: ActorId, enabled: bool) {
        self.store
            .with_actor(actor, |state| state.auto_harvest = enabled);
    }

    /// Turn auto-feed on or off.
    pub fn set_auto_feed(&self, actor: ActorId, enabled: bool) {
        self.store.with_actor(actor, |state| state.auto_feed = enabled);
    }

    // --- Buffers ---

    /// Drain a buffer and hand its stacks to the caller.
    pub fn collect(&self, actor: ActorId, buffer: BufferKind) -> Vec<ResourceStack> {
        self.store.with_actor(actor, |state| match buffer {
            BufferKind::Output => state.output_buffer.take_all(),
            BufferKind::Crops => state.crop_output_buffer.take_all(),
        })
    }

    /// Drain the pen output buffer.
    pub fn collect_output(&self, actor: ActorId) -> Vec<ResourceStack> {
        self.collect(actor, BufferKind::Output)
    }

    /// Drain the harvested crop buffer.
    pub fn collect_crop_output(&self, actor: ActorId) -> Vec<ResourceStack> {
        self.collect(actor, BufferKind::Crops)
    }

    /// Sell every sellable stack in both buffers. Unsellable stacks stay.
    pub fn sell_all(&self, actor: ActorId) -> SaleReport {
        self.store.with_actor(actor, |state| {
            let pricing = &self.pricing;
            let mut sold = state
                .output_buffer
                .drain_where(|s| pricing.price(s.kind) > 0);
            sold.extend(
                state
                    .crop_output_buffer
                    .drain_where(|s| pricing.price(s.kind) > 0),
            );
            self.settle_sale(actor, state, &sold)
        })
    }

    /// Sell the stack at `index` of `buffer`.
    pub fn sell_stack(
        &self,
        actor: ActorId,
        buffer: BufferKind,
        index: usize,
    ) -> ServiceResult<SaleReport> {
        self.store.with_actor(actor, |state| -> ServiceResult<SaleReport> {
            let target = match buffer {
                BufferKind::Output => &mut state.output_buffer,
                BufferKind::Crops => &mut state.crop_output_buffer,
            };
            let stack = target
                .stacks()
                .get(index)
                .copied()
                .ok_or(ServiceError::InvalidStack { index })?;
            if self.pricing.price(stack.kind) == 0 {
                return Err(ServiceError::Unsellable { kind: stack.kind });
            }
            target.remove(index);
            Ok(self.settle_sale(actor, state, &[stack]))
        })
    }

    // --- Overview ---

    /// Summary of `actor`'s estate.
    pub fn overview(&self, actor: ActorId) -> EstateOverview {
        self.store.with_actor(actor, |state| EstateOverview {
            balance: self.ledger.balance(actor, state),
            unlocked_plots: state.unlocked_plots,
            next_plot_cost: estate_farm::slots::next_slot_cost(state, &self.rules.slot_costs),
            planted_plots: growth::planted_count(state),
            ready_plots: growth::ready_count(state),
            pens: state.pens.keys().copied().collect(),
            pending_output: state.output_buffer.total_units(),
            pending_crops: state.crop_output_buffer.total_units(),
            stored_boost: state.compost.stored_boost,
            auto_harvest: state.auto_harvest,
            auto_feed: state.auto_feed,
            stats: state.stats,
        })
    }

    // --- Internals ---

    fn settle_harvest(
        &self,
        actor: ActorId,
        state: &mut ActorState,
        yields: Vec<HarvestYield>,
        pay_rewards: bool,
    ) -> HarvestReport {
        let mut report = HarvestReport::default();
        for harvested in &yields {
            let dropped = state
                .crop_output_buffer
                .add(harvested.resource, harvested.count);
            report.dropped = report.dropped.saturating_add(u64::from(dropped));
        }

        if pay_rewards && !yields.is_empty() {
            let plots = u64::try_from(yields.len()).unwrap_or(u64::MAX);
            report.currency = self.rules.harvest_currency.saturating_mul(plots);
            report.experience = self.rules.harvest_experience.saturating_mul(plots);
            self.ledger.credit(actor, state, report.currency);
            state.stats.total_currency_earned = state
                .stats
                .total_currency_earned
                .saturating_add(report.currency);
            state.stats.total_boost_earned = state
                .stats
                .total_boost_earned
                .saturating_add(report.experience);
        }
        if !yields.is_empty() {
            debug!(%actor, plots = yields.len(), currency = report.currency, "Harvest settled");
        }
        report.yields = yields;
        report
    }

    fn settle_sale(
        &self,
        actor: ActorId,
        state: &mut ActorState,
        sold: &[ResourceStack],
    ) -> SaleReport {
        let report = sold.iter().fold(SaleReport::default(), |acc, stack| SaleReport {
            units: acc.units.saturating_add(u64::from(stack.count)),
            earned: acc
                .earned
                .saturating_add(self.pricing.value(stack.kind, stack.count)),
        });
        if report.earned > 0 {
            self.ledger.credit(actor, state, report.earned);
            state.stats.total_currency_earned = state
                .stats
                .total_currency_earned
                .saturating_add(report.earned);
            info!(%actor, units = report.units, earned = report.earned, "Sold resources");
        }
        report
    }
}
