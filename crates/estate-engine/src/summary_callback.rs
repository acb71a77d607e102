//! Tick callback that logs a periodic activity summary.
//!
//! Counters accumulate across ticks and are logged and reset every
//! `every` ticks. An interval of 0 disables the summary.

use estate_core::runner::TickCallback;
use estate_core::scheduler::{Scheduler, TickSummary};
use tracing::info;

/// Accumulates [`TickSummary`] values between log lines.
#[derive(Debug, Default)]
pub struct SummaryCallback {
    every: u64,
    harvested: u64,
    boosts_made: u64,
    fed: u64,
    cycles: u64,
    units: u64,
    dropped: u64,
}

impl SummaryCallback {
    /// A callback logging every `every` ticks.
    pub fn new(every: u64) -> Self {
        Self {
            every,
            ..Self::default()
        }
    }

    fn absorb(&mut self, summary: &TickSummary) {
        self.harvested = self.harvested.saturating_add(summary.harvested);
        self.boosts_made = self.boosts_made.saturating_add(summary.boosts_made);
        self.fed = self.fed.saturating_add(summary.fed);
        self.cycles = self
            .cycles
            .saturating_add(u64::from(summary.production.cycles));
        self.units = self.units.saturating_add(summary.production.units);
        self.dropped = self.dropped.saturating_add(summary.production.dropped);
    }
}

impl TickCallback for SummaryCallback {
    fn on_tick(&mut self, summary: &TickSummary, scheduler: &Scheduler) {
        if self.every == 0 {
            return;
        }
        self.absorb(summary);
        if summary.tick.checked_rem(self.every) != Some(0) {
            return;
        }
        info!(
            tick = summary.tick,
            actors = scheduler.service().store().len(),
            harvested = self.harvested,
            boosts = self.boosts_made,
            fed = self.fed,
            pen_cycles = self.cycles,
            units_produced = self.units,
            units_dropped = self.dropped,
            "Estate activity"
        );
        *self = Self::new(self.every);
    }
}
