//! The periodic scheduler.
//!
//! One call to [`Scheduler::on_tick`] is one simulation tick. Passes are
//! keyed off the tick number:
//!
//! 1. **Growth** (every `growth_interval_ticks`): per actor, advance every
//!    plot, tick the compost bin, then auto-harvest.
//! 2. **Production** (every `production_interval_ticks`): per actor,
//!    auto-feed, then run every pen.
//! 3. **Save** (every `save_interval_ticks`): snapshot the store and hand
//!    it to the [`SnapshotSink`].
//!
//! Each actor is processed under its own lock, and growth always runs
//! before auto-harvest for the same actor within one pass.

use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use estate_farm::{ProductionSummary, compost, growth, production};

use crate::clock::{ClockError, TickClock};
use crate::config::ScheduleConfig;
use crate::service::EstateService;
use crate::store::StoreSnapshot;

// ---------------------------------------------------------------------------
// Persistence seam
// ---------------------------------------------------------------------------

/// A persistence failure reported by a [`SnapshotSink`].
#[derive(Debug, thiserror::Error)]
#[error("save failed: {source}")]
pub struct SaveError {
    /// The underlying failure.
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

impl SaveError {
    /// Wrap any error as a save failure.
    pub fn new(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

/// Receives store snapshots to persist.
pub trait SnapshotSink: Send + Sync {
    /// Persist `snapshot` without blocking the tick. Failures are the
    /// sink's to log.
    fn save(&self, snapshot: StoreSnapshot);

    /// Persist `snapshot` and wait for the write to finish.
    ///
    /// # Errors
    ///
    /// Returns [`SaveError`] if the snapshot could not be written.
    fn save_final(&self, snapshot: StoreSnapshot) -> Result<(), SaveError>;
}

/// A sink that discards every snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl SnapshotSink for NullSink {
    fn save(&self, _snapshot: StoreSnapshot) {}

    fn save_final(&self, _snapshot: StoreSnapshot) -> Result<(), SaveError> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

/// Errors that abort a tick.
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    /// The tick counter could not advance.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },
}

/// Lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Ticks are ignored.
    Stopped,
    /// Ticks run passes.
    Running,
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSummary {
    /// The tick number that just ran.
    pub tick: u64,
    /// Whether the growth pass ran.
    pub growth_ran: bool,
    /// Whether the production pass ran.
    pub production_ran: bool,
    /// Whether a snapshot went to the sink.
    pub save_requested: bool,
    /// Plots that advanced during the growth pass.
    pub plots_grown: u64,
    /// Plots auto-harvested.
    pub harvested: u64,
    /// Boosts produced by compost bins.
    pub boosts_made: u64,
    /// Fodder moved by auto-feed.
    pub fed: u64,
    /// Pen output totals.
    pub production: ProductionSummary,
}

/// Drives every periodic pass over the actor store.
pub struct Scheduler {
    service: Arc<EstateService>,
    sink: Arc<dyn SnapshotSink>,
    schedule: ScheduleConfig,
    clock: TickClock,
    state: SchedulerState,
    rng: StdRng,
}

impl core::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Scheduler")
            .field("schedule", &self.schedule)
            .field("clock", &self.clock)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Scheduler {
    /// A stopped scheduler. `seed` fixes loot rolls for reproducible runs.
    pub fn new(
        service: Arc<EstateService>,
        sink: Arc<dyn SnapshotSink>,
        schedule: ScheduleConfig,
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        Self {
            service,
            sink,
            schedule,
            clock: TickClock::new(),
            state: SchedulerState::Stopped,
            rng,
        }
    }

    /// Begin processing ticks.
    pub fn start(&mut self) {
        if self.state == SchedulerState::Running {
            return;
        }
        self.state = SchedulerState::Running;
        info!(
            tick = self.clock.tick(),
            actors = self.service.store().len(),
            growth_interval = self.schedule.growth_interval_ticks,
            production_interval = self.schedule.production_interval_ticks,
            save_interval = self.schedule.save_interval_ticks,
            "Scheduler started"
        );
    }

    /// Current lifecycle state.
    pub const fn state(&self) -> SchedulerState {
        self.state
    }

    /// Ticks processed so far.
    pub const fn tick(&self) -> u64 {
        self.clock.tick()
    }

    /// The service this scheduler drives.
    pub const fn service(&self) -> &Arc<EstateService> {
        &self.service
    }

    /// Run one tick. Returns `None` while stopped.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::Clock`] if the tick counter overflows.
    pub fn on_tick(&mut self) -> Result<Option<TickSummary>, SchedulerError> {
        if self.state == SchedulerState::Stopped {
            return Ok(None);
        }
        let tick = self.clock.advance()?;
        let mut summary = TickSummary {
            tick,
            ..TickSummary::default()
        };

        if self.clock.is_due(self.schedule.growth_interval_ticks) {
            self.growth_pass(&mut summary);
        }
        if self.clock.is_due(self.schedule.production_interval_ticks) {
            self.production_pass(&mut summary);
        }
        if self.clock.is_due(self.schedule.save_interval_ticks) {
            debug!(tick, "Periodic save requested");
            self.sink.save(self.service.store().snapshot());
            summary.save_requested = true;
        }
        Ok(Some(summary))
    }

    /// Stop and write one final snapshot, waiting for it to complete.
    ///
    /// A failed final save is logged; the scheduler is stopped either way.
    pub fn on_shutdown(&mut self) {
        if self.state == SchedulerState::Stopped {
            return;
        }
        self.state = SchedulerState::Stopped;
        let snapshot = self.service.store().snapshot();
        let actors = snapshot.len();
        match self.sink.save_final(snapshot) {
            Ok(()) => info!(tick = self.clock.tick(), actors, "Final save complete"),
            Err(e) => warn!(error = %e, "Final save failed"),
        }
    }

    fn growth_pass(&self, summary: &mut TickSummary) {
        let delta = self.schedule.growth_delta;
        let service = &self.service;
        service.store().for_each_actor(|actor, state| {
            let grown = growth::advance(state, delta);
            summary.plots_grown = summary
                .plots_grown
                .saturating_add(u64::try_from(grown).unwrap_or(u64::MAX));

            if compost::tick(&mut state.compost) {
                summary.boosts_made = summary.boosts_made.saturating_add(1);
            }

            let harvest = service.auto_harvest(actor, state);
            summary.harvested = summary
                .harvested
                .saturating_add(u64::try_from(harvest.yields.len()).unwrap_or(u64::MAX));
        });
        summary.growth_ran = true;
        debug!(
            tick = summary.tick,
            plots_grown = summary.plots_grown,
            harvested = summary.harvested,
            boosts = summary.boosts_made,
            "Growth pass complete"
        );
    }

    fn production_pass(&mut self, summary: &mut TickSummary) {
        let cap = self.service.rules().max_fodder;
        let rng = &mut self.rng;
        self.service.store().for_each_actor(|_, state| {
            let fed = production::auto_feed(state, cap);
            summary.fed = summary.fed.saturating_add(u64::from(fed));

            let produced = production::advance(state, &mut *rng);
            summary.production = ProductionSummary {
                cycles: summary.production.cycles.saturating_add(produced.cycles),
                units: summary.production.units.saturating_add(produced.units),
                dropped: summary.production.dropped.saturating_add(produced.dropped),
            };
        });
        summary.production_ran = true;
        debug!(
            tick = summary.tick,
            cycles = summary.production.cycles,
            units = summary.production.units,
            dropped = summary.production.dropped,
            fed = summary.fed,
            "Production pass complete"
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use parking_lot::Mutex;

    use estate_types::{ActorId, CropKind};

    use super::*;
    use crate::store::ActorStore;

    #[derive(Default)]
    struct RecordingSink {
        saves: Mutex<Vec<usize>>,
        finals: Mutex<Vec<usize>>,
    }

    impl SnapshotSink for RecordingSink {
        fn save(&self, snapshot: StoreSnapshot) {
            self.saves.lock().push(snapshot.len());
        }

        fn save_final(&self, snapshot: StoreSnapshot) -> Result<(), SaveError> {
            self.finals.lock().push(snapshot.len());
            Ok(())
        }
    }

    struct FailingSink;

    impl SnapshotSink for FailingSink {
        fn save(&self, _snapshot: StoreSnapshot) {}

        fn save_final(&self, _snapshot: StoreSnapshot) -> Result<(), SaveError> {
            Err(SaveError::new("disk full"))
        }
    }

    fn scheduler(sink: Arc<dyn SnapshotSink>) -> Scheduler {
        let service = Arc::new(EstateService::with_defaults(Arc::new(ActorStore::default())));
        Scheduler::new(service, sink, ScheduleConfig::default(), Some(1))
    }

    #[test]
    fn stopped_scheduler_ignores_ticks() {
        let mut scheduler = scheduler(Arc::new(NullSink));
        assert_eq!(scheduler.on_tick().unwrap(), None);
        assert_eq!(scheduler.tick(), 0);
    }

    #[test]
    fn passes_run_on_their_intervals() {
        let sink = Arc::new(RecordingSink::default());
        let mut scheduler = scheduler(sink.clone());
        scheduler.service().store().handle(ActorId::new());
        scheduler.start();

        let mut growth = Vec::new();
        let mut production = Vec::new();
        let mut saves = Vec::new();
        for _ in 0..6000 {
            let summary = scheduler.on_tick().unwrap().unwrap();
            if summary.growth_ran {
                growth.push(summary.tick);
            }
            if summary.production_ran {
                production.push(summary.tick);
            }
            if summary.save_requested {
                saves.push(summary.tick);
            }
        }
        assert_eq!(growth.len(), 30);
        assert_eq!(growth.first(), Some(&200));
        assert_eq!(production, vec![1200, 2400, 3600, 4800, 6000]);
        assert_eq!(saves, vec![6000]);
        assert_eq!(*sink.saves.lock(), vec![1]);
    }

    #[test]
    fn growth_pass_ripens_and_auto_harvests() {
        let mut scheduler = scheduler(Arc::new(NullSink));
        let actor = ActorId::new();
        let service = Arc::clone(scheduler.service());
        service.plant(actor, 0, CropKind::Wheat).unwrap();
        service.set_auto_harvest(actor, true);
        scheduler.start();

        // Wheat needs 600 growth units: 30 passes of 20.
        let mut harvested: u64 = 0;
        for _ in 0..6000 {
            let summary = scheduler.on_tick().unwrap().unwrap();
            harvested = harvested.saturating_add(summary.harvested);
        }
        assert_eq!(harvested, 1);
        let overview = service.overview(actor);
        assert_eq!(overview.pending_crops, 5);
        assert_eq!(overview.planted_plots, 1);
        assert_eq!(overview.ready_plots, 0);
    }

    #[test]
    fn shutdown_saves_once_and_stops() {
        let sink = Arc::new(RecordingSink::default());
        let mut scheduler = scheduler(sink.clone());
        scheduler.start();
        scheduler.on_tick().unwrap();
        scheduler.on_shutdown();
        scheduler.on_shutdown();

        assert_eq!(scheduler.state(), SchedulerState::Stopped);
        assert_eq!(sink.finals.lock().len(), 1);
        assert_eq!(scheduler.on_tick().unwrap(), None);
    }

    #[test]
    fn failed_final_save_still_stops() {
        let mut scheduler = scheduler(Arc::new(FailingSink));
        scheduler.start();
        scheduler.on_shutdown();
        assert_eq!(scheduler.state(), SchedulerState::Stopped);
    }
}
