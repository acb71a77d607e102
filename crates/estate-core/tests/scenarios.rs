//! End-to-end estate scenarios driven through the public service and
//! scheduler APIs.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]

use std::sync::Arc;

use parking_lot::Mutex;
use rand::SeedableRng;
use rand::rngs::StdRng;

use estate_core::config::{EstateConfig, ScheduleConfig};
use estate_core::pricing::PriceTable;
use estate_core::scheduler::{SaveError, Scheduler, SnapshotSink};
use estate_core::service::{EstateRules, EstateService, ServiceError};
use estate_core::store::{ActorStore, StoreSnapshot};
use estate_farm::{FarmError, growth, production};
use estate_ledger::{Ledger, LedgerError, ProviderRegistry};
use estate_types::{ActorId, CropKind, MAX_PLOTS, PenKind, ResourceKind, ToolKind, ToolStack};

fn service_from(config: &EstateConfig) -> EstateService {
    EstateService::new(
        Arc::new(ActorStore::new(config.actor_defaults())),
        ProviderRegistry::new().into_ledger(config.ledger.use_external),
        Arc::new(PriceTable::with_overrides(&config.economy.prices)),
        EstateRules::from_config(config),
    )
}

// =============================================================================
// Crop lifecycle
// =============================================================================

#[test]
fn crop_ripens_after_its_growth_time_and_pays_on_harvest() {
    let service = service_from(&EstateConfig::default());
    let actor = ActorId::new();

    let overview = service.overview(actor);
    assert_eq!(overview.balance, 1000);
    assert_eq!(overview.unlocked_plots, 3);

    service.plant(actor, 0, CropKind::Wheat).unwrap();
    assert_eq!(CropKind::Wheat.growth_time(), 600);

    service.store().with_actor(actor, |state| {
        let mut last = 0;
        for _ in 0..600 {
            growth::advance(state, 1);
            let progress = state.plots[0].growth_progress;
            assert!(progress >= last);
            last = progress;
        }
        assert!(state.plots[0].is_ready());
    });

    let report = service.harvest(actor, 0, false).unwrap();
    assert_eq!(report.yields.len(), 1);
    assert_eq!(report.yields[0].resource, ResourceKind::Wheat);
    assert_eq!(report.yields[0].count, CropKind::Wheat.spec().base_yield);

    let overview = service.overview(actor);
    assert_eq!(overview.balance, 1010);
    assert_eq!(overview.stats.total_harvested, 1);
    assert_eq!(overview.planted_plots, 0);
    service
        .store()
        .with_actor(actor, |state| assert!(state.plots[0].is_empty()));
}

#[test]
fn failed_harvest_leaves_state_unchanged() {
    let service = service_from(&EstateConfig::default());
    let actor = ActorId::new();
    service.plant(actor, 1, CropKind::Potato).unwrap();
    service.store().with_actor(actor, |state| {
        growth::advance(state, 10);
    });

    let before = service.store().with_actor(actor, |state| state.clone());
    for index in [0, 1] {
        assert_eq!(
            service.harvest(actor, index, false).unwrap_err(),
            ServiceError::Farm {
                source: FarmError::NotReady { index }
            }
        );
    }
    let after = service.store().with_actor(actor, |state| state.clone());
    assert_eq!(before, after);
}

// =============================================================================
// Plot purchases
// =============================================================================

#[test]
fn every_plot_costs_its_table_entry_until_the_cap() {
    let service = service_from(&EstateConfig::default());
    let actor = ActorId::new();
    service
        .store()
        .with_actor(actor, |state| state.balance = u64::MAX / 2);
    let table = service.rules().slot_costs.clone();

    for k in 3..MAX_PLOTS {
        let before = service.overview(actor);
        let paid = service.unlock_next_slot(actor).unwrap();
        let after = service.overview(actor);
        assert_eq!(Some(paid), table.cost(k));
        assert_eq!(after.unlocked_plots, before.unlocked_plots + 1);
        assert_eq!(after.balance, before.balance - paid);
    }

    let before = service.store().with_actor(actor, |state| state.clone());
    assert_eq!(
        service.unlock_next_slot(actor).unwrap_err(),
        ServiceError::Farm {
            source: FarmError::CapacityExceeded
        }
    );
    assert_eq!(before, service.store().with_actor(actor, |state| state.clone()));
}

#[test]
fn unaffordable_plot_reports_the_shortfall() {
    let service = service_from(&EstateConfig::default());
    let actor = ActorId::new();
    assert_eq!(
        service.unlock_next_slot(actor).unwrap_err(),
        ServiceError::Farm {
            source: FarmError::Ledger {
                source: LedgerError::InsufficientFunds {
                    required: 2500,
                    available: 1000
                }
            }
        }
    );
    assert_eq!(service.overview(actor).unlocked_plots, 3);
}

// =============================================================================
// Pens
// =============================================================================

#[test]
fn tool_gated_loot_needs_the_tool_and_wears_it_out() {
    let service = service_from(&EstateConfig::default());
    let actor = ActorId::new();
    let mut rng = StdRng::seed_from_u64(42);
    service
        .store()
        .with_actor(actor, |state| state.balance = 10_000);
    service.unlock_pen(actor, PenKind::Sheep).unwrap();
    service.add_fodder(actor, PenKind::Sheep, 100).unwrap();

    service.store().with_actor(actor, |state| {
        for _ in 0..3 {
            let pen = state.pens.get_mut(&PenKind::Sheep).unwrap();
            let loot = production::produce(pen, &mut rng);
            assert!(!loot.is_empty());
            assert!(loot.iter().all(|s| s.kind == ResourceKind::Mutton));
        }
    });

    // One use left before the shears break.
    let mut shears = ToolStack::new(ToolKind::Shears);
    shears.durability_used = ToolKind::Shears.max_durability() - 1;
    service.store().with_actor(actor, |state| {
        production::equip_tool(state, PenKind::Sheep, shears).unwrap();
        let pen = state.pens.get_mut(&PenKind::Sheep).unwrap();
        let loot = production::produce(pen, &mut rng);
        assert!(loot.iter().any(|s| s.kind == ResourceKind::WhiteWool));
        assert!(pen.tool.is_none());

        let loot = production::produce(pen, &mut rng);
        assert!(loot.iter().all(|s| s.kind == ResourceKind::Mutton));
    });
}

#[test]
fn fodder_runs_out_after_two_cycles() {
    let service = service_from(&EstateConfig::default());
    let actor = ActorId::new();
    let mut rng = StdRng::seed_from_u64(5);
    service
        .store()
        .with_actor(actor, |state| state.balance = 10_000);
    service.unlock_pen(actor, PenKind::Cow).unwrap();
    service.add_fodder(actor, PenKind::Cow, 25).unwrap();

    service.store().with_actor(actor, |state| {
        assert_eq!(production::advance(state, &mut rng).cycles, 1);
        assert_eq!(production::advance(state, &mut rng).cycles, 1);
        let pen = state.pens.get(&PenKind::Cow).unwrap();
        assert_eq!(pen.fodder, 5);
        assert!(!production::can_produce(pen));

        let produced_before = pen.total_produced;
        let summary = production::advance(state, &mut rng);
        assert_eq!(summary.cycles, 0);
        let pen = state.pens.get(&PenKind::Cow).unwrap();
        assert_eq!(pen.fodder, 5);
        assert_eq!(pen.total_produced, produced_before);
    });
}

// =============================================================================
// Scheduler
// =============================================================================

#[derive(Default)]
struct CountingSink {
    periodic: Mutex<u32>,
    last_final: Mutex<Option<StoreSnapshot>>,
}

impl SnapshotSink for CountingSink {
    fn save(&self, _snapshot: StoreSnapshot) {
        let mut periodic = self.periodic.lock();
        *periodic = periodic.saturating_add(1);
    }

    fn save_final(&self, snapshot: StoreSnapshot) -> Result<(), SaveError> {
        *self.last_final.lock() = Some(snapshot);
        Ok(())
    }
}

#[test]
fn auto_feed_keeps_a_pen_producing_from_the_crop_buffer() {
    let config = EstateConfig::default();
    let service = Arc::new(service_from(&config));
    let actor = ActorId::new();
    service
        .store()
        .with_actor(actor, |state| state.balance = 10_000);
    service.unlock_pen(actor, PenKind::Chicken).unwrap();
    service.set_auto_feed(actor, true);
    service.store().with_actor(actor, |state| {
        state.crop_output_buffer.add(ResourceKind::WheatSeeds, 20);
    });

    let sink = Arc::new(CountingSink::default());
    let mut scheduler = Scheduler::new(
        Arc::clone(&service),
        sink.clone(),
        ScheduleConfig::default(),
        Some(11),
    );
    scheduler.start();
    for _ in 0..6000 {
        scheduler.on_tick().unwrap();
    }
    scheduler.on_shutdown();

    assert_eq!(*sink.periodic.lock(), 1);
    let snapshot = sink.last_final.lock().take().unwrap();
    let state = snapshot.get(&actor).unwrap();
    let pen = state.pens.get(&PenKind::Chicken).unwrap();
    // 20 seeds feed four cycles of five; the fifth pass finds nothing.
    assert_eq!(pen.fodder, 0);
    assert!(pen.total_produced >= 8);
    assert_eq!(state.crop_output_buffer.count_of(ResourceKind::WheatSeeds), 0);
    assert!(state.output_buffer.count_of(ResourceKind::Egg) >= 4);
}

#[test]
fn external_ledger_falls_back_when_none_is_registered() {
    let config = EstateConfig::parse("ledger:\n  use_external: true\n").unwrap();
    let service = service_from(&config);
    assert!(!service.ledger().is_external());
    assert_eq!(service.ledger().provider_name(), Ledger::internal().provider_name());
}
