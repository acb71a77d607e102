//! Host binary for the Pocket Estate simulation.
//!
//! Wires the simulation core to a real process: it loads configuration,
//! restores the save file, picks a ledger, and drives the scheduler at the
//! configured tick rate until Ctrl-C, then writes a final save.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `estate-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Restore actors from the save file
//! 4. Select the ledger
//! 5. Build the estate service
//! 6. Create the background saver and scheduler
//! 7. Run the tick loop until shutdown
//! 8. Log the result

mod error;
mod saver;
mod summary_callback;

use std::path::Path;
use std::sync::Arc;

use tokio::runtime::Handle;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use estate_core::config::EstateConfig;
use estate_core::pricing::PriceTable;
use estate_core::runner;
use estate_core::scheduler::Scheduler;
use estate_core::service::{EstateRules, EstateService};
use estate_core::store::ActorStore;
use estate_db::{DbError, SaveFile};
use estate_ledger::ProviderRegistry;

use crate::error::EngineError;
use crate::saver::BackgroundSaver;
use crate::summary_callback::SummaryCallback;

/// Config file looked up in the working directory.
const CONFIG_PATH: &str = "estate-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the save file cannot be
/// read, or the tick loop fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration. Logging is not up yet, so remember where it
    //    came from and report it below.
    let (config, from_file) = load_config()?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("estate-engine starting");
    if !from_file {
        info!(path = CONFIG_PATH, "Config file not found, using defaults");
    }
    info!(
        world_name = config.world.name,
        tick_rate_hz = config.world.tick_rate_hz,
        save_path = %config.save_path().display(),
        use_external_ledger = config.ledger.use_external,
        "Configuration loaded"
    );

    // 3. Restore actors.
    let save_file = SaveFile::new(config.save_path());
    let store = Arc::new(restore_store(&save_file, &config)?);
    info!(actors = store.len(), "Actor store ready");

    // 4. Select the ledger. External providers are registered here by the
    //    host integration; none ship with the engine.
    let registry = ProviderRegistry::new();
    let ledger = registry.into_ledger(config.ledger.use_external);
    info!(provider = ledger.provider_name(), "Ledger selected");

    // 5. Build the estate service.
    let service = Arc::new(EstateService::new(
        Arc::clone(&store),
        ledger,
        Arc::new(PriceTable::with_overrides(&config.economy.prices)),
        EstateRules::from_config(&config),
    ));

    // 6. Saver and scheduler.
    let saver = Arc::new(BackgroundSaver::new(save_file, Handle::current()));
    let mut scheduler = Scheduler::new(service, saver, config.schedule, config.world.seed);
    let mut callback = SummaryCallback::new(config.logging.summary_every_ticks);

    // 7. Run until Ctrl-C.
    let result = runner::run_scheduler(
        &mut scheduler,
        config.tick_period(),
        shutdown_signal(),
        &mut callback,
    )
    .await
    .map_err(EngineError::from)?;

    // 8. Log results.
    runner::log_run_end(&result);
    info!(
        total_ticks = result.total_ticks,
        "estate-engine shutdown complete"
    );
    Ok(())
}

/// Load `estate-config.yaml`, or defaults when it is absent. Environment
/// overrides apply either way. The flag reports whether the file existed.
fn load_config() -> Result<(EstateConfig, bool), EngineError> {
    let path = Path::new(CONFIG_PATH);
    if path.exists() {
        return Ok((EstateConfig::from_file(path)?, true));
    }
    let mut config = EstateConfig::default();
    config.apply_env_overrides();
    config.validate()?;
    Ok((config, false))
}

/// Decode the save file into a store. A missing file starts fresh; a
/// corrupt one is reported and also starts fresh.
fn restore_store(file: &SaveFile, config: &EstateConfig) -> Result<ActorStore, EngineError> {
    let defaults = config.actor_defaults();
    let Some(bytes) = file.read()? else {
        info!(path = %file.path().display(), "No save file, starting fresh");
        return Ok(ActorStore::new(defaults));
    };
    match estate_db::decode(&bytes, &defaults) {
        Ok(snapshot) => Ok(ActorStore::from_snapshot(defaults, snapshot)),
        Err(DbError::Corrupt(reason)) => {
            error!(
                path = %file.path().display(),
                reason,
                "SAVE FILE IS CORRUPT, starting with an empty store"
            );
            Ok(ActorStore::new(defaults))
        }
        Err(e) => Err(e.into()),
    }
}

/// Resolves on Ctrl-C. If the handler cannot be installed the loop runs
/// until the process is killed.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Could not listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
