//! Async tick driver.
//!
//! [`run_scheduler`] calls [`Scheduler::on_tick`] at a fixed period until
//! the shutdown future resolves, then runs the shutdown save. Late ticks
//! are skipped rather than bunched, so a slow tick never triggers a burst
//! of catch-up passes.

use std::future::Future;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::info;

use crate::scheduler::{Scheduler, SchedulerError, TickSummary};

/// Errors that can occur during the run loop.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A tick failed.
    #[error("tick error: {source}")]
    Tick {
        /// The underlying scheduler error.
        #[from]
        source: SchedulerError,
    },
}

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEndReason {
    /// The shutdown signal fired.
    Shutdown,
}

/// Result of a run.
#[derive(Debug)]
pub struct RunResult {
    /// Why the loop ended.
    pub end_reason: RunEndReason,
    /// The last tick summary, if any tick completed.
    pub final_summary: Option<TickSummary>,
    /// Ticks executed during this run.
    pub total_ticks: u64,
}

/// Callback invoked after each tick completes.
pub trait TickCallback: Send {
    /// Called after a tick completes successfully.
    fn on_tick(&mut self, summary: &TickSummary, scheduler: &Scheduler);
}

/// A no-op tick callback.
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _summary: &TickSummary, _scheduler: &Scheduler) {}
}

/// Start `scheduler` and tick it every `period` until `shutdown` resolves.
/// A zero period is raised to one millisecond.
///
/// The shutdown save runs on every exit path, including a failed tick.
///
/// # Errors
///
/// Returns [`RunnerError`] if a tick fails. The scheduler has already been
/// shut down when this happens.
pub async fn run_scheduler<F>(
    scheduler: &mut Scheduler,
    period: Duration,
    shutdown: F,
    callback: &mut dyn TickCallback,
) -> Result<RunResult, RunnerError>
where
    F: Future<Output = ()>,
{
    let period = period.max(Duration::from_millis(1));
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tokio::pin!(shutdown);

    let mut last_summary: Option<TickSummary> = None;
    let mut total_ticks: u64 = 0;

    scheduler.start();
    info!(period_ms = period.as_millis(), "Tick loop starting");

    loop {
        tokio::select! {
            () = &mut shutdown => {
                info!(tick = scheduler.tick(), "Shutdown signal received");
                break;
            }
            _ = interval.tick() => {
                let summary = match scheduler.on_tick() {
                    Ok(Some(summary)) => summary,
                    Ok(None) => continue,
                    Err(e) => {
                        scheduler.on_shutdown();
                        return Err(e.into());
                    }
                };
                total_ticks = total_ticks.saturating_add(1);
                callback.on_tick(&summary, scheduler);
                last_summary = Some(summary);
            }
        }
    }

    scheduler.on_shutdown();
    Ok(RunResult {
        end_reason: RunEndReason::Shutdown,
        final_summary: last_summary,
        total_ticks,
    })
}

/// Log the end of a run.
pub fn log_run_end(result: &RunResult) {
    info!(
        reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        final_tick = result.final_summary.as_ref().map(|s| s.tick),
        "Tick loop ended"
    );
}
