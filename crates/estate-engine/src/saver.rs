//! Snapshot sink that writes the save file off the tick thread.
//!
//! Periodic saves are encoded and written on the blocking pool. At most one
//! is in flight; a request that arrives while one is running is skipped,
//! since the next interval will carry newer state anyway. The final save
//! runs inline. Every write carries a sequence number and a write older
//! than the last one on disk is discarded, so a slow background write can
//! never replace the final save.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Instant;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use estate_core::scheduler::{SaveError, SnapshotSink};
use estate_core::store::StoreSnapshot;
use estate_db::{DbError, SaveFile};

/// Writes snapshots to a [`SaveFile`].
#[derive(Debug)]
pub struct BackgroundSaver {
    file: Arc<SaveFile>,
    runtime: Handle,
    in_flight: Arc<AtomicBool>,
    next_sequence: AtomicU64,
    last_written: Arc<Mutex<u64>>,
}

impl BackgroundSaver {
    /// A saver spawning its writes on `runtime`.
    pub fn new(file: SaveFile, runtime: Handle) -> Self {
        Self {
            file: Arc::new(file),
            runtime,
            in_flight: Arc::new(AtomicBool::new(false)),
            next_sequence: AtomicU64::new(1),
            last_written: Arc::new(Mutex::new(0)),
        }
    }

    fn sequence(&self) -> u64 {
        self.next_sequence.fetch_add(1, Ordering::Relaxed)
    }
}

fn write_snapshot(
    file: &SaveFile,
    last_written: &Mutex<u64>,
    sequence: u64,
    snapshot: &StoreSnapshot,
) -> Result<(), DbError> {
    let started = Instant::now();
    let bytes = estate_db::encode(snapshot)?;
    let mut last = last_written.lock();
    if sequence <= *last {
        debug!(sequence, last = *last, "Discarding stale save");
        return Ok(());
    }
    file.write(&bytes)?;
    *last = sequence;
    info!(
        actors = snapshot.len(),
        bytes = bytes.len(),
        elapsed_ms = started.elapsed().as_millis(),
        path = %file.path().display(),
        "Save written"
    );
    Ok(())
}

impl SnapshotSink for BackgroundSaver {
    fn save(&self, snapshot: StoreSnapshot) {
        if self.in_flight.swap(true, Ordering::AcqRel) {
            debug!("Previous save still running, skipping this one");
            return;
        }
        let sequence = self.sequence();
        let file = Arc::clone(&self.file);
        let last_written = Arc::clone(&self.last_written);
        let in_flight = Arc::clone(&self.in_flight);
        self.runtime.spawn_blocking(move || {
            if let Err(e) = write_snapshot(&file, &last_written, sequence, &snapshot) {
                warn!(error = %e, "Background save failed");
            }
            in_flight.store(false, Ordering::Release);
        });
    }

    fn save_final(&self, snapshot: StoreSnapshot) -> Result<(), SaveError> {
        let sequence = self.sequence();
        write_snapshot(&self.file, &self.last_written, sequence, &snapshot).map_err(SaveError::new)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use estate_types::{ActorDefaults, ActorId, ActorState};

    use super::*;

    fn snapshot(balance: u64) -> StoreSnapshot {
        let mut state = ActorState::default();
        state.balance = balance;
        [(ActorId::new(), state)].into()
    }

    fn read_back(file: &SaveFile) -> StoreSnapshot {
        let bytes = file.read().unwrap().unwrap();
        estate_db::decode(&bytes, &ActorDefaults::default()).unwrap()
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn background_save_lands_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let file = SaveFile::in_dir(dir.path());
        let saver = BackgroundSaver::new(file.clone(), Handle::current());

        saver.save(snapshot(321));
        for _ in 0..200 {
            if !saver.in_flight.load(Ordering::Acquire) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        let restored = read_back(&file);
        assert_eq!(restored.values().next().map(|s| s.balance), Some(321));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn final_save_is_never_replaced_by_an_older_background_save() {
        let dir = tempfile::tempdir().unwrap();
        let file = SaveFile::in_dir(dir.path());
        let saver = BackgroundSaver::new(file.clone(), Handle::current());

        saver.save(snapshot(1));
        saver.save_final(snapshot(2)).unwrap();
        for _ in 0..200 {
            if !saver.in_flight.load(Ordering::Acquire) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        let restored = read_back(&file);
        assert_eq!(restored.values().next().map(|s| s.balance), Some(2));
    }

    #[test]
    fn final_save_into_unwritable_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"x").unwrap();
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let saver = BackgroundSaver::new(SaveFile::in_dir(&blocker), runtime.handle().clone());
        assert!(saver.save_final(snapshot(5)).is_err());
    }
}
