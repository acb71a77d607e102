//! The actor state store.
//!
//! Actors are created lazily on first lookup and live for the rest of the
//! process. Each actor sits behind its own mutex, so the scheduler and
//! interactive callers serialize per actor and never across actors. The
//! outer map lock is only held long enough to find or insert a handle.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::debug;

use estate_types::{ActorDefaults, ActorId, ActorState};

/// A point-in-time copy of every actor, ready to be encoded.
pub type StoreSnapshot = BTreeMap<ActorId, ActorState>;

/// Shared handle to one actor's state.
pub type ActorHandle = Arc<Mutex<ActorState>>;

/// Every known actor, keyed by id.
#[derive(Debug)]
pub struct ActorStore {
    defaults: ActorDefaults,
    actors: RwLock<BTreeMap<ActorId, ActorHandle>>,
}

impl ActorStore {
    /// An empty store creating new actors from `defaults`.
    pub fn new(defaults: ActorDefaults) -> Self {
        Self {
            defaults,
            actors: RwLock::new(BTreeMap::new()),
        }
    }

    /// A store pre-populated from a decoded snapshot.
    pub fn from_snapshot(defaults: ActorDefaults, snapshot: StoreSnapshot) -> Self {
        let actors = snapshot
            .into_iter()
            .map(|(id, state)| (id, Arc::new(Mutex::new(state))))
            .collect();
        Self {
            defaults,
            actors: RwLock::new(actors),
        }
    }

    /// The defaults new actors start with.
    pub const fn defaults(&self) -> &ActorDefaults {
        &self.defaults
    }

    /// Handle to `actor`, creating it with defaults if unseen.
    pub fn handle(&self, actor: ActorId) -> ActorHandle {
        if let Some(handle) = self.actors.read().get(&actor) {
            return Arc::clone(handle);
        }
        let mut actors = self.actors.write();
        let handle = actors.entry(actor).or_insert_with(|| {
            debug!(%actor, "Creating actor with defaults");
            Arc::new(Mutex::new(ActorState::new(&self.defaults)))
        });
        Arc::clone(handle)
    }

    /// Handle to `actor` only if it already exists.
    pub fn get(&self, actor: ActorId) -> Option<ActorHandle> {
        self.actors.read().get(&actor).map(Arc::clone)
    }

    /// Run `f` with exclusive access to `actor`, creating it if unseen.
    pub fn with_actor<T>(&self, actor: ActorId, f: impl FnOnce(&mut ActorState) -> T) -> T {
        let handle = self.handle(actor);
        let mut state = handle.lock();
        f(&mut state)
    }

    /// Run `f` for every actor in id order, locking one actor at a time.
    pub fn for_each_actor(&self, mut f: impl FnMut(ActorId, &mut ActorState)) {
        for (actor, handle) in self.handles() {
            let mut state = handle.lock();
            f(actor, &mut state);
        }
    }

    /// Copy every actor's state.
    pub fn snapshot(&self) -> StoreSnapshot {
        self.handles()
            .into_iter()
            .map(|(actor, handle)| (actor, handle.lock().clone()))
            .collect()
    }

    /// Ids of every known actor.
    pub fn actor_ids(&self) -> Vec<ActorId> {
        self.actors.read().keys().copied().collect()
    }

    /// Number of known actors.
    pub fn len(&self) -> usize {
        self.actors.read().len()
    }

    /// Whether no actor has been seen yet.
    pub fn is_empty(&self) -> bool {
        self.actors.read().is_empty()
    }

    fn handles(&self) -> Vec<(ActorId, ActorHandle)> {
        self.actors
            .read()
            .iter()
            .map(|(id, handle)| (*id, Arc::clone(handle)))
            .collect()
    }
}

impl Default for ActorStore {
    fn default() -> Self {
        Self::new(ActorDefaults::default())
    }
}
