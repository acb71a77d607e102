//! External balance providers and their startup-time registration.
//!
//! A host that owns its own economy implements [`BalanceProvider`] and
//! registers it with a [`ProviderRegistry`] before the ledger is built.
//! Registration is accepted unconditionally and the last registration
//! wins. Adapters that may fail to initialize go through
//! [`ProviderRegistry::integrate`], which logs the failure and leaves the
//! registry untouched.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use estate_types::ActorId;

use crate::ledger::Ledger;

/// A currency store owned by the host.
///
/// Implementations must be callable from any thread. They own the
/// balance completely: the simulation never caches a value read from a
/// provider.
pub trait BalanceProvider: Send + Sync {
    /// Human-readable provider name, used in logs.
    fn name(&self) -> &str;

    /// Current balance of `actor`.
    fn balance(&self, actor: ActorId) -> u64;

    /// Credit `amount` to `actor`.
    fn add_balance(&self, actor: ActorId, amount: u64);

    /// Debit `amount` from `actor`. Returns `false`, without changing
    /// anything, if the actor cannot cover it.
    fn remove_balance(&self, actor: ActorId, amount: u64) -> bool;
}

impl core::fmt::Debug for dyn BalanceProvider {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BalanceProvider")
            .field("name", &self.name())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// MemoryProvider
// ---------------------------------------------------------------------------

/// A provider that keeps balances in memory.
///
/// Useful for hosts that want an external-style ledger without a real
/// economy behind it, and for tests.
#[derive(Debug)]
pub struct MemoryProvider {
    name: String,
    starting_balance: u64,
    balances: Mutex<BTreeMap<ActorId, u64>>,
}

impl MemoryProvider {
    /// Create a provider where unseen actors start with `starting_balance`.
    pub fn new(name: impl Into<String>, starting_balance: u64) -> Self {
        Self {
            name: name.into(),
            starting_balance,
            balances: Mutex::new(BTreeMap::new()),
        }
    }
}

impl BalanceProvider for MemoryProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn balance(&self, actor: ActorId) -> u64 {
        self.balances
            .lock()
            .get(&actor)
            .copied()
            .unwrap_or(self.starting_balance)
    }

    fn add_balance(&self, actor: ActorId, amount: u64) {
        let mut balances = self.balances.lock();
        let entry = balances.entry(actor).or_insert(self.starting_balance);
        *entry = entry.saturating_add(amount);
    }

    fn remove_balance(&self, actor: ActorId, amount: u64) -> bool {
        let mut balances = self.balances.lock();
        let entry = balances.entry(actor).or_insert(self.starting_balance);
        match entry.checked_sub(amount) {
            Some(rest) => {
                *entry = rest;
                true
            }
            None => false,
        }
    }
}

// ---------------------------------------------------------------------------
// ProviderRegistry
// ---------------------------------------------------------------------------

/// Collects provider registrations during startup.
#[derive(Debug, Default)]
pub struct ProviderRegistry {
    active: Option<Arc<dyn BalanceProvider>>,
}

impl ProviderRegistry {
    /// An empty registry.
    pub const fn new() -> Self {
        Self { active: None }
    }

    /// Register `provider`, replacing any earlier registration.
    pub fn register(&mut self, provider: Arc<dyn BalanceProvider>) {
        if let Some(previous) = &self.active {
            debug!(
                previous = previous.name(),
                replacement = provider.name(),
                "Replacing registered balance provider"
            );
        }
        info!(provider = provider.name(), "Balance provider registered");
        self.active = Some(provider);
    }

    /// Run a fallible adapter constructor and register its result.
    ///
    /// On failure the error is logged and the registry is left as it was.
    /// Returns whether a provider was registered.
    pub fn integrate<F, E>(&mut self, name: &str, factory: F) -> bool
    where
        F: FnOnce() -> Result<Arc<dyn BalanceProvider>, E>,
        E: core::fmt::Display,
    {
        match factory() {
            Ok(provider) => {
                self.register(provider);
                true
            }
            Err(err) => {
                warn!(
                    adapter = name,
                    error = %err,
                    "Economy integration failed, keeping current ledger"
                );
                false
            }
        }
    }

    /// The provider that would be used by an external ledger.
    pub fn active(&self) -> Option<&Arc<dyn BalanceProvider>> {
        self.active.as_ref()
    }

    /// Freeze the registry into a [`Ledger`].
    ///
    /// With `use_external` set and a provider registered, the ledger
    /// forwards to that provider. Otherwise it is internal; asking for an
    /// external ledger with nothing registered logs a warning.
    pub fn into_ledger(self, use_external: bool) -> Ledger {
        match (use_external, self.active) {
            (true, Some(provider)) => {
                info!(provider = provider.name(), "Using external ledger");
                Ledger::external(provider)
            }
            (true, None) => {
                warn!(
                    "External ledger requested but no provider registered, using internal balances"
                );
                Ledger::internal()
            }
            (false, _) => {
                info!("Using internal ledger");
                Ledger::internal()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_provider_refuses_overdraft() {
        let provider = MemoryProvider::new("mem", 10);
        let actor = ActorId::new();
        assert!(!provider.remove_balance(actor, 11));
        assert_eq!(provider.balance(actor), 10);
        assert!(provider.remove_balance(actor, 10));
        assert_eq!(provider.balance(actor), 0);
    }

    #[test]
    fn last_registration_wins() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(MemoryProvider::new("first", 0)));
        registry.register(Arc::new(MemoryProvider::new("second", 0)));
        assert_eq!(registry.active().map(|p| p.name()), Some("second"));
    }

    #[test]
    fn failed_integration_keeps_previous_provider() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(MemoryProvider::new("base", 0)));
        let ok = registry.integrate("broken", || -> Result<Arc<dyn BalanceProvider>, String> {
            Err("plugin missing".to_owned())
        });
        assert!(!ok);
        assert_eq!(registry.active().map(|p| p.name()), Some("base"));
    }

    #[test]
    fn successful_integration_registers() {
        let mut registry = ProviderRegistry::new();
        let ok = registry.integrate("mem", || -> Result<Arc<dyn BalanceProvider>, String> {
            Ok(Arc::new(MemoryProvider::new("mem", 0)))
        });
        assert!(ok);
        assert!(registry.active().is_some());
    }

    #[test]
    fn external_without_provider_falls_back() {
        let ledger = ProviderRegistry::new().into_ledger(true);
        assert!(!ledger.is_external());
    }

    #[test]
    fn internal_ignores_registered_provider() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(MemoryProvider::new("mem", 0)));
        assert!(!registry.into_ledger(false).is_external());
    }
}
