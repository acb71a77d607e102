//! The [`Ledger`]: where every balance operation is routed.
//!
//! The strategy is fixed when the ledger is built. Callers always pass
//! the actor's state alongside its id so the internal strategy can work
//! on the balance field directly; the external strategy ignores it.

use std::sync::Arc;

use tracing::debug;

use estate_types::{ActorId, ActorState};

use crate::LedgerError;
use crate::provider::BalanceProvider;

/// Where balances live.
#[derive(Debug, Clone)]
pub enum LedgerStrategy {
    /// On `ActorState::balance`.
    Internal,
    /// In a host-supplied provider, keyed by actor id.
    External(Arc<dyn BalanceProvider>),
}

/// Routes balance reads and writes to the active strategy.
#[derive(Debug, Clone)]
pub struct Ledger {
    strategy: LedgerStrategy,
}

impl Ledger {
    /// A ledger that keeps balances on actor state.
    pub const fn internal() -> Self {
        Self {
            strategy: LedgerStrategy::Internal,
        }
    }

    /// A ledger that forwards to `provider`.
    pub fn external(provider: Arc<dyn BalanceProvider>) -> Self {
        Self {
            strategy: LedgerStrategy::External(provider),
        }
    }

    /// The active strategy.
    pub const fn strategy(&self) -> &LedgerStrategy {
        &self.strategy
    }

    /// Whether an external provider is active.
    pub const fn is_external(&self) -> bool {
        matches!(self.strategy, LedgerStrategy::External(_))
    }

    /// Name of the active balance store.
    pub fn provider_name(&self) -> &str {
        match &self.strategy {
            LedgerStrategy::Internal => "internal",
            LedgerStrategy::External(provider) => provider.name(),
        }
    }

    /// Current balance of `actor`.
    pub fn balance(&self, actor: ActorId, state: &ActorState) -> u64 {
        match &self.strategy {
            LedgerStrategy::Internal => state.balance,
            LedgerStrategy::External(provider) => provider.balance(actor),
        }
    }

    /// Whether `actor` can cover `amount`.
    pub fn can_afford(&self, actor: ActorId, state: &ActorState, amount: u64) -> bool {
        self.balance(actor, state) >= amount
    }

    /// Apply a signed adjustment. The result is clamped at zero, so this
    /// never fails. Returns the new balance.
    pub fn add_balance(&self, actor: ActorId, state: &mut ActorState, amount: i64) -> u64 {
        let magnitude = amount.unsigned_abs();
        match &self.strategy {
            LedgerStrategy::Internal => {
                state.balance = if amount >= 0 {
                    state.balance.saturating_add(magnitude)
                } else {
                    state.balance.saturating_sub(magnitude)
                };
                state.balance
            }
            LedgerStrategy::External(provider) => {
                if amount >= 0 {
                    provider.add_balance(actor, magnitude);
                } else {
                    let debit = provider.balance(actor).min(magnitude);
                    if debit > 0 && !provider.remove_balance(actor, debit) {
                        debug!(
                            %actor,
                            debit,
                            provider = provider.name(),
                            "Provider refused clamped debit"
                        );
                    }
                }
                provider.balance(actor)
            }
        }
    }

    /// Credit `amount`. Returns the new balance.
    pub fn credit(&self, actor: ActorId, state: &mut ActorState, amount: u64) -> u64 {
        self.add_balance(actor, state, i64::try_from(amount).unwrap_or(i64::MAX))
    }

    /// Debit exactly `amount`, or fail and change nothing.
    pub fn remove_balance(
        &self,
        actor: ActorId,
        state: &mut ActorState,
        amount: u64,
    ) -> Result<(), LedgerError> {
        match &self.strategy {
            LedgerStrategy::Internal => {
                let rest = state
                    .balance
                    .checked_sub(amount)
                    .ok_or(LedgerError::InsufficientFunds {
                        required: amount,
                        available: state.balance,
                    })?;
                state.balance = rest;
                Ok(())
            }
            LedgerStrategy::External(provider) => {
                let available = provider.balance(actor);
                if available < amount {
                    return Err(LedgerError::InsufficientFunds {
                        required: amount,
                        available,
                    });
                }
                if provider.remove_balance(actor, amount) {
                    Ok(())
                } else {
                    Err(LedgerError::ProviderRejected {
                        provider: provider.name().to_owned(),
                        amount,
                    })
                }
            }
        }
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::internal()
    }
}
