//! Currency ledger for the Pocket Estate simulation.
//!
//! Every balance read or write made by the engines goes through a
//! [`Ledger`]. The ledger is built once at startup and never changes
//! afterwards: it either keeps balances on the actor state itself
//! (internal) or forwards every call to a [`BalanceProvider`] supplied by
//! the host (external).
//!
//! # Modules
//!
//! - [`provider`] -- The [`BalanceProvider`] trait, the startup-time
//!   [`ProviderRegistry`], and an in-memory provider.
//! - [`ledger`] -- The [`Ledger`] strategy used by the engines.
//!
//! # Usage
//!
//! ```
//! use estate_ledger::{Ledger, ProviderRegistry};
//! use estate_types::{ActorId, ActorState};
//!
//! let ledger: Ledger = ProviderRegistry::new().into_ledger(false);
//! let actor = ActorId::new();
//! let mut state = ActorState::default();
//!
//! ledger.add_balance(actor, &mut state, -5000);
//! assert_eq!(ledger.balance(actor, &state), 0);
//! assert!(ledger.remove_balance(actor, &mut state, 1).is_err());
//! ```

pub mod ledger;
pub mod provider;

// Re-export primary types at crate root.
pub use ledger::{Ledger, LedgerStrategy};
pub use provider::{BalanceProvider, MemoryProvider, ProviderRegistry};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur when moving currency.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// The actor cannot cover the requested amount. Nothing was charged.
    #[error("insufficient funds: need {required}, have {available}")]
    InsufficientFunds {
        /// Amount requested.
        required: u64,
        /// Balance at the time of the request.
        available: u64,
    },

    /// The external provider refused a withdrawal it reported as covered.
    #[error("provider {provider} rejected a withdrawal of {amount}")]
    ProviderRejected {
        /// Name of the active provider.
        provider: String,
        /// Amount requested.
        amount: u64,
    },
}
