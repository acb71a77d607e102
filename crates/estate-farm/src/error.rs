//! Error types for the `estate-farm` crate.
//!
//! Every failure here is local to one actor and leaves that actor's
//! state exactly as it was before the call.

use estate_ledger::LedgerError;
use estate_types::PenKind;

/// Errors that can occur during farm operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FarmError {
    /// Harvest attempted on an empty or still-growing plot.
    #[error("plot {index} is not ready to harvest")]
    NotReady {
        /// Plot index.
        index: usize,
    },

    /// The plot index is at or beyond the unlocked count.
    #[error("plot {index} is locked ({unlocked} unlocked)")]
    SlotLocked {
        /// Plot index.
        index: usize,
        /// Number of unlocked plots.
        unlocked: usize,
    },

    /// Planting attempted on a plot that already holds a crop.
    #[error("plot {index} is already planted")]
    SlotOccupied {
        /// Plot index.
        index: usize,
    },

    /// Every plot is already unlocked, or the cost table is exhausted.
    #[error("no more plots can be unlocked")]
    CapacityExceeded,

    /// The pen is already owned.
    #[error("{kind} is already owned")]
    AlreadyOwned {
        /// Pen kind.
        kind: PenKind,
    },

    /// The pen is not owned.
    #[error("{kind} is not owned")]
    NotOwned {
        /// Pen kind.
        kind: PenKind,
    },

    /// Construction investment made on a pen that needs no construction.
    #[error("{kind} does not need construction")]
    NotConstructible {
        /// Pen kind.
        kind: PenKind,
    },

    /// Fodder offered to a pen that eats nothing.
    #[error("{kind} does not take fodder")]
    NoFodderNeeded {
        /// Pen kind.
        kind: PenKind,
    },

    /// A boost was requested but none is stored.
    #[error("no stored boost available")]
    NoBoostStored,

    /// A boost was requested but no plot is growing.
    #[error("no plot is currently growing")]
    NothingGrowing,

    /// A purchase could not be paid for.
    #[error("ledger error: {source}")]
    Ledger {
        /// The underlying ledger error.
        #[from]
        source: LedgerError,
    },
}

/// Convenience alias for farm results.
pub type Result<T> = core::result::Result<T, FarmError>;
