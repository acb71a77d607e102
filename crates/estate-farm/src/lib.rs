//! Growth, production, and compost engines for the Pocket Estate simulation.
//!
//! The engines are plain functions over a single actor's
//! [`ActorState`](estate_types::ActorState). They hold no state of their
//! own and take no locks: the caller is responsible for holding the
//! actor's exclusive lock for the duration of a call.
//!
//! # Modules
//!
//! - [`growth`] -- Planting, growth passes, boosts, and harvesting
//! - [`production`] -- Pen cycles, fodder, tools, and construction
//! - [`compost`] -- The compost bin and its stored boosts
//! - [`slots`] -- Plot unlock cost schedule
//! - [`error`] -- Shared error type

pub mod compost;
pub mod error;
pub mod growth;
pub mod production;
pub mod slots;

pub use error::{FarmError, Result};
pub use growth::HarvestYield;
pub use production::ProductionSummary;
pub use slots::SlotCostTable;
