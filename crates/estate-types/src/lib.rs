//! Shared type definitions for the Pocket Estate simulation.
//!
//! This crate is the single source of truth for the data every other
//! crate in the workspace passes around: actor identifiers, the crop and
//! pen catalogs, and the per-actor state the engines mutate.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrapper for actor identifiers
//! - [`enums`] -- Resources, tools, and pen categories with stable ids
//! - [`catalog`] -- Crop and pen kinds with their constant records
//! - [`structs`] -- Actor state: plots, pens, compost, buffers, stats

pub mod catalog;
pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use catalog::{CropKind, CropSpec, LootEntry, PenKind, PenSpec, ToolRequirement};
pub use enums::{DEFAULT_MAX_STACK, PenCategory, ResourceKind, ToolKind};
pub use ids::ActorId;
pub use structs::{
    ActorDefaults, ActorState, ActorStats, COMPOST_THRESHOLD, Compost, MAX_FODDER, MAX_PLOTS, Pen,
    Plot, ResourceBuffer, ResourceStack, ToolStack,
};
