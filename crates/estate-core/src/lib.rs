//! Actor store, estate operations, and the tick scheduler for the Pocket
//! Estate simulation.
//!
//! This crate ties the engines in `estate-farm` to shared state: it owns
//! every actor, exposes the interactive operations, and drives the
//! periodic growth, production, and save passes.
//!
//! # Modules
//!
//! - [`clock`] -- Monotonic tick counter.
//! - [`config`] -- Configuration loading from `estate-config.yaml` into
//!   strongly-typed structs.
//! - [`pricing`] -- [`Pricing`] trait and the default [`PriceTable`].
//! - [`store`] -- [`ActorStore`], per-actor locking and snapshots.
//! - [`service`] -- [`EstateService`], the interactive operations.
//! - [`scheduler`] -- The periodic passes and the [`SnapshotSink`] seam.
//! - [`runner`] -- Async loop driving the scheduler at a fixed rate.
//!
//! [`Pricing`]: pricing::Pricing
//! [`PriceTable`]: pricing::PriceTable
//! [`ActorStore`]: store::ActorStore
//! [`EstateService`]: service::EstateService
//! [`SnapshotSink`]: scheduler::SnapshotSink

pub mod clock;
pub mod config;
pub mod pricing;
pub mod runner;
pub mod scheduler;
pub mod service;
pub mod store;
