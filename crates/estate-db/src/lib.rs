//! Persistence for the Pocket Estate simulation.
//!
//! Every actor is written to a single compressed document file. Reading
//! is tolerant: one damaged actor or an unrecognized catalog entry never
//! prevents the rest of the file from loading. Only a root document that
//! cannot be read at all is an error.
//!
//! # Modules
//!
//! - [`codec`] -- Whole-file [`encode`] and [`decode`]
//! - [`document`] -- Per-actor on-disk document model
//! - [`file`] -- [`SaveFile`] read and atomic write
//! - [`error`] -- Shared error types

pub mod codec;
pub mod document;
pub mod error;
pub mod file;

pub use codec::{FORMAT_VERSION, Snapshot, decode, encode};
pub use error::DbError;
pub use file::{DEFAULT_FILE_NAME, SaveFile};
