//! Error types for the persistence layer.
//!
//! Only whole-file failures surface as [`DbError`]. Problems confined to a
//! single actor or entry are logged and skipped during decoding.

/// Errors that can occur while reading or writing the save file.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// Reading or writing the save file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A document could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The root document could not be decompressed or parsed.
    #[error("Corrupt save data: {0}")]
    Corrupt(String),
}
