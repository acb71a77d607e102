//! Error types for the engine binary.

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: estate_core::config::ConfigError,
    },

    /// Reading the save file failed.
    #[error("persistence error: {source}")]
    Db {
        /// The underlying persistence error.
        #[from]
        source: estate_db::DbError,
    },

    /// The tick loop failed.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: estate_core::runner::RunnerError,
    },
}
