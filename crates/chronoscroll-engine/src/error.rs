//! Error types for the headless engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during startup and the scroll sweep.

use std::path::PathBuf;

/// Top-level error for the headless engine binary.
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
        source: chronoscroll_core::config::ConfigError,
    },

    /// The dataset file could not be read.
    #[error("failed to read dataset {}: {source}", path.display())]
    DatasetRead {
        /// Path that was read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The dataset is not a JSON array of timeline records.
    #[error("failed to parse dataset {}: {source}", path.display())]
    DatasetParse {
        /// Path that was parsed.
        path: PathBuf,
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// Startup or a tick failed.
    #[error("timeline error: {source}")]
    Tick {
        /// The underlying driver error.
        #[from]
        source: chronoscroll_core::tick::TickError,
    },

    /// Writing the snapshot failed.
    #[error("failed to write snapshot: {source}")]
    Output {
        /// The underlying serialization error.
        source: serde_json::Error,
    },
}
