//! Error types for batchgrid
//!
//! Only unrecoverable conditions live here. Unresolved cell values and failed
//! row checks are data (`Resolution`, `ValidationReport`), not errors.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// batchgrid error types
#[derive(Error, Debug)]
pub enum Error {
    /// Caller supplied a value that violates a domain invariant
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Upload stream had no header line
    #[error("No header row found\nThe first line of a metadata upload must name its columns")]
    MissingHeader,

    /// Header matched no metadata schema (or more than one)
    #[error("Cannot infer metadata domain from header: {columns}\nExpected the full column set of a sequencing or proteomics template")]
    DomainInference {
        /// Header columns as observed
        columns: String,
    },

    /// Boundary validation did not finish in time; the whole batch fails
    #[error("Validation timed out after {millis} ms\nNo rows were accepted, please try again")]
    ValidationTimeout {
        /// Timeout that elapsed
        millis: u64,
    },

    /// A boundary validation task panicked or was cancelled
    #[error("Validation task failed: {0}")]
    ValidationTask(String),

    /// Referenced aggregate does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Collaborator service failure
    #[error("Source error: {0}")]
    Source(String),

    /// Engine configuration rejected
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error (config / fixtures)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
