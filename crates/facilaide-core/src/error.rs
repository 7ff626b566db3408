//! # Error Types
//!
//! Errors raised by the foundational layer. All errors use `thiserror`
//! for derive-based `Display` and `Error` implementations.
//!
//! Input ambiguity is never an error in FacilAide: resolver-facing helpers
//! in this crate return `Option`. The errors below cover the two places where
//! something can genuinely go wrong: loading the metadata table at startup
//! and producing a canonical signature.

use thiserror::Error;

/// Failure loading or parsing the variable metadata table.
#[derive(Error, Debug)]
pub enum MetadataError {
    /// The metadata file could not be read.
    #[error("cannot read variable metadata from '{path}': {source}")]
    Read {
        /// Path that was attempted.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The metadata document is not valid JSON or has the wrong shape.
    #[error("invalid variable metadata: {0}")]
    Parse(#[from] serde_json::Error),

    /// The top-level document is not an object keyed by variable name.
    #[error("variable metadata must be a JSON object keyed by variable name, got {0}")]
    NotAnObject(&'static str),
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}
