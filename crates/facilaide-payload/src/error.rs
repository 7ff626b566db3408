//! Errors raised while assembling a payload.
//!
//! Input ambiguity is never an error; these are construction failures only.

use facilaide_core::EntityKind;
use facilaide_schema::SchemaValidationError;
use thiserror::Error;

/// Payload construction failure.
#[derive(Error, Debug)]
pub enum AssemblyError {
    /// A variable carries a period key of the wrong granularity.
    #[error(
        "variable '{variable}' on {entity_kind} '{entity}' is {expected} but carries period '{period}'"
    )]
    PeriodMismatch {
        /// Kind of the offending entity.
        entity_kind: EntityKind,
        /// Id of the offending entity.
        entity: String,
        /// Variable name.
        variable: String,
        /// The misformatted period key.
        period: String,
        /// Declared periodicity (`monthly` or `yearly`).
        expected: &'static str,
    },

    /// The payload does not satisfy the engine schema.
    #[error("payload rejected by schema gate: {0}")]
    Schema(#[from] SchemaValidationError),

    /// The payload could not be rendered as JSON.
    #[error("payload serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
