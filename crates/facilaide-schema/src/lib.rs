//! # facilaide-schema: Payload Schema Gate
//!
//! Validates assembled payloads against the calculation engine's structural
//! schema before they leave the process.
//!
//! ## Null Augmentation (`nullable`)
//!
//! Period values of optional variables are written as `null`. The
//! [`nullable`] module widens every `additionalProperties` schema to accept
//! null before compilation, so the engine's strict schema still applies to
//! everything else.
//!
//! ## Validation (`validate`)
//!
//! [`PayloadSchema`] compiles the root component of an OpenAPI document once
//! and reports every violation of a payload in a single error.
//!
//! ## Crate Policy
//!
//! - No dependency on other `facilaide-*` crates.
//! - Validation is a trust boundary: a failing payload is never passed on,
//!   and the error lists every violated constraint, not just the first.
//! - No network access during `$ref` resolution.

pub mod nullable;
pub mod validate;

pub use nullable::allow_null_in_additional_properties;
pub use validate::{
    PayloadSchema, SchemaValidationError, ValidationViolations, Violation, DEFAULT_COMPONENT,
};
