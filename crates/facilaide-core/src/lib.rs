//! # facilaide-core: Foundational Types for FacilAide
//!
//! This crate is the bedrock of the FacilAide workspace. It holds the types
//! and primitives shared by the input resolver and the payload assembler.
//! Every other crate in the workspace depends on `facilaide-core`; it depends
//! on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Closed enumerations for domain vocabularies.** Housing statuses,
//!    benefit ids, beneficiary roles and entity kinds are enums with
//!    exhaustive `match`. The wire strings expected by the calculation engine
//!    live in exactly one `as_str()` per enum.
//!
//! 2. **Declarative extraction.** Field discovery over drifting input shapes
//!    is driven by ordered path tables ([`path::FieldRule`]) and alias tables
//!    ([`text::AliasTable`]). Behavior changes are data changes.
//!
//! 3. **Explicit reference time.** Nothing in this crate reads the clock
//!    except [`SimulationMonth::current`]. Age derivation and period keys take
//!    the reference month as an argument.
//!
//! 4. **Immutable metadata.** The [`VariableCatalog`] is loaded once and only
//!    read afterwards; it is `Send + Sync` and shared by reference.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `facilaide-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod coerce;
pub mod domain;
pub mod error;
pub mod metadata;
pub mod path;
pub mod record;
pub mod temporal;
pub mod text;

// Re-export primary types for ergonomic imports.
pub use canonical::StructuralSignature;
pub use coerce::{json_number, to_number};
pub use domain::{Beneficiary, BenefitId, Depcom, HousingStatus};
pub use error::{CanonicalizationError, MetadataError};
pub use metadata::{EntityKind, Periodicity, VariableCatalog, VariableMeta};
pub use record::{
    AdultRecord, BenefitDeclarations, ChildRecord, Declaration, HousingRecord, NormalizedRecord,
};
pub use temporal::SimulationMonth;
