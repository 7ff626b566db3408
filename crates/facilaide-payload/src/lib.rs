//! # facilaide-payload: Payload Assembler
//!
//! Turns a [`facilaide_core::NormalizedRecord`] into the period-indexed entity
//! graph the tax-benefit calculation engine consumes, and reads the engine's
//! answer back.
//!
//! ## Assembly (`assembler`, `period`, `guard`)
//!
//! - Every variable is wrapped in a period map keyed by the current month,
//!   or the current year for yearly variables.
//! - Resource variables (wage, AAH) are backfilled over the three preceding
//!   months so means tests see a stable history.
//! - [`check_period_consistency`] rejects any variable whose keys disagree
//!   with its declared periodicity; the schema gate then validates the whole
//!   payload and reports every violation at once.
//!
//! ## Engine Boundary (`request`, `available`)
//!
//! - [`SimulationRequest`] is the envelope sent to the local engine runner.
//! - [`extract_available_benefits`] lists the benefits an engine result
//!   grants that the household does not already receive.
//!
//! ## Crate Policy
//!
//! - Configuration is loaded once into an [`EngineConfig`] and passed by
//!   reference. It is never mutated.
//! - The simulation date is an explicit argument on every `*_at` entry
//!   point; only [`build_payload`] reads the clock.
//! - Resolution never fails; assembly fails only with [`AssemblyError`].

pub mod assembler;
pub mod available;
pub mod config;
pub mod error;
pub mod guard;
pub mod payload;
pub mod period;
pub mod pipeline;
pub mod request;

pub use assembler::PayloadAssembler;
pub use available::{
    benefit_definitions, extract_available_benefits, AvailableBenefit, BenefitDefinition,
    DEFAULT_BENEFIT_VARIABLES,
};
pub use config::{ConfigSources, EngineConfig};
pub use error::AssemblyError;
pub use guard::check_period_consistency;
pub use payload::{Entity, EntityField, SimulationPayload};
pub use period::{PeriodFormatter, PeriodValues, RESOURCE_BACKFILL_MONTHS};
pub use pipeline::{build_payload, build_payload_at, run_at, PipelineOutput};
pub use request::{parse_variable_list, SimulationRequest};
