//! # facilaide-cli: Command-Line Front End
//!
//! Runs the normalization pipeline on files, printing JSON on stdout.
//!
//! ## Subcommands
//!
//! - `facilaide normalize`: the normalized household record.
//! - `facilaide payload`: the validated engine payload.
//! - `facilaide request`: the engine request envelope.
//! - `facilaide benefits`: available benefits from an engine result.
//! - `facilaide labels`: display names for the payload's individuals.
//!
//! ```bash
//! facilaide --date 2024-06-14 payload situation.yaml
//! facilaide -vv request situation.json --extra-variable ppa_eligibilite
//! facilaide benefits result.json --payload payload.json
//! ```
//!
//! Logs go to stderr so stdout stays machine-readable.

pub mod benefits;
pub mod config;
pub mod input;
pub mod normalize;
pub mod payload;

pub use config::Session;
