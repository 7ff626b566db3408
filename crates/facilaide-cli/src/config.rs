//! Process-wide settings shared by every subcommand.
//!
//! Each data file comes from its flag, else its environment variable, else
//! the bundled copy compiled into the binary.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use facilaide_core::temporal::parse_calendar_date;
use facilaide_core::SimulationMonth;
use facilaide_payload::{ConfigSources, EngineConfig};

/// Variable metadata file override.
pub const VARIABLES_META_ENV: &str = "FACILAIDE_VARIABLES_META";
/// Payload schema file override.
pub const SCHEMA_ENV: &str = "FACILAIDE_SCHEMA";
/// Comma-separated variables added to every engine request.
pub const EXTRA_VARIABLES_ENV: &str = "FACILAIDE_EXTRA_VARIABLES";

fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var_os(name)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Merge explicit paths with their environment fallbacks.
pub fn resolve_sources(variables_meta: Option<&Path>, schema: Option<&Path>) -> ConfigSources {
    ConfigSources {
        variables_meta: variables_meta
            .map(Path::to_path_buf)
            .or_else(|| env_path(VARIABLES_META_ENV)),
        schema: schema.map(Path::to_path_buf).or_else(|| env_path(SCHEMA_ENV)),
    }
}

/// Parse `--date`. `None` means today (UTC).
pub fn reference_date(arg: Option<&str>) -> Result<NaiveDate> {
    match arg {
        Some(text) => parse_calendar_date(text.trim())
            .with_context(|| format!("invalid --date '{text}', expected YYYY-MM-DD")),
        None => Ok(Utc::now().date_naive()),
    }
}

/// Configuration and reference date for one invocation.
#[derive(Debug)]
pub struct Session {
    /// Loaded metadata and schema.
    pub config: EngineConfig,
    /// Simulation reference date.
    pub date: NaiveDate,
}

impl Session {
    /// Load the configuration named by `sources`.
    pub fn new(sources: &ConfigSources, date: NaiveDate) -> Self {
        Self {
            config: EngineConfig::load(sources),
            date,
        }
    }

    /// The simulation month containing the reference date.
    pub fn month(&self) -> SimulationMonth {
        SimulationMonth::containing(self.date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 6, 14).unwrap();
        assert_eq!(reference_date(Some("2024-06-14")).unwrap(), expected);
        assert_eq!(reference_date(Some(" 14/06/2024 ")).unwrap(), expected);
        assert!(reference_date(Some("2024-02-30")).is_err());
        assert!(reference_date(Some("demain")).is_err());
    }

    #[test]
    fn explicit_paths_win() {
        let sources = resolve_sources(Some(Path::new("meta.json")), Some(Path::new("api.yaml")));
        assert_eq!(sources.variables_meta, Some(PathBuf::from("meta.json")));
        assert_eq!(sources.schema, Some(PathBuf::from("api.yaml")));
    }

    #[test]
    fn session_month() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        let session = Session {
            config: EngineConfig::bundled(),
            date,
        };
        assert_eq!(session.month().month_key(), "2025-01");
    }
}
