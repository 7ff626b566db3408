//! End-to-end normalization: raw household JSON to validated payload.

use chrono::{NaiveDate, Utc};
use facilaide_core::{NormalizedRecord, SimulationMonth};
use facilaide_resolver::InputResolver;
use serde_json::Value;

use crate::assembler::PayloadAssembler;
use crate::config::EngineConfig;
use crate::error::AssemblyError;
use crate::payload::SimulationPayload;

/// Normalized record and payload for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    /// Simulation month both stages used.
    pub month: SimulationMonth,
    /// What the resolver understood.
    pub record: NormalizedRecord,
    /// What the engine receives.
    pub payload: SimulationPayload,
}

/// Resolve and assemble `raw` as of `date`.
pub fn run_at(
    raw: &Value,
    config: &EngineConfig,
    date: NaiveDate,
) -> Result<PipelineOutput, AssemblyError> {
    let month = SimulationMonth::containing(date);
    let record = InputResolver::for_month(month).resolve(raw);
    let payload = PayloadAssembler::new(config, month).assemble(&record)?;
    Ok(PipelineOutput {
        month,
        record,
        payload,
    })
}

/// Build the validated payload for `raw` as of `date`.
pub fn build_payload_at(
    raw: &Value,
    config: &EngineConfig,
    date: NaiveDate,
) -> Result<SimulationPayload, AssemblyError> {
    run_at(raw, config, date).map(|output| output.payload)
}

/// Build the validated payload for `raw` as of today (UTC).
pub fn build_payload(raw: &Value, config: &EngineConfig) -> Result<SimulationPayload, AssemblyError> {
    build_payload_at(raw, config, Utc::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_run_at_uses_one_month_for_both_stages() {
        let config = EngineConfig::bundled();
        let date = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        let output = run_at(&json!({"date_naissance": "2000-01-31"}), &config, date).unwrap();
        assert_eq!(output.month.month_key(), "2025-01");
        assert_eq!(output.record.claimant.age, 25.0);
        let age = output.payload.individus["individu_1"].variable("age").unwrap();
        assert_eq!(age.get("2025-01"), Some(&json!(25)));
    }

    #[test]
    fn test_build_payload_today_validates() {
        let config = EngineConfig::bundled();
        assert!(build_payload(&json!({"salaire_de_base": 1000}), &config).is_ok());
    }
}
