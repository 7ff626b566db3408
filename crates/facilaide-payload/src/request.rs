//! # Engine Request Envelope
//!
//! What the local engine runner reads on stdin: the payload, the variables
//! to compute and the current period keys.

use std::collections::BTreeSet;

use facilaide_core::SimulationMonth;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::available::DEFAULT_BENEFIT_VARIABLES;
use crate::payload::SimulationPayload;

/// Payload collections scanned for variable names.
const COLLECTION_KEYS: [&str; 4] = ["individus", "familles", "menages", "foyers_fiscaux"];

/// One calculation request for the engine runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    /// The entity graph.
    pub payload: Value,
    /// Variables to compute, sorted and unique.
    pub variables: Vec<String>,
    /// `YYYY-MM`.
    #[serde(rename = "currentMonth")]
    pub current_month: String,
    /// `YYYY`.
    #[serde(rename = "currentYear")]
    pub current_year: String,
}

impl SimulationRequest {
    /// Request for an assembled payload.
    pub fn new<I, S>(
        payload: &SimulationPayload,
        month: SimulationMonth,
        extras: I,
    ) -> serde_json::Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(Self::from_value(payload.to_value()?, month, extras))
    }

    /// Request for a payload already in JSON form. A non-object payload is
    /// replaced by `{}`.
    pub fn from_value<I, S>(payload: Value, month: SimulationMonth, extras: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let payload = if payload.is_object() {
            payload
        } else {
            Value::Object(Default::default())
        };
        let variables = collect_variables(&payload, extras);
        tracing::debug!(variables = variables.len(), month = %month, "built engine request");
        Self {
            payload,
            variables,
            current_month: month.month_key(),
            current_year: month.year_key(),
        }
    }
}

/// Default benefits, every entity field holding a period map, and `extras`.
fn collect_variables<I, S>(payload: &Value, extras: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut names: BTreeSet<String> = DEFAULT_BENEFIT_VARIABLES
        .iter()
        .map(|id| id.as_str().to_string())
        .collect();

    let entities = COLLECTION_KEYS
        .iter()
        .filter_map(|key| payload.get(key).and_then(Value::as_object))
        .flat_map(|collection| collection.values())
        .filter_map(Value::as_object);
    for entity in entities {
        names.extend(
            entity
                .iter()
                .filter(|(_, value)| value.is_object())
                .map(|(name, _)| name.clone()),
        );
    }

    names.extend(
        extras
            .into_iter()
            .map(Into::into)
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty()),
    );
    names.into_iter().collect()
}

/// Split a comma-separated variable list, dropping blank entries.
pub fn parse_variable_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
