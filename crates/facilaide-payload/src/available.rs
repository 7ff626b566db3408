//! # Available Benefits
//!
//! Reads an engine result (same shape as the payload, with computed values)
//! and lists the benefits the household could claim. A benefit counts when
//! at least one entity gets a positive amount for the current period that
//! the household did not already declare as received.
//!
//! Result collections may appear at the root or under an `entities` object;
//! on an id collision the nested entity wins.

use facilaide_core::coerce::to_number;
use facilaide_core::{BenefitId, EntityKind, Periodicity, SimulationMonth, VariableCatalog};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Benefit variables requested from the engine and reported back, in report
/// order.
pub const DEFAULT_BENEFIT_VARIABLES: [BenefitId; 10] = [
    BenefitId::Aah,
    BenefitId::Af,
    BenefitId::AideLogement,
    BenefitId::Ars,
    BenefitId::Aspa,
    BenefitId::Asi,
    BenefitId::Cf,
    BenefitId::PajeBase,
    BenefitId::Ppa,
    BenefitId::Rsa,
];

/// Entity kinds whose results are read. Tax-household results are ignored.
const REPORTED_KINDS: [EntityKind; 3] =
    [EntityKind::Individu, EntityKind::Famille, EntityKind::Menage];

/// How one benefit is read from a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BenefitDefinition {
    /// Benefit variable.
    pub id: BenefitId,
    /// Entity kind carrying the benefit.
    pub entity: EntityKind,
    /// Periodicity; monthly when undeclared.
    pub periodicity: Periodicity,
    /// Display label: the catalog description, else the id.
    pub label: String,
}

/// Definitions for [`DEFAULT_BENEFIT_VARIABLES`], enriched from `catalog`.
///
/// Benefits with no declared entity, or declared on the tax household, are
/// left out.
pub fn benefit_definitions(catalog: &VariableCatalog) -> Vec<BenefitDefinition> {
    DEFAULT_BENEFIT_VARIABLES
        .iter()
        .filter_map(|&id| {
            let name = id.as_str();
            let entity = catalog.entity(name).filter(|k| REPORTED_KINDS.contains(k))?;
            Some(BenefitDefinition {
                id,
                entity,
                periodicity: catalog.periodicity(name).unwrap_or(Periodicity::Month),
                label: catalog.description(name).unwrap_or(name).to_string(),
            })
        })
        .collect()
}

/// A benefit the household could claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailableBenefit {
    /// Benefit variable.
    pub id: BenefitId,
    /// Display label.
    pub label: String,
    /// Entity kind the amount was read from.
    pub entity: EntityKind,
    /// Period key the amount applies to.
    pub period: String,
    /// Sum over entities of the positive amounts.
    pub amount: f64,
}

/// Entities of one collection, root entries overridden by `entities.<key>`.
fn merged_collection(document: &Value, key: &str) -> Option<Map<String, Value>> {
    let from_root = document.get(key).and_then(Value::as_object);
    let from_entities = document
        .get("entities")
        .and_then(|e| e.get(key))
        .and_then(Value::as_object);
    if from_root.is_none() && from_entities.is_none() {
        return None;
    }
    let mut merged = from_root.cloned().unwrap_or_default();
    if let Some(nested) = from_entities {
        for (id, entity) in nested {
            merged.insert(id.clone(), entity.clone());
        }
    }
    Some(merged)
}

/// A period entry: a scalar, or an object carrying `value`.
fn entry_amount(entry: &Value) -> Option<f64> {
    match entry.get("value") {
        Some(inner) if entry.is_object() => to_number(inner),
        _ => to_number(entry),
    }
}

/// Amount of one variable for `period`.
///
/// Tried in order: the period entry, a top-level `value`, the first period
/// entry that coerces to a number. A bare scalar is its own amount.
fn amount_for_period(values: &Value, period: &str) -> Option<f64> {
    match values {
        Value::Number(_) | Value::String(_) => to_number(values),
        Value::Object(map) => {
            if let Some(entry) = map.get(period) {
                return entry_amount(entry);
            }
            if let Some(value) = map.get("value") {
                return to_number(value);
            }
            map.values().find_map(entry_amount)
        }
        _ => None,
    }
}

/// True if the payload already declares a positive amount for this entity,
/// benefit and period.
fn declared_positive(
    declared: Option<&Map<String, Value>>,
    entity: &str,
    benefit: &str,
    period: &str,
) -> bool {
    declared
        .and_then(|collection| collection.get(entity))
        .and_then(|values| values.get(benefit))
        .and_then(|values| values.get(period))
        .and_then(entry_amount)
        .is_some_and(|amount| amount > 0.0)
}

/// Benefits with a positive total in `result` for `month`, in
/// [`DEFAULT_BENEFIT_VARIABLES`] order.
pub fn extract_available_benefits(
    result: &Value,
    payload: Option<&Value>,
    catalog: &VariableCatalog,
    month: SimulationMonth,
) -> Vec<AvailableBenefit> {
    if !result.is_object() {
        return Vec::new();
    }

    let mut available = Vec::new();
    for definition in benefit_definitions(catalog) {
        let key = definition.entity.collection_key();
        let Some(collection) = merged_collection(result, key) else {
            continue;
        };
        let declared = payload.and_then(|p| merged_collection(p, key));
        let period = match definition.periodicity {
            Periodicity::Year => month.year_key(),
            Periodicity::Month | Periodicity::Eternity => month.month_key(),
        };
        let benefit = definition.id.as_str();

        let total: f64 = collection
            .iter()
            .filter(|(_, values)| values.is_object())
            .filter(|(id, _)| !declared_positive(declared.as_ref(), id, benefit, &period))
            .filter_map(|(_, values)| values.get(benefit))
            .filter_map(|values| amount_for_period(values, &period))
            .filter(|amount| *amount > 0.0)
            .sum();

        if total.is_finite() && total > 0.0 {
            available.push(AvailableBenefit {
                id: definition.id,
                label: definition.label,
                entity: definition.entity,
                period,
                amount: total,
            });
        }
    }

    tracing::debug!(count = available.len(), month = %month, "extracted available benefits");
    available
}
