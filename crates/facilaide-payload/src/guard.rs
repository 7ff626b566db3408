//! # Period Consistency Guard
//!
//! A monthly variable indexed by a year key (or a yearly variable indexed by
//! a month key) would be silently misread by the engine. The guard runs
//! after assembly and aborts construction on the first such variable.

use facilaide_core::{Periodicity, VariableCatalog};

use crate::error::AssemblyError;
use crate::payload::SimulationPayload;
use crate::period::{is_month_key, is_year_key};

/// Check every variable of every entity against its declared periodicity.
///
/// Undeclared variables are not checked. With an empty catalog the guard
/// always passes.
pub fn check_period_consistency(
    payload: &SimulationPayload,
    catalog: &VariableCatalog,
) -> Result<(), AssemblyError> {
    if catalog.is_empty() {
        return Ok(());
    }
    for (kind, id, entity) in payload.entities() {
        for (variable, values) in entity.variables() {
            let (expected, wrong_key): (&'static str, fn(&str) -> bool) =
                match catalog.periodicity(variable) {
                    Some(Periodicity::Month) => ("monthly", is_year_key),
                    Some(Periodicity::Year) => ("yearly", is_month_key),
                    Some(Periodicity::Eternity) | None => continue,
                };
            if let Some(period) = values.keys().find(|key| wrong_key(key)) {
                return Err(AssemblyError::PeriodMismatch {
                    entity_kind: kind,
                    entity: id.to_string(),
                    variable: variable.to_string(),
                    period: period.to_string(),
                    expected,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::{Entity, CLAIMANT_ID, FAMILY_ID};
    use crate::period::PeriodValues;
    use facilaide_core::EntityKind;
    use serde_json::json;

    fn catalog() -> VariableCatalog {
        VariableCatalog::from_value(&json!({
            "age": {"entity": "individu", "periodicity": "month"},
            "ars": {"entity": "famille", "periodicity": "year"}
        }))
        .unwrap()
    }

    fn payload_with(kind: EntityKind, id: &str, variable: &str, key: &str) -> SimulationPayload {
        let mut entity = Entity::new();
        entity.set_variable(variable, PeriodValues::single(key, json!(1)));
        let mut payload = SimulationPayload::default();
        payload.collection_mut(kind).insert(id.to_string(), entity);
        payload
    }

    #[test]
    fn test_well_formed_payload_passes() {
        let payload = payload_with(EntityKind::Individu, CLAIMANT_ID, "age", "2024-06");
        assert!(check_period_consistency(&payload, &catalog()).is_ok());
        let payload = payload_with(EntityKind::Famille, FAMILY_ID, "ars", "2024");
        assert!(check_period_consistency(&payload, &catalog()).is_ok());
    }

    #[test]
    fn test_monthly_variable_with_year_key_fails() {
        let payload = payload_with(EntityKind::Individu, CLAIMANT_ID, "age", "2024");
        let err = check_period_consistency(&payload, &catalog()).unwrap_err();
        match err {
            AssemblyError::PeriodMismatch {
                entity,
                variable,
                period,
                expected,
                ..
            } => {
                assert_eq!(entity, CLAIMANT_ID);
                assert_eq!(variable, "age");
                assert_eq!(period, "2024");
                assert_eq!(expected, "monthly");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_yearly_variable_with_month_key_fails() {
        let payload = payload_with(EntityKind::Famille, FAMILY_ID, "ars", "2024-09");
        let err = check_period_consistency(&payload, &catalog()).unwrap_err();
        assert!(err.to_string().contains("'ars'"));
        assert!(err.to_string().contains("yearly"));
    }

    #[test]
    fn test_undeclared_and_degraded_are_not_checked() {
        let payload = payload_with(EntityKind::Individu, CLAIMANT_ID, "inconnue", "2024");
        assert!(check_period_consistency(&payload, &catalog()).is_ok());
        let payload = payload_with(EntityKind::Individu, CLAIMANT_ID, "age", "2024");
        assert!(check_period_consistency(&payload, &VariableCatalog::empty()).is_ok());
    }
}
