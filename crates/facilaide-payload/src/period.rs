//! # Period-Indexed Values
//!
//! Every engine variable is a map from period key to value. The key format
//! follows the variable's declared periodicity:
//!
//! | Periodicity            | Key       |
//! |------------------------|-----------|
//! | `year`                 | `YYYY`    |
//! | `month`, `eternity`, undeclared | `YYYY-MM` |
//!
//! Resource variables (wages, AAH) are backfilled: the current month's value
//! is copied into the three preceding calendar months, because means-tested
//! benefits look at a trailing income window. Months already present keep
//! their value.

use std::collections::BTreeMap;

use facilaide_core::{Periodicity, SimulationMonth, VariableCatalog};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Number of preceding months a resource variable is replicated into.
pub const RESOURCE_BACKFILL_MONTHS: u32 = 3;

/// `YYYY`.
pub fn is_year_key(key: &str) -> bool {
    key.len() == 4 && key.bytes().all(|b| b.is_ascii_digit())
}

/// `YYYY-MM` with a valid month.
pub fn is_month_key(key: &str) -> bool {
    SimulationMonth::parse_key(key).is_some()
}

/// Values of one variable, keyed by period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeriodValues(BTreeMap<String, Value>);

impl PeriodValues {
    /// No periods.
    pub fn new() -> Self {
        Self::default()
    }

    /// One period.
    pub fn single(key: impl Into<String>, value: Value) -> Self {
        let mut values = Self::new();
        values.insert(key, value);
        values
    }

    /// Value at `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Set the value at `key`, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    /// True if `key` carries a value (possibly null).
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Period keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// `(period, value)` pairs in ascending period order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of periods.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no period is set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Copy the value at `reference` into the `months` preceding calendar
    /// months that have no value yet. No-op when `reference` is absent.
    pub fn backfill(&mut self, reference: SimulationMonth, months: u32) {
        let Some(value) = self.0.get(&reference.month_key()).cloned() else {
            return;
        };
        for offset in 1..=months {
            self.0
                .entry(reference.minus_months(offset).month_key())
                .or_insert_with(|| value.clone());
        }
    }
}

impl FromIterator<(String, Value)> for PeriodValues {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Wraps scalar values into period maps for one simulation month.
#[derive(Debug, Clone, Copy)]
pub struct PeriodFormatter<'a> {
    catalog: &'a VariableCatalog,
    month: SimulationMonth,
}

impl<'a> PeriodFormatter<'a> {
    /// Formatter for `month`, reading periodicities from `catalog`.
    pub fn new(catalog: &'a VariableCatalog, month: SimulationMonth) -> Self {
        Self { catalog, month }
    }

    /// The simulation month.
    pub fn month(&self) -> SimulationMonth {
        self.month
    }

    /// Period key for `variable` in the simulation month.
    pub fn key_for(&self, variable: &str) -> String {
        match self.catalog.periodicity(variable) {
            Some(Periodicity::Year) => self.month.year_key(),
            _ => self.month.month_key(),
        }
    }

    /// `{key: value}` for a non-resource variable.
    pub fn wrap(&self, variable: &str, value: Value) -> PeriodValues {
        PeriodValues::single(self.key_for(variable), value)
    }

    /// Like [`wrap`](Self::wrap), backfilled over the trailing window when
    /// the variable is monthly or undeclared.
    pub fn wrap_resource(&self, variable: &str, value: Value) -> PeriodValues {
        let mut values = self.wrap(variable, value);
        match self.catalog.periodicity(variable) {
            Some(Periodicity::Month) | None => {
                values.backfill(self.month, RESOURCE_BACKFILL_MONTHS);
            }
            Some(Periodicity::Year) | Some(Periodicity::Eternity) => {}
        }
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn month(year: i32, month: u32) -> SimulationMonth {
        SimulationMonth::new(year, month).unwrap()
    }

    fn catalog() -> VariableCatalog {
        VariableCatalog::from_value(&json!({
            "salaire_de_base": {"entity": "individu", "periodicity": "month"},
            "ars": {"entity": "famille", "periodicity": "year"},
            "date_naissance": {"entity": "individu", "periodicity": "eternity"}
        }))
        .unwrap()
    }

    #[test]
    fn test_key_helpers() {
        assert!(is_year_key("2024"));
        assert!(!is_year_key("2024-06"));
        assert!(!is_year_key("24"));
        assert!(is_month_key("2024-06"));
        assert!(!is_month_key("2024-13"));
        assert!(!is_month_key("2024"));
    }

    #[test]
    fn test_backfill_crosses_year_boundary() {
        let mut values = PeriodValues::single("2025-01", json!(800));
        values.backfill(month(2025, 1), 3);
        let keys: Vec<&str> = values.keys().collect();
        assert_eq!(keys, ["2024-10", "2024-11", "2024-12", "2025-01"]);
        assert!(values.iter().all(|(_, v)| *v == json!(800)));
    }

    #[test]
    fn test_backfill_preserves_explicit_months() {
        let mut values: PeriodValues = [
            ("2024-06".to_string(), json!(1000)),
            ("2024-04".to_string(), json!(750)),
        ]
        .into_iter()
        .collect();
        values.backfill(month(2024, 6), 3);
        assert_eq!(values.get("2024-05"), Some(&json!(1000)));
        assert_eq!(values.get("2024-04"), Some(&json!(750)));
        assert_eq!(values.get("2024-03"), Some(&json!(1000)));
        assert_eq!(values.len(), 4);
    }

    #[test]
    fn test_backfill_without_reference_is_noop() {
        let mut values = PeriodValues::single("2024", json!(1));
        values.backfill(month(2024, 6), 3);
        assert_eq!(values, PeriodValues::single("2024", json!(1)));
    }

    #[test]
    fn test_formatter_keys() {
        let catalog = catalog();
        let formatter = PeriodFormatter::new(&catalog, month(2024, 6));
        assert_eq!(formatter.key_for("salaire_de_base"), "2024-06");
        assert_eq!(formatter.key_for("ars"), "2024");
        assert_eq!(formatter.key_for("date_naissance"), "2024-06");
        assert_eq!(formatter.key_for("undeclared"), "2024-06");
    }

    #[test]
    fn test_wrap_resource_backfills_monthly_and_undeclared_only() {
        let catalog = catalog();
        let formatter = PeriodFormatter::new(&catalog, month(2024, 6));
        assert_eq!(formatter.wrap_resource("salaire_de_base", json!(1)).len(), 4);
        assert_eq!(formatter.wrap_resource("undeclared", json!(1)).len(), 4);
        assert_eq!(formatter.wrap_resource("ars", json!(1)).len(), 1);
        assert_eq!(formatter.wrap_resource("date_naissance", json!(1)).len(), 1);
        assert_eq!(formatter.wrap("salaire_de_base", json!(1)).len(), 1);
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let values = PeriodValues::single("2024-06", json!(null));
        assert_eq!(serde_json::to_value(&values).unwrap(), json!({"2024-06": null}));
    }

    proptest! {
        #[test]
        fn backfill_yields_four_consecutive_months(year in 1900i32..2200, m in 1u32..=12) {
            let reference = month(year, m);
            let mut values = PeriodValues::single(reference.month_key(), json!(42));
            values.backfill(reference, RESOURCE_BACKFILL_MONTHS);
            prop_assert_eq!(values.len(), 4);
            for offset in 0..=3 {
                let key = reference.minus_months(offset).month_key();
                prop_assert_eq!(values.get(&key), Some(&json!(42)));
            }
            prop_assert!(values.keys().all(is_month_key));
        }
    }
}
